//! Export credit premium CLI
//!
//! Command-line interface for quoting export credit premiums

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use export_credit_premium::api::{CountrySelector, PreShipmentRequest, ShortTermRequest};
use export_credit_premium::schedule::load_tranches;
use export_credit_premium::{Config, PremiumService, ProjectInput};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "export_credit_premium", version, about = "Export credit insurance premium calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pre-shipment, counter-guarantee and short-term premium for one payment
    Quote(QuoteArgs),
    /// Full quote for a project described in a JSON file
    Project {
        /// Project file (country_category, buyer_category, contract_value, schedule, tranches, financing)
        path: PathBuf,

        /// CSV of payment tranches (name, payment_month, amount_percent, phase), replacing those in the file
        #[arg(long)]
        tranches: Option<PathBuf>,
    },
    /// Look up the risk category of a country
    Country {
        name: String,
    },
}

#[derive(Args)]
struct QuoteArgs {
    /// Country name, resolved through the country category table
    #[arg(long, conflicts_with = "category")]
    country: Option<String>,

    /// Country category 0-7
    #[arg(long)]
    category: Option<i64>,

    /// Buyer category: Sov+, Sov, Sov-, CC0 .. CC5
    #[arg(long, default_value = "CC2")]
    buyer: String,

    /// Number of 3-month fabrication periods
    #[arg(long, default_value_t = 5.0)]
    fbz: f64,

    /// Self cost in percent of the contract price
    #[arg(long, default_value_t = 85.0)]
    self_cost: f64,

    /// Guarantee volume other than down-payment guarantees, in percent
    #[arg(long, default_value_t = 20.0)]
    guarantees: f64,

    /// Payment in percent of the contract price
    #[arg(long, default_value_t = 85.0)]
    payment: f64,

    /// Risk tenor in months
    #[arg(long, default_value_t = 1.0)]
    rlz: f64,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn run_quote(service: &PremiumService, args: QuoteArgs) -> Result<()> {
    let selector = CountrySelector {
        country: args.country.clone(),
        country_category: args.category,
    };
    if selector.country.is_none() && selector.country_category.is_none() {
        bail!("either --country or --category is required");
    }

    let pre = service.pre_shipment(&PreShipmentRequest {
        country: selector.clone(),
        fbz: Some(args.fbz),
        equipment_start_month: None,
        self_cost_percent: args.self_cost,
        guarantee_percent: args.guarantees,
    })?;
    let short = service.short_term(&ShortTermRequest {
        country: selector,
        buyer_category: args.buyer.clone(),
        risk_tenor: args.rlz,
        payment_percent: args.payment,
    })?;

    if args.json {
        let body = serde_json::json!({ "pre_shipment": pre, "short_term": short });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match &args.country {
        Some(name) => println!("Category for {}: {}", name, pre.country_category),
        None => println!("Country category: {}", pre.country_category),
    }
    println!("Pre-ship cover premium in % of contract price: {:.2}", pre.pre_shipment_percent);
    println!("Counter guarantee cover premium in % of contract price: {:.2}", pre.counter_guarantee_percent);
    println!("Short term cover premium in % of contract price: {:.2}", short.premium_percent);
    for warning in &short.warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}

fn run_project(service: &PremiumService, path: PathBuf, tranches: Option<PathBuf>) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("Unable to open {}", path.display()))?;
    let mut input: ProjectInput =
        serde_json::from_reader(file).with_context(|| format!("Invalid project file {}", path.display()))?;

    if let Some(tranche_path) = tranches {
        input.tranches = load_tranches(&tranche_path)
            .map_err(|e| anyhow::anyhow!("Invalid tranche file {}: {}", tranche_path.display(), e))?;
        log::info!("Loaded {} payment tranches from {}", input.tranches.len(), tranche_path.display());
    }

    let quote = service.quote_input(&input)?;
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let service = PremiumService::from_config(config).context("Failed to load country data")?;

    match cli.command {
        Commands::Quote(args) => run_quote(&service, args),
        Commands::Project { path, tranches } => run_project(&service, path, tranches),
        Commands::Country { name } => {
            let response = service.country(&name)?;
            println!("Category for {}: {}", response.country, response.country_category);
            if let Some(info) = response.country_info {
                for (title, text) in info {
                    println!("\n{}\n  {}", title, text);
                }
            }
            Ok(())
        }
    }
}
