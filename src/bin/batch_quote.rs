//! Quote a batch of export deals from a CSV file
//!
//! Input columns: id, country, country_category, buyer_category, contract_value,
//! self_cost_percent, guarantee_percent, fbz, payment_percent, risk_tenor,
//! loan_tenor_years (country or country_category may be empty; so may
//! loan_tenor_years when no financing is needed).
//!
//! Rows are quoted in parallel; rows that fail are written with the error.

use anyhow::{Context, Result};
use clap::Parser;
use export_credit_premium::api::{
    CountrySelector, FinancingRequest, LongTermRequest, PreShipmentRequest, ShortTermRequest,
};
use export_credit_premium::premium::round_amount;
use export_credit_premium::{Config, PremiumError, PremiumService, ProjectSchedule};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "batch_quote", about = "Quote a CSV of export deals")]
struct Args {
    /// Input CSV
    input: PathBuf,

    /// Output CSV
    #[arg(long, short, default_value = "batch_quotes.csv")]
    output: PathBuf,
}

fn default_hundred() -> f64 { 100.0 }

#[derive(Debug, Deserialize)]
struct DealRow {
    id: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_category: Option<i64>,
    buyer_category: String,
    contract_value: f64,
    #[serde(default = "default_hundred")]
    self_cost_percent: f64,
    #[serde(default)]
    guarantee_percent: f64,
    fbz: f64,
    #[serde(default = "default_hundred")]
    payment_percent: f64,
    risk_tenor: f64,
    #[serde(default)]
    loan_tenor_years: Option<f64>,
}

#[derive(Debug, Serialize, Default)]
struct QuoteRow {
    id: String,
    country_category: Option<u8>,
    applied_category: Option<u8>,
    pre_shipment_percent: Option<f64>,
    counter_guarantee_percent: Option<f64>,
    short_term_rate_percent: Option<f64>,
    short_term_percent: Option<f64>,
    long_term_rate_percent: Option<f64>,
    total_premium_amount: Option<f64>,
    warnings: String,
    error: String,
}

fn quote_deal(service: &PremiumService, deal: &DealRow) -> Result<QuoteRow, PremiumError> {
    let selector = CountrySelector {
        country: deal.country.clone().filter(|c| !c.trim().is_empty()),
        country_category: deal.country_category,
    };

    let pre = service.pre_shipment(&PreShipmentRequest {
        country: selector.clone(),
        fbz: Some(deal.fbz),
        equipment_start_month: None,
        self_cost_percent: deal.self_cost_percent,
        guarantee_percent: deal.guarantee_percent,
    })?;

    let short = service.short_term(&ShortTermRequest {
        country: selector.clone(),
        buyer_category: deal.buyer_category.clone(),
        risk_tenor: deal.risk_tenor,
        payment_percent: deal.payment_percent,
    })?;

    let mut warnings = short.warnings.clone();
    let long = match deal.loan_tenor_years {
        Some(loan_tenor_years) => {
            let response = service.long_term(&LongTermRequest {
                country: selector,
                buyer_category: deal.buyer_category.clone(),
                financing: FinancingRequest { loan_tenor_years, financed_percent: None },
                contract_value: deal.contract_value,
                schedule: ProjectSchedule::default(),
            })?;
            for warning in &response.warnings {
                if !warnings.contains(warning) {
                    warnings.push(warning.clone());
                }
            }
            Some(response.premium)
        }
        None => None,
    };

    let percent_total = pre.pre_shipment_percent + pre.counter_guarantee_percent + short.premium_percent;
    let total = deal.contract_value * percent_total / 100.0 + long.as_ref().map_or(0.0, |l| l.premium_amount);

    Ok(QuoteRow {
        id: deal.id.clone(),
        country_category: Some(pre.country_category.value()),
        applied_category: Some(pre.applied_category.value()),
        pre_shipment_percent: Some(pre.pre_shipment_percent),
        counter_guarantee_percent: Some(pre.counter_guarantee_percent),
        short_term_rate_percent: Some(short.rate_percent),
        short_term_percent: Some(short.premium_percent),
        long_term_rate_percent: long.map(|l| l.rate_percent),
        total_premium_amount: Some(round_amount(total)),
        warnings: warnings.join(" | "),
        error: String::new(),
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let service = PremiumService::from_config(Config::from_env()).context("Failed to load country data")?;

    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("Unable to open {}", args.input.display()))?;
    let deals: Vec<DealRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Invalid deal file {}", args.input.display()))?;
    println!("Loaded {} deals in {:?}", deals.len(), start.elapsed());

    // Quote deals in parallel
    let rows: Vec<QuoteRow> = deals
        .par_iter()
        .map(|deal| {
            quote_deal(&service, deal).unwrap_or_else(|e| {
                log::warn!("Deal {} rejected: {}", deal.id, e);
                QuoteRow {
                    id: deal.id.clone(),
                    error: e.to_string(),
                    ..Default::default()
                }
            })
        })
        .collect();

    let failed = rows.iter().filter(|r| !r.error.is_empty()).count();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Unable to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("  Quoted: {}", rows.len() - failed);
    println!("  Failed: {}", failed);
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
