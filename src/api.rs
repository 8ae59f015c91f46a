//! JSON request/response types and the service behind the HTTP endpoints
//!
//! Requests name the buyer's country (resolved through the country
//! directory) or pass its category directly. Classification fields are taken
//! as plain strings/integers so that an unknown grade or category is
//! reported as an invalid classification rather than a malformed body.

use crate::classification::{BuyerCategory, CountryCategory, CountryDirectory, CountryInfo};
use crate::config::Config;
use crate::error::PremiumError;
use crate::premium::{
    check_non_negative, check_percent, FinancingTerms, LongTermPremium, PremiumCalculator, PremiumQuote,
    ProjectInput, CATEGORY_ZERO_SHORT_TERM_WARNING,
};
use crate::rates::round_percent;
use crate::schedule::{fbz_from_start_month, PaymentTranche, ProjectSchedule};
use serde::{Deserialize, Serialize};

fn default_hundred() -> f64 { 100.0 }

/// Country given by name or by category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountrySelector {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_category: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinancingRequest {
    pub loan_tenor_years: f64,
    #[serde(default)]
    pub financed_percent: Option<f64>,
}

/// POST /premium
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub country: CountrySelector,
    pub buyer_category: String,
    pub contract_value: f64,
    #[serde(default = "default_hundred")]
    pub self_cost_percent: f64,
    #[serde(default)]
    pub guarantee_percent: f64,
    #[serde(default)]
    pub fbz: Option<f64>,
    #[serde(default)]
    pub schedule: ProjectSchedule,
    #[serde(default)]
    pub tranches: Vec<PaymentTranche>,
    #[serde(default)]
    pub financing: Option<FinancingRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub quote: PremiumQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_info: Option<CountryInfo>,
}

/// POST /pre-shipment
#[derive(Debug, Clone, Deserialize)]
pub struct PreShipmentRequest {
    #[serde(flatten)]
    pub country: CountrySelector,
    /// Fabrication period in 3-month units
    #[serde(default)]
    pub fbz: Option<f64>,
    /// Used to derive FBZ when `fbz` is absent
    #[serde(default)]
    pub equipment_start_month: Option<u32>,
    #[serde(default = "default_hundred")]
    pub self_cost_percent: f64,
    #[serde(default)]
    pub guarantee_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreShipmentResponse {
    pub country_category: CountryCategory,
    pub applied_category: CountryCategory,
    pub fbz: f64,
    pub coefficient: f64,
    pub pre_shipment_percent: f64,
    pub counter_guarantee_percent: f64,
    pub formula: String,
    pub counter_guarantee_formula: String,
}

/// POST /short-term
#[derive(Debug, Clone, Deserialize)]
pub struct ShortTermRequest {
    #[serde(flatten)]
    pub country: CountrySelector,
    pub buyer_category: String,
    /// Risk tenor in months
    pub risk_tenor: f64,
    /// Payment in percent of the contract value
    #[serde(default = "default_hundred")]
    pub payment_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortTermResponse {
    pub country_category: CountryCategory,
    pub applied_category: CountryCategory,
    pub buyer_category: BuyerCategory,
    pub risk_tenor: f64,
    pub rate_percent: f64,
    pub premium_percent: f64,
    pub warnings: Vec<String>,
}

/// POST /long-term
#[derive(Debug, Clone, Deserialize)]
pub struct LongTermRequest {
    #[serde(flatten)]
    pub country: CountrySelector,
    pub buyer_category: String,
    #[serde(flatten)]
    pub financing: FinancingRequest,
    #[serde(default)]
    pub contract_value: f64,
    #[serde(default)]
    pub schedule: ProjectSchedule,
}

#[derive(Debug, Clone, Serialize)]
pub struct LongTermResponse {
    pub country_category: CountryCategory,
    pub applied_category: CountryCategory,
    pub buyer_category: BuyerCategory,
    #[serde(flatten)]
    pub premium: LongTermPremium,
    pub warnings: Vec<String>,
}

/// GET /countries/{name}
#[derive(Debug, Clone, Serialize)]
pub struct CountryResponse {
    pub country: String,
    pub country_category: CountryCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_info: Option<CountryInfo>,
}

/// HTTP status for an error
pub fn status_code(error: &PremiumError) -> u16 {
    match error {
        PremiumError::CountryNotFound(_) => 404,
        PremiumError::InvalidInput(_) => 400,
        PremiumError::Load { .. } => 500,
        _ => 422,
    }
}

/// Calculator plus read-only reference data, shared by all requests
#[derive(Debug, Clone)]
pub struct PremiumService {
    calculator: PremiumCalculator,
    directory: CountryDirectory,
    config: Config,
}

impl PremiumService {
    pub fn new(calculator: PremiumCalculator, directory: CountryDirectory, config: Config) -> Self {
        Self { calculator, directory, config }
    }

    /// Load reference data as configured
    pub fn from_config(config: Config) -> Result<Self, PremiumError> {
        let directory = config.load_directory()?;
        Ok(Self::new(PremiumCalculator::default(), directory, config))
    }

    /// Explicit category wins over a country name
    fn resolve(&self, selector: &CountrySelector) -> Result<(CountryCategory, Option<String>), PremiumError> {
        match (selector.country_category, selector.country.as_deref()) {
            (Some(value), name) => Ok((CountryCategory::new(value)?, name.map(|n| n.trim().to_string()))),
            (None, Some(name)) => {
                let entry = self
                    .directory
                    .find(name)
                    .ok_or_else(|| PremiumError::CountryNotFound(name.trim().to_string()))?;
                Ok((entry.category, Some(entry.name.clone())))
            }
            (None, None) => Err(PremiumError::MissingCountryCategory),
        }
    }

    fn financing_terms(&self, request: &FinancingRequest) -> FinancingTerms {
        FinancingTerms {
            loan_tenor_years: request.loan_tenor_years,
            financed_percent: request
                .financed_percent
                .unwrap_or(self.config.default_financed_percent),
        }
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, PremiumError> {
        let (category, country) = self.resolve(&request.country)?;
        let buyer: BuyerCategory = request.buyer_category.parse()?;

        let input = ProjectInput {
            country_category: category,
            buyer_category: buyer,
            contract_value: request.contract_value,
            self_cost_percent: request.self_cost_percent,
            guarantee_percent: request.guarantee_percent,
            fbz: request.fbz,
            schedule: request.schedule.clone(),
            tranches: request.tranches.clone(),
            financing: request.financing.as_ref().map(|f| self.financing_terms(f)),
        };

        let quote = self.calculator.quote(&input)?;
        let country_info = country.as_deref().and_then(|name| self.directory.info(name)).cloned();

        Ok(QuoteResponse { country, quote, country_info })
    }

    /// Quote an already classified project
    pub fn quote_input(&self, input: &ProjectInput) -> Result<PremiumQuote, PremiumError> {
        self.calculator.quote(input)
    }

    pub fn pre_shipment(&self, request: &PreShipmentRequest) -> Result<PreShipmentResponse, PremiumError> {
        let (category, _) = self.resolve(&request.country)?;
        let fbz = match (request.fbz, request.equipment_start_month) {
            (Some(fbz), _) => fbz,
            (None, Some(month)) => fbz_from_start_month(month),
            (None, None) => {
                return Err(PremiumError::InvalidInput(
                    "either fbz or equipment_start_month is required".to_string(),
                ))
            }
        };

        check_percent("self cost", request.self_cost_percent)?;
        check_percent("guarantee volume", request.guarantee_percent)?;

        let premium = self.calculator.pre_shipment(
            category,
            fbz,
            request.self_cost_percent,
            request.guarantee_percent,
            0.0,
            &ProjectSchedule::default(),
        )?;

        Ok(PreShipmentResponse {
            country_category: category,
            applied_category: category.benchmark(),
            fbz,
            coefficient: premium.coefficient,
            pre_shipment_percent: premium.premium_percent,
            counter_guarantee_percent: premium.counter_guarantee_percent,
            formula: premium.formula,
            counter_guarantee_formula: premium.counter_guarantee_formula,
        })
    }

    pub fn short_term(&self, request: &ShortTermRequest) -> Result<ShortTermResponse, PremiumError> {
        let (category, _) = self.resolve(&request.country)?;
        let buyer: BuyerCategory = request.buyer_category.parse()?;
        check_percent("payment", request.payment_percent)?;

        let rate_percent = self.calculator.short_term_rate(category, buyer, request.risk_tenor)?;
        let mut warnings = Vec::new();
        if category.needs_benchmark() {
            warnings.push(CATEGORY_ZERO_SHORT_TERM_WARNING.to_string());
        }

        Ok(ShortTermResponse {
            country_category: category,
            applied_category: category.benchmark(),
            buyer_category: buyer,
            risk_tenor: request.risk_tenor,
            rate_percent,
            premium_percent: round_percent(rate_percent * request.payment_percent / 100.0),
            warnings,
        })
    }

    pub fn long_term(&self, request: &LongTermRequest) -> Result<LongTermResponse, PremiumError> {
        let (category, _) = self.resolve(&request.country)?;
        let buyer: BuyerCategory = request.buyer_category.parse()?;
        let terms = self.financing_terms(&request.financing);

        check_non_negative("contract value", request.contract_value)?;
        terms.validate()?;

        let mut warnings = Vec::new();
        let premium = self.calculator.long_term(
            category,
            buyer,
            &request.schedule,
            &terms,
            request.contract_value,
            &mut warnings,
        )?;

        Ok(LongTermResponse {
            country_category: category,
            applied_category: category.benchmark(),
            buyer_category: buyer,
            premium,
            warnings,
        })
    }

    pub fn country(&self, name: &str) -> Result<CountryResponse, PremiumError> {
        let entry = self
            .directory
            .find(name)
            .ok_or_else(|| PremiumError::CountryNotFound(name.trim().to_string()))?;
        Ok(CountryResponse {
            country: entry.name.clone(),
            country_category: entry.category,
            country_info: self.directory.info(&entry.name).cloned(),
        })
    }
}
