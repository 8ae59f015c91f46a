//! Inputs for a project quote

use crate::classification::{BuyerCategory, CountryCategory};
use crate::error::PremiumError;
use crate::schedule::{PaymentTranche, ProjectSchedule};
use serde::{Deserialize, Serialize};

/// Default share of the contract value that is financed
pub const DEFAULT_FINANCED_PERCENT: f64 = 85.0;

fn default_financed_percent() -> f64 { DEFAULT_FINANCED_PERCENT }
fn default_self_cost_percent() -> f64 { 100.0 }

/// Buyer credit terms for long-term cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Repayment period of the loan in years
    pub loan_tenor_years: f64,

    /// Financed share of the contract value in percent (default: 85%)
    #[serde(default = "default_financed_percent")]
    pub financed_percent: f64,
}

impl FinancingTerms {
    pub fn new(loan_tenor_years: f64) -> Self {
        Self {
            loan_tenor_years,
            financed_percent: DEFAULT_FINANCED_PERCENT,
        }
    }

    pub fn validate(&self) -> Result<(), PremiumError> {
        check_non_negative("loan tenor", self.loan_tenor_years)?;
        check_percent("financed share", self.financed_percent)
    }
}

/// Everything needed to quote one export project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub country_category: CountryCategory,
    pub buyer_category: BuyerCategory,

    /// Contract value in contract currency
    pub contract_value: f64,

    /// Manufacturer's own costs in percent of the contract price (default: 100%)
    #[serde(default = "default_self_cost_percent")]
    pub self_cost_percent: f64,

    /// Guarantee volume other than down-payment guarantees, in percent
    #[serde(default)]
    pub guarantee_percent: f64,

    /// Fabrication period override in 3-month units; derived from the
    /// equipment start month when absent
    #[serde(default)]
    pub fbz: Option<f64>,

    #[serde(default)]
    pub schedule: ProjectSchedule,

    #[serde(default)]
    pub tranches: Vec<PaymentTranche>,

    #[serde(default)]
    pub financing: Option<FinancingTerms>,
}

pub(crate) fn check_percent(label: &str, value: f64) -> Result<(), PremiumError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(PremiumError::InvalidInput(format!(
            "{} must be within 0..=100 percent, got {}",
            label, value
        )))
    }
}

pub(crate) fn check_non_negative(label: &str, value: f64) -> Result<(), PremiumError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PremiumError::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            label, value
        )))
    }
}

impl ProjectInput {
    pub fn new(country_category: CountryCategory, buyer_category: BuyerCategory, contract_value: f64) -> Self {
        Self {
            country_category,
            buyer_category,
            contract_value,
            self_cost_percent: default_self_cost_percent(),
            guarantee_percent: 0.0,
            fbz: None,
            schedule: ProjectSchedule::default(),
            tranches: Vec::new(),
            financing: None,
        }
    }

    /// FBZ override or the value derived from the schedule
    pub fn effective_fbz(&self) -> f64 {
        self.fbz.unwrap_or_else(|| self.schedule.fbz())
    }

    /// Range checks on all numeric inputs
    pub fn validate(&self) -> Result<(), PremiumError> {
        check_non_negative("contract value", self.contract_value)?;
        check_percent("self cost", self.self_cost_percent)?;
        check_percent("guarantee volume", self.guarantee_percent)?;
        if let Some(fbz) = self.fbz {
            check_non_negative("FBZ", fbz)?;
        }
        self.schedule.validate()?;

        for tranche in &self.tranches {
            check_percent(&format!("tranche '{}' amount", tranche.name), tranche.amount_percent)?;
        }
        let paid: f64 = self.tranches.iter().map(|t| t.amount_percent).sum();
        if paid > 100.0 + 1e-6 {
            return Err(PremiumError::InvalidInput(format!(
                "payment tranches add up to {} percent of the contract value",
                paid
            )));
        }

        if let Some(financing) = &self.financing {
            financing.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Phase;

    #[test]
    fn test_financing_terms_validation() {
        assert!(FinancingTerms::new(5.0).validate().is_ok());
        assert!(FinancingTerms::new(0.0).validate().is_ok());
        assert!(matches!(FinancingTerms::new(-0.75).validate(), Err(PremiumError::InvalidInput(_))));
        assert!(FinancingTerms::new(f64::NAN).validate().is_err());

        let mut terms = FinancingTerms::new(5.0);
        terms.financed_percent = 120.0;
        assert!(terms.validate().is_err());
    }

    fn input() -> ProjectInput {
        ProjectInput::new(CountryCategory::new(3).unwrap(), BuyerCategory::Cc1, 1_000_000.0)
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{"country_category": 2, "buyer_category": "CC2", "contract_value": 500000}"#;
        let parsed: ProjectInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.self_cost_percent, 100.0);
        assert_eq!(parsed.guarantee_percent, 0.0);
        assert!(parsed.tranches.is_empty());
        assert!(parsed.financing.is_none());

        let json = r#"{"country_category": 2, "buyer_category": "CC2", "contract_value": 1,
                       "financing": {"loan_tenor_years": 5}}"#;
        let parsed: ProjectInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.financing.unwrap().financed_percent, DEFAULT_FINANCED_PERCENT);
    }

    #[test]
    fn test_invalid_classification_in_json() {
        let json = r#"{"country_category": 8, "buyer_category": "CC2", "contract_value": 1}"#;
        assert!(serde_json::from_str::<ProjectInput>(json).is_err());

        let json = r#"{"country_category": 2, "buyer_category": "BBB", "contract_value": 1}"#;
        assert!(serde_json::from_str::<ProjectInput>(json).is_err());
    }

    #[test]
    fn test_effective_fbz() {
        let mut p = input();
        p.schedule.equipment.start_month = Some(10);
        assert_eq!(p.effective_fbz(), 3.0);
        p.fbz = Some(5.0);
        assert_eq!(p.effective_fbz(), 5.0);
    }

    #[test]
    fn test_validate() {
        assert!(input().validate().is_ok());

        let mut p = input();
        p.self_cost_percent = 120.0;
        assert!(p.validate().is_err());

        let mut p = input();
        p.contract_value = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = input();
        p.tranches = vec![
            PaymentTranche::new("Down payment", 0, 60.0, Phase::Equipment),
            PaymentTranche::new("Delivery", 12, 60.0, Phase::Equipment),
        ];
        assert!(p.validate().is_err());

        let mut p = input();
        p.financing = Some(FinancingTerms { loan_tenor_years: -2.0, financed_percent: 85.0 });
        assert!(p.validate().is_err());
    }
}
