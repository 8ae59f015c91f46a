//! Premium calculation output structures

use crate::classification::{BuyerCategory, CountryCategory};
use crate::schedule::{Milestone, Phase};
use serde::{Deserialize, Serialize};

/// Pre-shipment and counter-guarantee premiums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreShipmentPremium {
    /// Fabrication period in 3-month units
    pub fbz: f64,

    /// sqrt(a * FBZ) + b, unrounded
    pub coefficient: f64,
    pub self_cost_percent: f64,
    /// Premium in percent of the pre-shipment contract value
    pub premium_percent: f64,
    /// Share of engineering, equipment and spares in percent
    pub covered_share_percent: f64,
    pub premium_amount: f64,
    pub formula: String,

    pub counter_guarantee_coefficient: f64,
    pub guarantee_percent: f64,
    pub counter_guarantee_percent: f64,
    /// Share of all phases in percent
    pub counter_guarantee_share_percent: f64,
    pub counter_guarantee_amount: f64,
    pub counter_guarantee_formula: String,
}

/// Short-term premium for one payment tranche
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranchePremium {
    pub name: String,
    pub phase: Phase,
    pub payment_month: u32,
    pub amount_percent: f64,
    pub average_phase_month: f64,
    /// Months after average delivery, rounded up
    pub risk_tenor: f64,
    pub down_payment: bool,
    /// round(m * tenor + n, 2); 0 for down payments
    pub rate_percent: f64,
    /// Rate scaled by the tranche amount, in percent of contract value
    pub premium_percent: f64,
    pub premium_amount: f64,
    pub formula: String,
}

/// Short-term post-shipment premiums over all tranches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostShipmentPremium {
    pub tranches: Vec<TranchePremium>,
    pub total_percent: f64,
    pub total_amount: f64,
}

/// Medium/long-term financing premium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermPremium {
    pub starting_point: Option<Milestone>,
    pub pre_risk_years: f64,
    pub loan_tenor_years: f64,
    pub risk_tenor_years: f64,
    /// round(m * tenor + n, 2), in percent of the financed amount
    pub rate_percent: f64,
    pub financed_percent: f64,
    pub financed_amount: f64,
    pub premium_amount: f64,
    pub formula: String,
}

/// Complete premium quote for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumQuote {
    /// Category of the buyer's country as supplied
    pub country_category: CountryCategory,
    /// Category whose rates were applied
    pub applied_category: CountryCategory,
    pub buyer_category: BuyerCategory,
    pub contract_value: f64,
    pub pre_shipment: PreShipmentPremium,
    pub post_shipment: PostShipmentPremium,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term: Option<LongTermPremium>,
    /// Sum of all premium amounts
    pub total_premium_amount: f64,
    pub warnings: Vec<String>,
}
