//! Premium calculation for export credit cover

mod calculator;
mod input;
mod result;
pub mod tenor;

pub use calculator::PremiumCalculator;
pub use input::{FinancingTerms, ProjectInput, DEFAULT_FINANCED_PERCENT};
pub(crate) use input::{check_non_negative, check_percent};
pub use result::{LongTermPremium, PostShipmentPremium, PreShipmentPremium, PremiumQuote, TranchePremium};
pub use tenor::{risk_tenor, LongTermTenor};

/// Reported when category 0 is replaced by category 1 for short-term cover
pub const CATEGORY_ZERO_SHORT_TERM_WARNING: &str = "Country category 0: high-income OECD countries have no insurable short-term marketable risk under the government scheme. Country category 1 has been used as benchmark for the short-term premium.";

/// Reported when category 0 is replaced by category 1 for long-term cover
pub const CATEGORY_ZERO_LONG_TERM_WARNING: &str = "Country category 0: high-income OECD countries have no insurable short-term marketable risk under the government scheme. Country category 1 has been used as benchmark for the long-term financing premium.";

/// Reported when neither a commissioning nor a FAC month is known
pub const NO_STARTING_POINT_WARNING: &str = "No starting point of credit (commissioning or FAC month) given: a pre-risk period of 1 year is assumed.";

/// Reported when no FBZ is given and the equipment start month is unknown
pub const NO_EQUIPMENT_START_WARNING: &str = "No equipment delivery start month given: FBZ taken as 0.";

/// Reported with the phase name when a phase has no delivery window
pub const NO_DELIVERY_WINDOW_WARNING: &str = "No delivery window given, average delivery month taken as 0";

/// Reported with the phase name when only one delivery month is known
pub const PARTIAL_DELIVERY_WINDOW_WARNING: &str = "Only one delivery month given, it is used as average delivery month";

/// Round a currency amount to cents
pub fn round_amount(value: f64) -> f64 {
    crate::rates::round_two_decimals(value)
}
