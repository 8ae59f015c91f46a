//! Export Credit Premium - premium calculator for government-backed export credit cover
//!
//! This library provides:
//! - Country risk categories (0-7) and buyer credit grades (Sov+ .. CC5)
//! - Fixed rate tables for pre-shipment, counter-guarantee, short-term and long-term cover
//! - Project schedules with delivery phases, milestones and payment tranches
//! - A pure premium calculator producing percentages, amounts, formulas and warnings
//! - The request/response layer behind the HTTP endpoints

pub mod error;
pub mod classification;
pub mod rates;
pub mod schedule;
pub mod premium;
pub mod config;
pub mod api;

// Re-export commonly used types
pub use error::PremiumError;
pub use classification::{BuyerCategory, CountryCategory, CountryDirectory};
pub use rates::RateTables;
pub use schedule::{PaymentTranche, Phase, PhaseWindow, ProjectSchedule};
pub use premium::{FinancingTerms, PremiumCalculator, PremiumQuote, ProjectInput};
pub use api::PremiumService;
pub use config::Config;
