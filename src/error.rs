//! Error types for premium calculation

use thiserror::Error;

/// Errors raised while classifying a project or computing its premiums
#[derive(Debug, Error)]
pub enum PremiumError {
    /// Buyer grade label outside the nine known grades
    #[error("invalid classification: unknown buyer category '{0}' (expected one of Sov+, Sov, Sov-, CC0..CC5)")]
    UnknownBuyerCategory(String),

    /// Country category outside 0..=7
    #[error("invalid classification: country category {0} is outside 0..=7")]
    InvalidCountryCategory(i64),

    /// Country name has no entry in the category table
    #[error("invalid classification: no country category found for '{0}'")]
    CountryNotFound(String),

    /// Neither a country name nor a category was supplied
    #[error("invalid classification: no country category supplied")]
    MissingCountryCategory,

    /// The rate table has no coefficients for this grade/category pair
    #[error("invalid classification: buyer category {buyer} is not insurable in country category {country} ({table} table)")]
    UnsupportedCombination {
        table: &'static str,
        country: u8,
        buyer: &'static str,
    },

    /// A numeric input is out of its allowed range
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reference data could not be read
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
}

impl PremiumError {
    /// Whether the error comes from classification lookups rather than malformed input
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            PremiumError::UnknownBuyerCategory(_)
                | PremiumError::InvalidCountryCategory(_)
                | PremiumError::CountryNotFound(_)
                | PremiumError::MissingCountryCategory
                | PremiumError::UnsupportedCombination { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PremiumError>;
