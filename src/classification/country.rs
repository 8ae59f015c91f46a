//! Country risk categories

use crate::error::PremiumError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Country risk category 0..=7 (0 = high-income OECD, 7 = highest risk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CountryCategory(u8);

impl CountryCategory {
    pub const MAX: u8 = 7;

    /// Validated constructor
    pub fn new(value: i64) -> Result<Self, PremiumError> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PremiumError::InvalidCountryCategory(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Category 0 has no insurable short-term marketable risk under the
    /// government scheme, so rates are taken from category 1.
    pub fn needs_benchmark(&self) -> bool {
        self.0 == 0
    }

    /// Category whose rates apply (category 1 for category 0, otherwise itself)
    pub fn benchmark(&self) -> CountryCategory {
        if self.needs_benchmark() {
            CountryCategory(1)
        } else {
            *self
        }
    }

    /// Column index into the rate tables (categories 1..=7 map to 0..=6)
    pub(crate) fn rate_index(&self) -> usize {
        (self.benchmark().0 - 1) as usize
    }
}

impl TryFrom<i64> for CountryCategory {
    type Error = PremiumError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCategory> for u8 {
    fn from(category: CountryCategory) -> Self {
        category.0
    }
}

impl fmt::Display for CountryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(CountryCategory::new(0).is_ok());
        assert!(CountryCategory::new(7).is_ok());
        assert!(matches!(
            CountryCategory::new(8),
            Err(PremiumError::InvalidCountryCategory(8))
        ));
        assert!(CountryCategory::new(-1).is_err());
    }

    #[test]
    fn test_benchmark_substitution() {
        let oecd = CountryCategory::new(0).unwrap();
        assert!(oecd.needs_benchmark());
        assert_eq!(oecd.benchmark().value(), 1);
        assert_eq!(oecd.rate_index(), 0);

        let cat5 = CountryCategory::new(5).unwrap();
        assert!(!cat5.needs_benchmark());
        assert_eq!(cat5.benchmark(), cat5);
        assert_eq!(cat5.rate_index(), 4);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let cat: CountryCategory = serde_json::from_str("3").unwrap();
        assert_eq!(cat.value(), 3);
        assert_eq!(serde_json::to_string(&cat).unwrap(), "3");
        assert!(serde_json::from_str::<CountryCategory>("9").is_err());
    }
}
