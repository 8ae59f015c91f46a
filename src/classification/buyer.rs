//! Buyer credit grades

use crate::error::PremiumError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Credit grade of the foreign buyer, from sovereign to weakest corporate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuyerCategory {
    /// Sovereign, better than the country rating
    SovPlus,
    /// Sovereign
    Sov,
    /// Sovereign, weaker than the country rating
    SovMinus,
    Cc0,
    Cc1,
    Cc2,
    Cc3,
    Cc4,
    Cc5,
}

impl BuyerCategory {
    /// All grades in table column order
    pub const ALL: [BuyerCategory; 9] = [
        BuyerCategory::SovPlus,
        BuyerCategory::Sov,
        BuyerCategory::SovMinus,
        BuyerCategory::Cc0,
        BuyerCategory::Cc1,
        BuyerCategory::Cc2,
        BuyerCategory::Cc3,
        BuyerCategory::Cc4,
        BuyerCategory::Cc5,
    ];

    /// Label used in rate sheets and JSON
    pub fn label(&self) -> &'static str {
        match self {
            BuyerCategory::SovPlus => "Sov+",
            BuyerCategory::Sov => "Sov",
            BuyerCategory::SovMinus => "Sov-",
            BuyerCategory::Cc0 => "CC0",
            BuyerCategory::Cc1 => "CC1",
            BuyerCategory::Cc2 => "CC2",
            BuyerCategory::Cc3 => "CC3",
            BuyerCategory::Cc4 => "CC4",
            BuyerCategory::Cc5 => "CC5",
        }
    }

    /// Row index into the rate tables
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for BuyerCategory {
    type Err = PremiumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        BuyerCategory::ALL
            .iter()
            .copied()
            .find(|grade| grade.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PremiumError::UnknownBuyerCategory(trimmed.to_string()))
    }
}

impl fmt::Display for BuyerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BuyerCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BuyerCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
