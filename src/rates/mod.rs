//! Premium rate tables compiled into the program

mod pre_shipment;
mod post_shipment;

pub use pre_shipment::{PreShipmentRates, PreShipmentTable};
pub use post_shipment::{RateCell, RateGrid};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round the exact binary value to two decimals, ties to even.
///
/// Scaling by 100 first would turn 0.485 (stored just below the tie) into
/// 0.49; quoted rates read 0.48.
pub(crate) fn round_two_decimals(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Round a percentage to two decimals, the precision rates are quoted in
pub fn round_percent(value: f64) -> f64 {
    round_two_decimals(value)
}

/// Container for all rate tables used by the calculator
#[derive(Debug, Clone)]
pub struct RateTables {
    pub pre_shipment: PreShipmentTable,
    pub short_term: RateGrid,
    pub long_term: RateGrid,
}

impl RateTables {
    /// Short-term and pre-shipment rates as published. The long-term grid
    /// is illustrative, not an official rate sheet.
    pub fn standard() -> Self {
        Self {
            pre_shipment: PreShipmentTable::default(),
            short_term: RateGrid::short_term(),
            long_term: RateGrid::long_term(),
        }
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(0.6234), 0.62);
        assert_eq!(round_percent(0.641781), 0.64);
        assert_eq!(round_percent(1.0), 1.0);
        assert_eq!(round_percent(0.0), 0.0);
    }

    #[test]
    fn test_round_percent_uses_stored_value() {
        // 0.0086 * 25 + 0.27 and 0.0095 * 30 + 0.30 are stored just below .xx5
        assert_eq!(round_percent(0.0086 * 25.0 + 0.27), 0.48);
        assert_eq!(round_percent(0.0095 * 30.0 + 0.30), 0.58);
        assert_eq!(round_percent(0.1005), 0.1);
        assert_eq!(round_percent(2.0825), 2.08);
        assert_eq!(round_percent(-0.125), -0.12);
    }

    #[test]
    fn test_round_percent_non_finite_passes_through() {
        assert!(round_percent(f64::NAN).is_nan());
        assert_eq!(round_percent(f64::INFINITY), f64::INFINITY);
    }
}
