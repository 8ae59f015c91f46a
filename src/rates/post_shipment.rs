//! Post-shipment rate grids (short-term and long-term)
//!
//! Each grid is laid out like the published short-term rate sheet: one row per country
//! category 1..=7, one column per buyer grade (Sov+ .. CC5). A rate is
//! `slope * tenor + intercept`. Empty cells are grade/category pairs that
//! are not insurable and are reported as unsupported.

use super::round_percent;
use crate::classification::{BuyerCategory, CountryCategory};
use crate::error::PremiumError;

/// Slope/intercept pair for one grade and category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCell {
    pub slope: f64,
    pub intercept: f64,
}

impl RateCell {
    /// Unrounded rate in percent for a risk tenor
    pub fn rate(&self, tenor: f64) -> f64 {
        self.slope * tenor + self.intercept
    }
}

const fn c(slope: f64, intercept: f64) -> Option<RateCell> {
    Some(RateCell { slope, intercept })
}

const NA: Option<RateCell> = None;

type Grid = [[Option<RateCell>; 9]; 7];

/// Short-term cover, tenor in months
#[rustfmt::skip]
const SHORT_TERM: Grid = [
    //  Sov+              Sov               Sov-              CC0               CC1               CC2               CC3               CC4               CC5
    [c(0.0086, 0.27), c(0.0095, 0.30), c(0.0105, 0.33), c(0.0095, 0.30), c(0.0165, 0.35), c(0.0218, 0.40), c(0.0254, 0.46), c(0.0345, 0.51), c(0.0510, 0.56)],
    [c(0.0092, 0.45), c(0.0102, 0.50), c(0.0112, 0.55), c(0.0102, 0.50), c(0.0180, 0.55), c(0.0234, 0.60), c(0.0302, 0.66), c(0.0395, 0.71), c(0.0553, 0.76)],
    [c(0.0125, 0.63), c(0.0139, 0.70), c(0.0153, 0.77), c(0.0139, 0.70), c(0.0208, 0.75), c(0.0279, 0.80), c(0.0337, 0.86), c(0.0459, 0.91), c(0.0622, 0.96)],
    [c(0.0197, 0.81), c(0.0219, 0.90), c(0.0241, 0.99), c(0.0219, 0.90), c(0.0279, 0.95), c(0.0367, 1.00), c(0.0440, 1.06), c(0.0574, 1.11), c(0.0773, 1.16)],
    [c(0.0334, 1.17), c(0.0371, 1.30), c(0.0409, 1.43), c(0.0371, 1.30), c(0.0426, 1.37), c(0.0518, 1.43), c(0.0601, 1.50), c(0.0771, 1.56), NA],
    [c(0.0465, 1.53), c(0.0517, 1.70), c(0.0569, 1.87), c(0.0517, 1.70), c(0.0562, 1.79), c(0.0655, 1.87), c(0.0800, 1.96), NA,              NA],
    [c(0.0682, 1.89), c(0.0758, 2.10), c(0.0834, 2.31), c(0.0758, 2.10), c(0.0806, 2.23), c(0.0871, 2.36), NA,              NA,              NA],
];

/// Medium/long-term financing cover, tenor in years. Illustrative figures
/// scaled from the short-term sheet, not official rates.
#[rustfmt::skip]
const LONG_TERM: Grid = [
    //  Sov+              Sov               Sov-              CC0               CC1               CC2               CC3               CC4               CC5
    [c(0.162, 0.23), c(0.180, 0.25), c(0.198, 0.28), c(0.180, 0.25), c(0.191, 0.27), c(0.203, 0.28), c(0.220, 0.30), c(0.238, 0.33), c(0.261, 0.36)],
    [c(0.270, 0.36), c(0.300, 0.40), c(0.330, 0.44), c(0.300, 0.40), c(0.318, 0.42), c(0.339, 0.45), c(0.366, 0.49), c(0.396, 0.53), c(0.435, 0.58)],
    [c(0.378, 0.50), c(0.420, 0.55), c(0.462, 0.61), c(0.420, 0.55), c(0.445, 0.58), c(0.475, 0.62), c(0.512, 0.67), c(0.554, 0.73), c(0.609, 0.80)],
    [c(0.495, 0.63), c(0.550, 0.70), c(0.605, 0.77), c(0.550, 0.70), c(0.583, 0.74), c(0.621, 0.79), c(0.671, 0.85), c(0.726, 0.92), c(0.797, 1.01)],
    [c(0.720, 0.85), c(0.800, 0.95), c(0.880, 1.04), c(0.800, 0.95), c(0.848, 1.01), c(0.904, 1.07), c(0.976, 1.16), c(1.056, 1.25), NA],
    [c(0.945, 1.08), c(1.050, 1.20), c(1.155, 1.32), c(1.050, 1.20), c(1.113, 1.27), c(1.186, 1.36), c(1.281, 1.46), NA,             NA],
    [c(1.215, 1.35), c(1.350, 1.50), c(1.485, 1.65), c(1.350, 1.50), c(1.431, 1.59), c(1.525, 1.69), NA,             NA,             NA],
];

/// A slope/intercept grid indexed by (country category, buyer grade)
#[derive(Debug, Clone)]
pub struct RateGrid {
    name: &'static str,
    cells: Grid,
}

impl RateGrid {
    /// Short-term grid (tenor in months)
    pub fn short_term() -> Self {
        Self { name: "short-term", cells: SHORT_TERM }
    }

    /// Long-term grid (tenor in years), illustrative rates only
    pub fn long_term() -> Self {
        Self { name: "long-term", cells: LONG_TERM }
    }

    /// Coefficients for a pair; category 0 reads category 1
    pub fn cell(&self, country: CountryCategory, buyer: BuyerCategory) -> Result<RateCell, PremiumError> {
        let benchmark = country.benchmark();
        self.cells[country.rate_index()][buyer.index()].ok_or(PremiumError::UnsupportedCombination {
            table: self.name,
            country: benchmark.value(),
            buyer: buyer.label(),
        })
    }

    /// Rate in percent rounded to two decimals: round(slope * tenor + intercept, 2)
    pub fn premium(&self, country: CountryCategory, buyer: BuyerCategory, tenor: f64) -> Result<f64, PremiumError> {
        if tenor.is_nan() || tenor < 0.0 {
            return Err(PremiumError::InvalidInput(format!(
                "risk tenor must be non-negative, got {}",
                tenor
            )));
        }
        let cell = self.cell(country, buyer)?;
        log::debug!(
            "{} rate: cat {} {} tenor {} -> m={} n={}",
            self.name,
            country.benchmark(),
            buyer,
            tenor,
            cell.slope,
            cell.intercept
        );
        Ok(round_percent(cell.rate(tenor)))
    }

    /// Whether the pair has coefficients
    pub fn supports(&self, country: CountryCategory, buyer: BuyerCategory) -> bool {
        self.cells[country.rate_index()][buyer.index()].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cat(value: i64) -> CountryCategory {
        CountryCategory::new(value).unwrap()
    }

    #[test]
    fn test_short_term_reference_example() {
        let grid = RateGrid::short_term();
        let cell = grid.cell(cat(2), BuyerCategory::Cc2).unwrap();
        assert_eq!(cell.slope, 0.0234);
        assert_eq!(cell.intercept, 0.6);
        assert_abs_diff_eq!(grid.premium(cat(2), BuyerCategory::Cc2, 1.0).unwrap(), 0.62, epsilon = 1e-12);
    }

    #[test]
    fn test_category_zero_matches_category_one() {
        for grid in [RateGrid::short_term(), RateGrid::long_term()] {
            let zero = grid.premium(cat(0), BuyerCategory::Cc2, 1.0).unwrap();
            let one = grid.premium(cat(1), BuyerCategory::Cc2, 1.0).unwrap();
            assert_eq!(zero.to_bits(), one.to_bits());
        }
    }

    #[test]
    fn test_unsupported_cells() {
        let grid = RateGrid::short_term();
        assert!(!grid.supports(cat(5), BuyerCategory::Cc5));
        assert!(!grid.supports(cat(6), BuyerCategory::Cc4));
        assert!(!grid.supports(cat(7), BuyerCategory::Cc3));
        assert!(grid.supports(cat(7), BuyerCategory::Cc2));

        let err = grid.premium(cat(7), BuyerCategory::Cc3, 2.0).unwrap_err();
        assert!(err.is_classification());
        assert!(matches!(
            err,
            PremiumError::UnsupportedCombination { table: "short-term", country: 7, buyer: "CC3" }
        ));
    }

    #[test]
    fn test_long_term_has_same_gaps_as_short_term() {
        let short = RateGrid::short_term();
        let long = RateGrid::long_term();
        for c in 1..=7 {
            for grade in BuyerCategory::ALL {
                assert_eq!(short.supports(cat(c), grade), long.supports(cat(c), grade));
            }
        }
    }

    #[test]
    fn test_negative_tenor_rejected() {
        let grid = RateGrid::short_term();
        assert!(matches!(
            grid.premium(cat(3), BuyerCategory::Sov, -1.0),
            Err(PremiumError::InvalidInput(_))
        ));
        assert!(grid.premium(cat(3), BuyerCategory::Sov, f64::NAN).is_err());
    }

    #[test]
    fn test_rate_grows_with_tenor() {
        let grid = RateGrid::long_term();
        let short_loan = grid.premium(cat(4), BuyerCategory::Cc1, 2.0).unwrap();
        let long_loan = grid.premium(cat(4), BuyerCategory::Cc1, 10.0).unwrap();
        assert!(long_loan > short_loan);
    }
}
