//! Pre-shipment and counter-guarantee rates by country category

use crate::classification::CountryCategory;

/// Coefficients for one country category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreShipmentRates {
    /// Multiplier under the square root
    pub a: f64,
    /// Additive constant
    pub b: f64,
    /// Counter-guarantee rate (percent of guarantee volume)
    pub counter_guarantee: f64,
}

impl PreShipmentRates {
    /// Pre-shipment rate in percent: sqrt(a * FBZ) + b
    pub fn coefficient(&self, fbz: f64) -> f64 {
        (self.a * fbz).sqrt() + self.b
    }
}

/// Categories 1..=7; category 0 is read through its benchmark
const PRE_SHIPMENT: [PreShipmentRates; 7] = [
    PreShipmentRates { a: 0.006, b: 0.264, counter_guarantee: 0.12 },
    PreShipmentRates { a: 0.021, b: 0.431, counter_guarantee: 0.20 },
    PreShipmentRates { a: 0.050, b: 0.573, counter_guarantee: 0.28 },
    PreShipmentRates { a: 0.071, b: 0.761, counter_guarantee: 0.36 },
    PreShipmentRates { a: 0.093, b: 1.206, counter_guarantee: 0.52 },
    PreShipmentRates { a: 0.232, b: 1.467, counter_guarantee: 0.68 },
    PreShipmentRates { a: 0.373, b: 1.785, counter_guarantee: 0.84 },
];

/// Fixed table of pre-shipment coefficients
#[derive(Debug, Clone)]
pub struct PreShipmentTable {
    rows: [PreShipmentRates; 7],
}

impl Default for PreShipmentTable {
    fn default() -> Self {
        Self { rows: PRE_SHIPMENT }
    }
}

impl PreShipmentTable {
    /// Rates for a category (category 0 returns category 1)
    pub fn rates(&self, category: CountryCategory) -> PreShipmentRates {
        self.rows[category.rate_index()]
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
    fn test_category_2_coefficient() {
        let table = PreShipmentTable::default();
        let rates = table.rates(cat(2));
        // sqrt(0.021 * 5) + 0.431
        assert_abs_diff_eq!(rates.coefficient(5.0), 0.755037, epsilon = 1e-6);
        assert_eq!(rates.counter_guarantee, 0.20);
    }

    #[test]
    fn test_monotone_in_fbz() {
        let table = PreShipmentTable::default();
        for c in 1..=7 {
            let rates = table.rates(cat(c));
            let mut previous = rates.coefficient(0.0);
            assert_eq!(previous, rates.b);
            for step in 1..=40 {
                let current = rates.coefficient(step as f64 * 0.5);
                assert!(current >= previous, "category {} not monotone at step {}", c, step);
                previous = current;
            }
        }
    }

    #[test]
    fn test_riskier_categories_cost_more() {
        let table = PreShipmentTable::default();
        for c in 2..=7 {
            assert!(table.rates(cat(c)).coefficient(4.0) > table.rates(cat(c - 1)).coefficient(4.0));
        }
    }

    #[test]
    fn test_category_zero_uses_benchmark() {
        let table = PreShipmentTable::default();
        assert_eq!(table.rates(cat(0)), table.rates(cat(1)));
    }
}
