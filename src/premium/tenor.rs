//! Risk tenors for post-shipment cover

use crate::schedule::{Milestone, ProjectSchedule};
use serde::Serialize;

/// Pre-risk period assumed when no starting point of credit is known
pub const DEFAULT_PRE_RISK_YEARS: f64 = 1.0;

/// Months between a payment and the average delivery month of its phase,
/// rounded up; 0 when the payment falls on or before that month.
pub fn risk_tenor(payment_month: u32, average_phase_month: f64) -> f64 {
    let gap = payment_month as f64 - average_phase_month;
    if gap <= 0.0 {
        0.0
    } else {
        gap.ceil()
    }
}

/// Long-term risk tenor in years and how it was derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongTermTenor {
    /// Milestone used as starting point of credit, if any
    pub starting_point: Option<Milestone>,
    /// Half the period between equipment start and starting point, in years
    pub pre_risk_years: f64,
    pub loan_tenor_years: f64,
    /// pre_risk_years + loan_tenor_years
    pub years: f64,
}

impl LongTermTenor {
    /// (starting_point − equipment_start_month) / 24 + loan tenor.
    ///
    /// Without a starting point the pre-risk period is [`DEFAULT_PRE_RISK_YEARS`].
    pub fn from_schedule(schedule: &ProjectSchedule, loan_tenor_years: f64) -> Self {
        let (starting_point, pre_risk_years) = match schedule.starting_point() {
            Some((milestone, month)) => {
                let months = month as f64 - schedule.equipment_start_month() as f64;
                (Some(milestone), (months / 24.0).max(0.0))
            }
            None => (None, DEFAULT_PRE_RISK_YEARS),
        };

        Self {
            starting_point,
            pre_risk_years,
            loan_tenor_years,
            years: pre_risk_years + loan_tenor_years,
        }
    }

    pub fn assumed_pre_risk(&self) -> bool {
        self.starting_point.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PhaseWindow;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_risk_tenor_zero_on_or_before_average() {
        assert_eq!(risk_tenor(10, 13.5), 0.0);
        assert_eq!(risk_tenor(13, 13.0), 0.0);
        assert_eq!(risk_tenor(0, 0.0), 0.0);
    }

    #[test]
    fn test_risk_tenor_rounds_up() {
        assert_eq!(risk_tenor(14, 13.5), 1.0);
        assert_eq!(risk_tenor(20, 13.5), 7.0);
        assert_eq!(risk_tenor(20, 13.0), 7.0);
    }

    #[test]
    fn test_risk_tenor_positive_exactly_after_average() {
        for month in 0..48u32 {
            for avg in [0.0, 6.0, 12.5, 30.0] {
                let tenor = risk_tenor(month, avg);
                assert!(tenor >= 0.0);
                assert_eq!(tenor == 0.0, month as f64 <= avg);
            }
        }
    }

    #[test]
    fn test_long_term_tenor_from_commissioning() {
        let schedule = ProjectSchedule {
            equipment: PhaseWindow::new(Some(6), Some(18), 70.0),
            commissioning_month: Some(30),
            fac_month: Some(42),
            ..Default::default()
        };
        let tenor = LongTermTenor::from_schedule(&schedule, 5.0);
        assert_eq!(tenor.starting_point, Some(Milestone::Commissioning));
        assert_abs_diff_eq!(tenor.pre_risk_years, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tenor.years, 6.0, epsilon = 1e-12);
        assert!(!tenor.assumed_pre_risk());
    }

    #[test]
    fn test_long_term_tenor_falls_back_to_fac() {
        let schedule = ProjectSchedule {
            equipment: PhaseWindow::new(Some(0), Some(12), 70.0),
            fac_month: Some(36),
            ..Default::default()
        };
        let tenor = LongTermTenor::from_schedule(&schedule, 8.5);
        assert_eq!(tenor.starting_point, Some(Milestone::Fac));
        assert_abs_diff_eq!(tenor.years, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_long_term_tenor_without_starting_point() {
        let schedule = ProjectSchedule::default();
        let tenor = LongTermTenor::from_schedule(&schedule, 7.0);
        assert!(tenor.assumed_pre_risk());
        assert_eq!(tenor.pre_risk_years, DEFAULT_PRE_RISK_YEARS);
        assert_eq!(tenor.years, 8.0);
    }
}
