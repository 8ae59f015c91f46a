//! Project schedule and payment tranche structures

use crate::error::PremiumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Labels that mark a tranche as a down payment (compared without case,
/// spaces, hyphens or underscores)
const DOWN_PAYMENT_LABELS: [&str; 3] = ["downpayment", "advancepayment", "anzahlung"];

/// Tolerance when checking that phase shares add up to at most 100 %
const SHARE_TOLERANCE: f64 = 1e-6;

/// Delivery phase of the export contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Engineering,
    Equipment,
    Spares,
    Erection,
    Assistance,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Engineering,
        Phase::Equipment,
        Phase::Spares,
        Phase::Erection,
        Phase::Assistance,
    ];

    /// Phases whose value is exposed to manufacturing risk
    pub const PRE_SHIPMENT: [Phase; 3] = [Phase::Engineering, Phase::Equipment, Phase::Spares];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Engineering => "engineering",
            Phase::Equipment => "equipment",
            Phase::Spares => "spares",
            Phase::Erection => "erection",
            Phase::Assistance => "assistance",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Equipment
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = PremiumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PremiumError::InvalidInput(format!("unknown phase '{}'", trimmed)))
    }
}

/// Start/end months and contract share of one phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    /// Month the phase starts (months from contract signature)
    #[serde(default)]
    pub start_month: Option<u32>,

    /// Month the phase ends
    #[serde(default)]
    pub end_month: Option<u32>,

    /// Share of the contract value in percent
    #[serde(default)]
    pub share_percent: f64,
}

impl PhaseWindow {
    pub fn new(start_month: Option<u32>, end_month: Option<u32>, share_percent: f64) -> Self {
        Self { start_month, end_month, share_percent }
    }

    /// Mean of start and end, or whichever bound is present, or 0
    pub fn average_month(&self) -> f64 {
        match (self.start_month, self.end_month) {
            (Some(start), Some(end)) => (start as f64 + end as f64) / 2.0,
            (Some(start), None) => start as f64,
            (None, Some(end)) => end as f64,
            (None, None) => 0.0,
        }
    }

    /// True when at least one bound is known
    pub fn has_bounds(&self) -> bool {
        self.start_month.is_some() || self.end_month.is_some()
    }

    /// True when only one bound is known
    pub fn is_partial(&self) -> bool {
        self.start_month.is_some() != self.end_month.is_some()
    }
}

/// Milestone used as starting point of the credit period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Commissioning,
    Pac,
    Fac,
}

/// Phases, contract shares and milestones of an export project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSchedule {
    #[serde(default)]
    pub engineering: PhaseWindow,
    #[serde(default)]
    pub equipment: PhaseWindow,
    #[serde(default)]
    pub spares: PhaseWindow,
    #[serde(default)]
    pub erection: PhaseWindow,
    #[serde(default)]
    pub assistance: PhaseWindow,

    /// Commissioning month (0 or absent = not set)
    #[serde(default)]
    pub commissioning_month: Option<u32>,

    /// Provisional acceptance month
    #[serde(default)]
    pub pac_month: Option<u32>,

    /// Final acceptance month
    #[serde(default)]
    pub fac_month: Option<u32>,
}

impl ProjectSchedule {
    pub fn phase(&self, phase: Phase) -> &PhaseWindow {
        match phase {
            Phase::Engineering => &self.engineering,
            Phase::Equipment => &self.equipment,
            Phase::Spares => &self.spares,
            Phase::Erection => &self.erection,
            Phase::Assistance => &self.assistance,
        }
    }

    /// Average delivery month of a phase
    pub fn average_month(&self, phase: Phase) -> f64 {
        self.phase(phase).average_month()
    }

    /// Contract share (percent) of engineering, equipment and spares
    pub fn pre_shipment_share(&self) -> f64 {
        Phase::PRE_SHIPMENT.iter().map(|p| self.phase(*p).share_percent).sum()
    }

    /// Contract share (percent) of all phases
    pub fn total_share(&self) -> f64 {
        Phase::ALL.iter().map(|p| self.phase(*p).share_percent).sum()
    }

    /// Equipment delivery start month (0 when unknown)
    pub fn equipment_start_month(&self) -> u32 {
        self.equipment.start_month.unwrap_or(0)
    }

    /// Fabrication period in 3-month units derived from the equipment start month
    pub fn fbz(&self) -> f64 {
        fbz_from_start_month(self.equipment_start_month())
    }

    /// Commissioning if set, otherwise FAC
    pub fn starting_point(&self) -> Option<(Milestone, u32)> {
        let set = |month: Option<u32>| month.filter(|m| *m > 0);
        set(self.commissioning_month)
            .map(|m| (Milestone::Commissioning, m))
            .or_else(|| set(self.fac_month).map(|m| (Milestone::Fac, m)))
    }

    /// Check shares and phase bounds
    pub fn validate(&self) -> Result<(), PremiumError> {
        for phase in Phase::ALL {
            let window = self.phase(phase);
            if !(0.0..=100.0).contains(&window.share_percent) {
                return Err(PremiumError::InvalidInput(format!(
                    "{} share must be within 0..=100 percent, got {}",
                    phase, window.share_percent
                )));
            }
            if let (Some(start), Some(end)) = (window.start_month, window.end_month) {
                if start > end {
                    return Err(PremiumError::InvalidInput(format!(
                        "{} starts in month {} after it ends in month {}",
                        phase, start, end
                    )));
                }
            }
        }

        let total = self.total_share();
        if total > 100.0 + SHARE_TOLERANCE {
            return Err(PremiumError::InvalidInput(format!(
                "phase shares add up to {} percent of the contract value",
                total
            )));
        }
        Ok(())
    }
}

/// FBZ: ceil(start_month / 4)
pub fn fbz_from_start_month(start_month: u32) -> f64 {
    start_month.div_ceil(4) as f64
}

/// One contractual payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTranche {
    pub name: String,

    /// Month the payment falls due
    pub payment_month: u32,

    /// Amount in percent of the contract value
    pub amount_percent: f64,

    /// Phase whose delivery the payment refers to
    #[serde(default)]
    pub phase: Phase,
}

impl PaymentTranche {
    pub fn new(name: impl Into<String>, payment_month: u32, amount_percent: f64, phase: Phase) -> Self {
        Self {
            name: name.into(),
            payment_month,
            amount_percent,
            phase,
        }
    }

    /// Down payments carry no post-shipment risk
    pub fn is_down_payment(&self) -> bool {
        let normalized: String = self
            .name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        DOWN_PAYMENT_LABELS.iter().any(|label| normalized.contains(label))
    }
}
