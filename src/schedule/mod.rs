//! Project schedule, phases and payment tranches

mod data;
pub mod loader;

pub use data::{fbz_from_start_month, Milestone, PaymentTranche, Phase, PhaseWindow, ProjectSchedule};
pub use loader::{load_tranches, load_tranches_from_reader};
