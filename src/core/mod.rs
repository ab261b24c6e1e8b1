mod duty;
mod engine;
mod types;

pub use duty::{DEFAULT_FIXED_DUTY, compute_duty};
pub use engine::{amortizing_payment, annual_contribution, project, run_projection};
pub use types::{
    AccountSeed, ContributionMode, DutyMode, ProjectionError, ProjectionInput, ProjectionReport,
    ProjectionSummary, YearRecord,
};
