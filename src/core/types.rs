use serde::Serialize;
use thiserror::Error;

/// How stamp duty on the purchase is worked out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DutyMode {
    Fixed { amount: f64 },
    Tiered,
}

/// Where the money paid into super each year comes from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ContributionMode {
    /// Loan repayment net of rent, floored at zero.
    OpportunityCost,
    FixedPeriodic { amount: f64 },
}

/// Opening balance of the super account.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AccountSeed {
    StampDuty,
    Contribution,
    Empty,
}

#[derive(Debug, Clone)]
pub struct ProjectionInput {
    pub initial_property_value: f64,
    pub property_growth_rate: f64,
    pub annual_rent: f64,
    pub loan_term_years: u32,
    pub loan_interest_rate: f64,
    pub alt_account_growth_rate: f64,
    pub horizon_years: u32,
    pub contribution_mode: ContributionMode,
    pub duty_mode: DutyMode,
    pub account_seed: AccountSeed,
    pub include_seed_row: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    pub alt_balance: f64,
    pub difference: f64,
    pub interest: f64,
    pub principal: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub final_equity: f64,
    pub final_alt_balance: f64,
    pub final_difference: f64,
    /// First simulated year in which super is worth more than property equity.
    pub super_overtakes_year: Option<u32>,
    pub loan_repaid_year: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub stamp_duty: f64,
    pub annual_payment: f64,
    pub annual_contribution: f64,
    pub summary: ProjectionSummary,
    pub years: Vec<YearRecord>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("arithmetic precondition failed: {reason}")]
    ArithmeticPrecondition { reason: String },
}
