use log::debug;

use super::duty::compute_duty;
use super::types::{
    AccountSeed, ContributionMode, ProjectionError, ProjectionInput, ProjectionReport,
    ProjectionSummary, YearRecord,
};

// Balances under a cent count as repaid when reporting the payoff year.
const REPAID_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct LoanState {
    balance: f64,
    annual_payment: f64,
    interest_rate: f64,
}

#[derive(Debug, Clone, Copy)]
struct ProjectionState {
    year: u32,
    property_value: f64,
    loan: LoanState,
    alt_balance: f64,
}

/// Rates and cash flows fixed for the whole run, resolved before the first year.
#[derive(Debug, Clone, Copy)]
struct StepRules {
    property_growth_rate: f64,
    alt_account_growth_rate: f64,
    annual_contribution: f64,
}

#[derive(Debug, Clone, Copy)]
struct Opening {
    state: ProjectionState,
    rules: StepRules,
    stamp_duty: f64,
}

/// Level annual repayment that clears `balance` over `term_years` at `rate`.
pub fn amortizing_payment(
    balance: f64,
    rate: f64,
    term_years: u32,
) -> Result<f64, ProjectionError> {
    if term_years == 0 {
        return Err(ProjectionError::ArithmeticPrecondition {
            reason: "loan term must be at least one year".to_string(),
        });
    }
    if rate == 0.0 {
        return Err(ProjectionError::ArithmeticPrecondition {
            reason: "loan interest rate of zero divides by zero in the annuity formula"
                .to_string(),
        });
    }

    let Ok(exponent) = i32::try_from(term_years) else {
        return Err(ProjectionError::ArithmeticPrecondition {
            reason: format!("loan term of {term_years} years is out of range"),
        });
    };

    let factor = (1.0 + rate).powi(exponent);
    let denom = factor - 1.0;
    if denom == 0.0 {
        return Err(ProjectionError::ArithmeticPrecondition {
            reason: format!("loan interest rate {rate} is too small to amortize"),
        });
    }
    let payment = balance * rate * factor / denom;
    if !payment.is_finite() {
        return Err(ProjectionError::ArithmeticPrecondition {
            reason: format!(
                "annuity factor overflows for a {term_years}-year loan at rate {rate}"
            ),
        });
    }
    Ok(payment)
}

/// Amount paid into super each year. Rent above the repayment is not banked.
pub fn annual_contribution(mode: ContributionMode, annual_payment: f64, annual_rent: f64) -> f64 {
    match mode {
        ContributionMode::OpportunityCost => (annual_payment - annual_rent).max(0.0),
        ContributionMode::FixedPeriodic { amount } => amount,
    }
}

pub fn project(input: &ProjectionInput) -> Result<Vec<YearRecord>, ProjectionError> {
    let opening = open_projection(input)?;
    Ok(fold_years(input, opening))
}

pub fn run_projection(input: &ProjectionInput) -> Result<ProjectionReport, ProjectionError> {
    let opening = open_projection(input)?;
    let years = fold_years(input, opening);
    let summary = summarize(&years, record_for(&opening.state, 0.0, 0.0, 0.0));

    Ok(ProjectionReport {
        stamp_duty: opening.stamp_duty,
        annual_payment: opening.state.loan.annual_payment,
        annual_contribution: opening.rules.annual_contribution,
        summary,
        years,
    })
}

fn open_projection(input: &ProjectionInput) -> Result<Opening, ProjectionError> {
    // Fully financed purchase: the loan starts at the full property value.
    let balance = input.initial_property_value;
    let annual_payment =
        amortizing_payment(balance, input.loan_interest_rate, input.loan_term_years)?;
    let stamp_duty = compute_duty(input.initial_property_value, input.duty_mode);
    let contribution =
        annual_contribution(input.contribution_mode, annual_payment, input.annual_rent);

    let alt_balance = match input.account_seed {
        AccountSeed::StampDuty => stamp_duty,
        AccountSeed::Contribution => contribution,
        AccountSeed::Empty => 0.0,
    };

    debug!(
        "projection opened: payment={annual_payment:.2} duty={stamp_duty:.2} contribution={contribution:.2} horizon={}",
        input.horizon_years
    );

    Ok(Opening {
        state: ProjectionState {
            year: 0,
            property_value: input.initial_property_value,
            loan: LoanState {
                balance,
                annual_payment,
                interest_rate: input.loan_interest_rate,
            },
            alt_balance,
        },
        rules: StepRules {
            property_growth_rate: input.property_growth_rate,
            alt_account_growth_rate: input.alt_account_growth_rate,
            annual_contribution: contribution,
        },
        stamp_duty,
    })
}

fn fold_years(input: &ProjectionInput, opening: Opening) -> Vec<YearRecord> {
    let seed_rows = usize::from(input.include_seed_row);
    let mut records = Vec::with_capacity(input.horizon_years as usize + seed_rows);
    if input.include_seed_row {
        records.push(record_for(&opening.state, 0.0, 0.0, 0.0));
    }

    let mut state = opening.state;
    for _ in 0..input.horizon_years {
        let (next, record) = advance(state, opening.rules);
        records.push(record);
        state = next;
    }
    records
}

fn advance(state: ProjectionState, rules: StepRules) -> (ProjectionState, YearRecord) {
    let property_value = state.property_value * (1.0 + rules.property_growth_rate);
    let (loan, interest, principal) = amortize_year(state.loan);
    let alt_balance =
        state.alt_balance * (1.0 + rules.alt_account_growth_rate) + rules.annual_contribution;

    let next = ProjectionState {
        year: state.year + 1,
        property_value,
        loan,
        alt_balance,
    };
    let record = record_for(&next, interest, principal, rules.annual_contribution);
    (next, record)
}

fn amortize_year(loan: LoanState) -> (LoanState, f64, f64) {
    if loan.balance <= 0.0 {
        return (loan, 0.0, 0.0);
    }
    let interest = loan.balance * loan.interest_rate;
    let principal = loan.annual_payment - interest;
    let balance = (loan.balance - principal).max(0.0);
    // Report what actually came off the balance; the final payment may overshoot.
    let repaid = loan.balance - balance;
    (LoanState { balance, ..loan }, interest, repaid)
}

fn record_for(
    state: &ProjectionState,
    interest: f64,
    principal: f64,
    contribution: f64,
) -> YearRecord {
    let equity = state.property_value - state.loan.balance;
    YearRecord {
        year: state.year,
        property_value: state.property_value,
        loan_balance: state.loan.balance,
        equity,
        alt_balance: state.alt_balance,
        difference: equity - state.alt_balance,
        interest,
        principal,
        contribution,
    }
}

fn summarize(years: &[YearRecord], opening: YearRecord) -> ProjectionSummary {
    let last = years.last().copied().unwrap_or(opening);
    let simulated = || years.iter().filter(|r| r.year > 0);

    ProjectionSummary {
        final_equity: last.equity,
        final_alt_balance: last.alt_balance,
        final_difference: last.difference,
        super_overtakes_year: simulated()
            .find(|r| r.alt_balance > r.equity)
            .map(|r| r.year),
        loan_repaid_year: simulated()
            .find(|r| r.loan_balance < REPAID_TOLERANCE)
            .map(|r| r.year),
    }
}
