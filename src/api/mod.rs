use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    AccountSeed, ContributionMode, DEFAULT_FIXED_DUTY, DutyMode, ProjectionError,
    ProjectionInput, ProjectionReport, run_projection,
};

const MAX_HORIZON_YEARS: u32 = 100;
const MAX_LOAN_TERM_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliContributionMode {
    OpportunityCost,
    FixedPeriodic,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliDutyMode {
    Tiered,
    Fixed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliAccountSeed {
    StampDuty,
    Contribution,
    Empty,
}

impl From<CliAccountSeed> for AccountSeed {
    fn from(value: CliAccountSeed) -> Self {
        match value {
            CliAccountSeed::StampDuty => AccountSeed::StampDuty,
            CliAccountSeed::Contribution => AccountSeed::Contribution,
            CliAccountSeed::Empty => AccountSeed::Empty,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiContributionMode {
    #[serde(alias = "opportunityCost", alias = "opportunity_cost")]
    OpportunityCost,
    #[serde(alias = "fixedPeriodic", alias = "fixed_periodic", alias = "fixed")]
    FixedPeriodic,
}

impl From<ApiContributionMode> for CliContributionMode {
    fn from(value: ApiContributionMode) -> Self {
        match value {
            ApiContributionMode::OpportunityCost => CliContributionMode::OpportunityCost,
            ApiContributionMode::FixedPeriodic => CliContributionMode::FixedPeriodic,
        }
    }
}

impl From<ContributionMode> for ApiContributionMode {
    fn from(value: ContributionMode) -> Self {
        match value {
            ContributionMode::OpportunityCost => ApiContributionMode::OpportunityCost,
            ContributionMode::FixedPeriodic { .. } => ApiContributionMode::FixedPeriodic,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDutyMode {
    #[serde(alias = "nsw", alias = "schedule")]
    Tiered,
    #[serde(alias = "flat", alias = "fixedAmount", alias = "fixed_amount")]
    Fixed,
}

impl From<ApiDutyMode> for CliDutyMode {
    fn from(value: ApiDutyMode) -> Self {
        match value {
            ApiDutyMode::Tiered => CliDutyMode::Tiered,
            ApiDutyMode::Fixed => CliDutyMode::Fixed,
        }
    }
}

impl From<DutyMode> for ApiDutyMode {
    fn from(value: DutyMode) -> Self {
        match value {
            DutyMode::Tiered => ApiDutyMode::Tiered,
            DutyMode::Fixed { .. } => ApiDutyMode::Fixed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiAccountSeed {
    #[serde(alias = "stampDuty", alias = "stamp_duty", alias = "duty")]
    StampDuty,
    Contribution,
    #[serde(alias = "none", alias = "zero")]
    Empty,
}

impl From<ApiAccountSeed> for CliAccountSeed {
    fn from(value: ApiAccountSeed) -> Self {
        match value {
            ApiAccountSeed::StampDuty => CliAccountSeed::StampDuty,
            ApiAccountSeed::Contribution => CliAccountSeed::Contribution,
            ApiAccountSeed::Empty => CliAccountSeed::Empty,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    property_value: Option<f64>,
    property_growth: Option<f64>,
    annual_rent: Option<f64>,
    loan_years: Option<u32>,
    loan_rate: Option<f64>,
    super_growth: Option<f64>,
    years: Option<u32>,

    contribution_mode: Option<ApiContributionMode>,
    fixed_contribution: Option<f64>,
    duty_mode: Option<ApiDutyMode>,
    fixed_duty: Option<f64>,
    account_seed: Option<ApiAccountSeed>,
    seed_row: Option<bool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "property_vs_super",
    about = "Year-by-year projection of a fully financed property against reinvesting its cash flow into super"
)]
pub struct Cli {
    #[arg(long, default_value_t = 1_300_000.0, help = "Purchase price of the property")]
    property_value: f64,
    #[arg(
        long,
        default_value_t = 3.5,
        help = "Annual property growth rate in percent"
    )]
    property_growth_rate: f64,
    #[arg(long, default_value_t = 54_000.0, help = "Annual rent received")]
    annual_rent: f64,
    #[arg(long, default_value_t = 30, help = "Loan term in years")]
    loan_term_years: u32,
    #[arg(
        long,
        default_value_t = 5.09,
        help = "Annual loan interest rate in percent"
    )]
    loan_interest_rate: f64,
    #[arg(long, default_value_t = 7.5, help = "Annual super growth rate in percent")]
    super_growth_rate: f64,
    #[arg(long, default_value_t = 30, help = "Number of years to project")]
    years: u32,
    #[arg(
        long,
        value_enum,
        default_value_t = CliContributionMode::OpportunityCost,
        help = "Reinvest loan repayments net of rent, or pay a fixed amount into super each year"
    )]
    contribution_mode: CliContributionMode,
    #[arg(
        long,
        help = "Annual super contribution; required when --contribution-mode=fixed-periodic"
    )]
    fixed_contribution: Option<f64>,
    #[arg(
        long,
        value_enum,
        default_value_t = CliDutyMode::Tiered,
        help = "Stamp duty from the NSW schedule or a fixed override"
    )]
    duty_mode: CliDutyMode,
    #[arg(
        long,
        help = "Stamp duty used when --duty-mode=fixed; defaults to 55000"
    )]
    fixed_duty: Option<f64>,
    #[arg(
        long,
        value_enum,
        help = "Opening super balance; defaults to stamp-duty for opportunity-cost and contribution for fixed-periodic"
    )]
    account_seed: Option<CliAccountSeed>,
    #[arg(long, help = "Emit a year-zero row with the opening values")]
    seed_row: bool,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: ProjectionInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    contribution_mode: ApiContributionMode,
    duty_mode: ApiDutyMode,
    horizon_years: u32,
    #[serde(flatten)]
    report: ProjectionReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<ProjectionInput, String> {
    if !cli.property_value.is_finite() || cli.property_value <= 0.0 {
        return Err("--property-value must be > 0".to_string());
    }

    if !cli.annual_rent.is_finite() || cli.annual_rent < 0.0 {
        return Err("--annual-rent must be >= 0".to_string());
    }

    // Zero rate and zero term are left to the engine, which reports them as
    // arithmetic precondition failures.
    if !cli.loan_interest_rate.is_finite() || cli.loan_interest_rate < 0.0 {
        return Err("--loan-interest-rate must be >= 0".to_string());
    }

    for (name, rate) in [
        ("--property-growth-rate", cli.property_growth_rate),
        ("--super-growth-rate", cli.super_growth_rate),
    ] {
        if !rate.is_finite() || rate <= -100.0 {
            return Err(format!("{name} must be > -100"));
        }
    }

    if cli.years > MAX_HORIZON_YEARS {
        return Err(format!("--years must be <= {MAX_HORIZON_YEARS}"));
    }

    if cli.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(format!(
            "--loan-term-years must be <= {MAX_LOAN_TERM_YEARS}"
        ));
    }

    let contribution_mode = match cli.contribution_mode {
        CliContributionMode::OpportunityCost => ContributionMode::OpportunityCost,
        CliContributionMode::FixedPeriodic => {
            let Some(amount) = cli.fixed_contribution else {
                return Err(
                    "--fixed-contribution is required when --contribution-mode=fixed-periodic"
                        .to_string(),
                );
            };
            if !amount.is_finite() || amount < 0.0 {
                return Err("--fixed-contribution must be >= 0".to_string());
            }
            ContributionMode::FixedPeriodic { amount }
        }
    };

    let duty_mode = match cli.duty_mode {
        CliDutyMode::Tiered => DutyMode::Tiered,
        CliDutyMode::Fixed => {
            let amount = cli.fixed_duty.unwrap_or(DEFAULT_FIXED_DUTY);
            if !amount.is_finite() || amount < 0.0 {
                return Err("--fixed-duty must be >= 0".to_string());
            }
            DutyMode::Fixed { amount }
        }
    };

    let account_seed = cli.account_seed.map(AccountSeed::from).unwrap_or(
        match contribution_mode {
            ContributionMode::OpportunityCost => AccountSeed::StampDuty,
            ContributionMode::FixedPeriodic { .. } => AccountSeed::Contribution,
        },
    );

    Ok(ProjectionInput {
        initial_property_value: cli.property_value,
        property_growth_rate: cli.property_growth_rate / 100.0,
        annual_rent: cli.annual_rent,
        loan_term_years: cli.loan_term_years,
        loan_interest_rate: cli.loan_interest_rate / 100.0,
        alt_account_growth_rate: cli.super_growth_rate / 100.0,
        horizon_years: cli.years,
        contribution_mode,
        duty_mode,
        account_seed,
        include_seed_row: cli.seed_row,
    })
}

/// Runs one projection from command-line flags and prints the report as JSON.
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let inputs = build_inputs(cli)?;
    let report = run_projection(&inputs).map_err(|e| e.to_string())?;
    let response = build_project_response(&inputs, report);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize projection: {e}"))?;
    println!("{json}");
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!("Projection HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    let report = match run_projection(&request.inputs) {
        Ok(report) => report,
        Err(err @ ProjectionError::ArithmeticPrecondition { .. }) => {
            warn!("projection failed: {err}");
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string());
        }
    };
    debug!("projection produced {} rows", report.years.len());

    json_response(
        StatusCode::OK,
        build_project_response(&request.inputs, report),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.property_value {
        cli.property_value = v;
    }
    if let Some(v) = payload.property_growth {
        cli.property_growth_rate = v;
    }
    if let Some(v) = payload.annual_rent {
        cli.annual_rent = v;
    }
    if let Some(v) = payload.loan_years {
        cli.loan_term_years = v;
    }
    if let Some(v) = payload.loan_rate {
        cli.loan_interest_rate = v;
    }
    if let Some(v) = payload.super_growth {
        cli.super_growth_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }

    if let Some(v) = payload.contribution_mode {
        cli.contribution_mode = v.into();
    }
    if let Some(v) = payload.fixed_contribution {
        cli.fixed_contribution = Some(v);
    }
    if let Some(v) = payload.duty_mode {
        cli.duty_mode = v.into();
    }
    if let Some(v) = payload.fixed_duty {
        cli.fixed_duty = Some(v);
    }
    if let Some(v) = payload.account_seed {
        cli.account_seed = Some(v.into());
    }
    if let Some(v) = payload.seed_row {
        cli.seed_row = v;
    }

    let inputs = build_inputs(cli)?;
    Ok(ApiRequest { inputs })
}

fn default_cli_for_api() -> Cli {
    Cli {
        property_value: 1_300_000.0,
        property_growth_rate: 3.5,
        annual_rent: 54_000.0,
        loan_term_years: 30,
        loan_interest_rate: 5.09,
        super_growth_rate: 7.5,
        years: 30,
        contribution_mode: CliContributionMode::OpportunityCost,
        fixed_contribution: None,
        duty_mode: CliDutyMode::Tiered,
        fixed_duty: None,
        account_seed: None,
        seed_row: false,
    }
}

fn build_project_response(inputs: &ProjectionInput, report: ProjectionReport) -> ProjectResponse {
    ProjectResponse {
        contribution_mode: inputs.contribution_mode.into(),
        duty_mode: inputs.duty_mode.into(),
        horizon_years: inputs.horizon_years,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_inputs_converts_percentages_to_fractions() {
        let inputs = build_inputs(sample_cli()).expect("valid inputs");
        assert_approx(inputs.initial_property_value, 1_300_000.0);
        assert_approx(inputs.property_growth_rate, 0.035);
        assert_approx(inputs.loan_interest_rate, 0.0509);
        assert_approx(inputs.alt_account_growth_rate, 0.075);
        assert_eq!(inputs.loan_term_years, 30);
        assert_eq!(inputs.horizon_years, 30);
        assert_eq!(inputs.contribution_mode, ContributionMode::OpportunityCost);
        assert_eq!(inputs.duty_mode, DutyMode::Tiered);
        assert_eq!(inputs.account_seed, AccountSeed::StampDuty);
        assert!(!inputs.include_seed_row);
    }

    #[test]
    fn build_inputs_defaults_seed_to_contribution_for_fixed_mode() {
        let mut cli = sample_cli();
        cli.contribution_mode = CliContributionMode::FixedPeriodic;
        cli.fixed_contribution = Some(27_500.0);

        let inputs = build_inputs(cli).expect("valid inputs");
        assert_eq!(
            inputs.contribution_mode,
            ContributionMode::FixedPeriodic { amount: 27_500.0 }
        );
        assert_eq!(inputs.account_seed, AccountSeed::Contribution);
    }

    #[test]
    fn build_inputs_rejects_fixed_mode_without_amount() {
        let mut cli = sample_cli();
        cli.contribution_mode = CliContributionMode::FixedPeriodic;
        cli.fixed_contribution = None;

        let err = build_inputs(cli).expect_err("must require a fixed contribution");
        assert!(err.contains("--fixed-contribution"));
    }

    #[test]
    fn build_inputs_uses_default_fixed_duty() {
        let mut cli = sample_cli();
        cli.duty_mode = CliDutyMode::Fixed;

        let inputs = build_inputs(cli).expect("valid inputs");
        assert_eq!(
            inputs.duty_mode,
            DutyMode::Fixed {
                amount: DEFAULT_FIXED_DUTY
            }
        );
    }

    #[test]
    fn build_inputs_rejects_non_positive_property_value() {
        let mut cli = sample_cli();
        cli.property_value = 0.0;

        let err = build_inputs(cli).expect_err("must reject zero property value");
        assert!(err.contains("--property-value"));
    }

    #[test]
    fn build_inputs_rejects_negative_rent_and_rate() {
        let mut cli = sample_cli();
        cli.annual_rent = -1.0;
        let err = build_inputs(cli).expect_err("must reject negative rent");
        assert!(err.contains("--annual-rent"));

        let mut cli = sample_cli();
        cli.loan_interest_rate = -0.5;
        let err = build_inputs(cli).expect_err("must reject negative rate");
        assert!(err.contains("--loan-interest-rate"));
    }

    #[test]
    fn build_inputs_rejects_total_loss_growth_rates() {
        let mut cli = sample_cli();
        cli.super_growth_rate = -100.0;

        let err = build_inputs(cli).expect_err("must reject <= -100 growth rate");
        assert!(err.contains("--super-growth-rate"));
    }

    #[test]
    fn build_inputs_rejects_excessive_horizon() {
        let mut cli = sample_cli();
        cli.years = MAX_HORIZON_YEARS + 1;

        let err = build_inputs(cli).expect_err("must reject long horizon");
        assert!(err.contains("--years"));
    }

    #[test]
    fn build_inputs_rejects_excessive_loan_term() {
        let mut cli = sample_cli();
        cli.loan_term_years = 3_000_000_000;
        let err = build_inputs(cli).expect_err("must reject huge loan term");
        assert!(err.contains("--loan-term-years"));

        let mut cli = sample_cli();
        cli.loan_term_years = MAX_LOAN_TERM_YEARS;
        assert!(build_inputs(cli).is_ok());
    }

    #[tokio::test]
    async fn project_handler_rejects_huge_loan_term_as_bad_request() {
        for loan_years in [20_000, 3_000_000_000] {
            let payload = ProjectPayload {
                loan_years: Some(loan_years),
                years: Some(3),
                ..ProjectPayload::default()
            };
            let response = project_handler_impl(payload).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn cli_parses_bare_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["property_vs_super", "--years", "5"])
            .expect("flags should parse");
        let inputs = build_inputs(cli).expect("valid inputs");
        assert_eq!(inputs.horizon_years, 5);

        assert!(Cli::try_parse_from(["property_vs_super", "project", "--years", "5"]).is_err());
    }

    #[test]
    fn cli_parses_flags_with_defaults() {
        let cli = Cli::try_parse_from([
            "property_vs_super",
            "--property-value",
            "900000",
            "--contribution-mode",
            "fixed-periodic",
            "--fixed-contribution",
            "20000",
            "--duty-mode",
            "fixed",
            "--account-seed",
            "empty",
            "--seed-row",
        ])
        .expect("flags should parse");

        let inputs = build_inputs(cli).expect("valid inputs");
        assert_approx(inputs.initial_property_value, 900_000.0);
        assert_approx(inputs.annual_rent, 54_000.0);
        assert_eq!(
            inputs.contribution_mode,
            ContributionMode::FixedPeriodic { amount: 20_000.0 }
        );
        assert_eq!(inputs.account_seed, AccountSeed::Empty);
        assert!(inputs.include_seed_row);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "propertyValue": 850000,
          "propertyGrowth": 4,
          "annualRent": 36000,
          "loanYears": 25,
          "loanRate": 6.2,
          "superGrowth": 8,
          "years": 40,
          "contributionMode": "fixedPeriodic",
          "fixedContribution": 15000,
          "dutyMode": "flat",
          "fixedDuty": 30000,
          "accountSeed": "none",
          "seedRow": true
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        let inputs = request.inputs;

        assert_approx(inputs.initial_property_value, 850_000.0);
        assert_approx(inputs.property_growth_rate, 0.04);
        assert_approx(inputs.annual_rent, 36_000.0);
        assert_eq!(inputs.loan_term_years, 25);
        assert_approx(inputs.loan_interest_rate, 0.062);
        assert_approx(inputs.alt_account_growth_rate, 0.08);
        assert_eq!(inputs.horizon_years, 40);
        assert_eq!(
            inputs.contribution_mode,
            ContributionMode::FixedPeriodic { amount: 15_000.0 }
        );
        assert_eq!(inputs.duty_mode, DutyMode::Fixed { amount: 30_000.0 });
        assert_eq!(inputs.account_seed, AccountSeed::Empty);
        assert!(inputs.include_seed_row);
    }

    #[test]
    fn api_request_from_empty_json_uses_defaults() {
        let request = api_request_from_json("{}").expect("json should parse");
        assert_approx(request.inputs.initial_property_value, 1_300_000.0);
        assert_eq!(request.inputs.horizon_years, 30);
        assert_eq!(request.inputs.account_seed, AccountSeed::StampDuty);
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let mut cli = sample_cli();
        cli.years = 3;
        let inputs = build_inputs(cli).expect("valid inputs");
        let report = run_projection(&inputs).expect("valid projection");
        let response = build_project_response(&inputs, report);

        let json = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(json["contributionMode"], "opportunity-cost");
        assert_eq!(json["dutyMode"], "tiered");
        assert_eq!(json["horizonYears"], 3);
        assert_eq!(json["years"].as_array().map(Vec::len), Some(3));
        assert!(json["stampDuty"].is_number());
        assert!(json["summary"]["finalDifference"].is_number());
        assert!(json["years"][0]["propertyValue"].is_number());
    }

    #[tokio::test]
    async fn project_handler_reports_zero_rate_as_unprocessable() {
        let payload = ProjectPayload {
            loan_rate: Some(0.0),
            ..ProjectPayload::default()
        };
        let response = project_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn project_handler_rejects_invalid_payload() {
        let payload = ProjectPayload {
            property_value: Some(-5.0),
            ..ProjectPayload::default()
        };
        let response = project_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn project_handler_sets_no_store_cache_header() {
        let response = project_handler_impl(ProjectPayload::default()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&header::HeaderValue::from_static("no-store"))
        );
    }

    #[tokio::test]
    async fn router_reads_query_parameters_on_get() {
        let request = Request::builder()
            .uri("/api/project?years=5&loanRate=6&seedRow=true&dutyMode=fixed")
            .body(Body::empty())
            .expect("valid request");
        let response = router().oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(json["horizonYears"], 5);
        assert_eq!(json["dutyMode"], "fixed");
        assert_eq!(json["years"].as_array().map(Vec::len), Some(6));
        assert_eq!(json["stampDuty"], 55_000.0);
    }

    #[tokio::test]
    async fn router_returns_not_found_for_unknown_routes() {
        let request = Request::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .expect("valid request");
        let response = router().oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(json["error"], "Not found");
    }
}
