use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rwa_lend_core::lending::amortization::{self, LoanParameters};

use crate::input;

/// Loan parameter flags shared by the summary and schedule commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanParamArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate as a percentage (8.5 = 8.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Number of monthly installments
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Appraised collateral asset value
    #[arg(long)]
    pub asset_value: Option<Decimal>,

    /// Loan-to-value percentage, in (0, 100]
    #[arg(long, alias = "ltv")]
    pub ltv_ratio: Option<Decimal>,

    /// Origination date (YYYY-MM-DD); schedule rows then carry due dates
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for the loan summary command
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub params: LoanParamArgs,
}

/// Arguments for the amortization schedule command
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub params: LoanParamArgs,

    /// Custom monthly payment (defaults to the computed level payment)
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Maximum rows to materialize (defaults to the full term; dashboards
    /// typically pass 24 for a preview)
    #[arg(long)]
    pub max_periods: Option<u32>,
}

/// Resolve loan parameters from --input, piped stdin, or individual flags.
pub fn resolve_params(args: &LoanParamArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::read_json(path);
    }
    if let Some(data) = input::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Ok(LoanParameters {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        term_months: args
            .term_months
            .ok_or("--term-months is required (or provide --input)")?,
        asset_value: args
            .asset_value
            .ok_or("--asset-value is required (or provide --input)")?,
        ltv_ratio_percent: args
            .ltv_ratio
            .ok_or("--ltv-ratio is required (or provide --input)")?,
        start_date: args.start_date,
    })
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_params(&args.params)?;
    let result = amortization::compute_summary(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_params(&args.params)?;

    let payment = match args.payment {
        Some(p) => p,
        None => {
            amortization::compute_summary(&params)?
                .result
                .monthly_payment
        }
    };
    let max_periods = args.max_periods.unwrap_or(params.term_months);

    let result = amortization::generate_schedule(&params, payment, max_periods)?;
    Ok(serde_json::to_value(result)?)
}
