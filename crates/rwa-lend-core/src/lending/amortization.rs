//! Level-payment loan amortization for RWA-collateralized lending.
//!
//! Computes the fixed monthly payment for a fixed-rate, fixed-term loan via the
//! standard annuity formula, plus summary affordability metrics and the full
//! period-by-period repayment schedule. All math in `rust_decimal::Decimal`.

use chrono::Months;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);
const MAX_LTV_PERCENT: Decimal = dec!(100);

/// Required annual income as a multiple of annual debt service (3x
/// debt-to-income underwriting heuristic, a fixed business parameter).
pub const INCOME_COVERAGE_MULTIPLE: Decimal = dec!(3);

/// Balances below this are treated as fully repaid.
const BALANCE_EPSILON: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Parameters of a collateralized loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Requested loan amount.
    pub principal: Money,
    /// Nominal annual interest rate as a percentage (8.5 means 8.5%).
    pub annual_rate_percent: Rate,
    /// Number of monthly installments.
    pub term_months: u32,
    /// Appraised value of the collateral asset.
    pub asset_value: Money,
    /// Desired loan-to-value percentage, in (0, 100].
    pub ltv_ratio_percent: Rate,
    /// Origination date; when set, schedule rows carry monthly due dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
}

/// Derived loan metrics, recomputed on every parameter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Maximum principal supported by the collateral at the requested LTV.
    pub max_loan_amount: Money,
    /// Annual income required under the 3x debt-to-income heuristic.
    pub required_annual_income: Money,
}

/// One period of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based installment number.
    pub period_index: u32,
    pub payment_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance after this payment, clamped to a minimum of zero.
    pub remaining_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<chrono::NaiveDate>,
}

/// Output of schedule generation for a single loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub rows: Vec<AmortizationRow>,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
    /// True when the final emitted row carries a zero balance.
    pub fully_amortized: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl LoanParameters {
    /// Per-period (monthly) rate as a decimal: 8.5% annual -> 0.0070833...
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / PERCENT / MONTHS_PER_YEAR
    }

    /// Maximum principal the collateral supports at the requested LTV.
    pub fn max_loan_amount(&self) -> Money {
        self.asset_value * self.ltv_ratio_percent / PERCENT
    }

    /// Reject out-of-range parameters before any arithmetic runs.
    pub fn validate(&self) -> LendingResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LendingError::InvalidParameter {
                field: "principal".into(),
                reason: "Loan principal must be positive".into(),
            });
        }
        if self.term_months == 0 {
            return Err(LendingError::InvalidParameter {
                field: "term_months".into(),
                reason: "Term must be at least 1 month".into(),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LendingError::InvalidParameter {
                field: "annual_rate_percent".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.asset_value <= Decimal::ZERO {
            return Err(LendingError::InvalidParameter {
                field: "asset_value".into(),
                reason: "Collateral asset value must be positive".into(),
            });
        }
        if self.ltv_ratio_percent <= Decimal::ZERO || self.ltv_ratio_percent > MAX_LTV_PERCENT {
            return Err(LendingError::InvalidParameter {
                field: "ltv_ratio_percent".into(),
                reason: "LTV ratio must be in (0, 100]".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Level payment for the given parameters.
///
/// Zero-rate loans amortize linearly; otherwise the standard annuity formula
/// `P * r * (1+r)^n / ((1+r)^n - 1)` applies.
pub fn level_payment(params: &LoanParameters) -> LendingResult<Money> {
    let rate = params.monthly_rate();
    let n = Decimal::from(params.term_months);

    if rate.is_zero() {
        return Ok(params.principal / n);
    }

    let factor = (Decimal::ONE + rate).powd(n);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LendingError::DivisionByZero {
            context: "annuity denominator".into(),
        });
    }

    Ok(params.principal * rate * factor / denominator)
}

/// Compute the loan summary: level payment, lifetime totals, collateral
/// capacity, and the income requirement.
///
/// A principal above the collateral's maximum loan amount is advisory only and
/// produces a warning, never a rejection.
pub fn compute_summary(
    params: &LoanParameters,
) -> LendingResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    params.validate()?;

    let mut warnings: Vec<String> = Vec::new();

    let monthly_payment = level_payment(params)?;
    let total_payment = monthly_payment * Decimal::from(params.term_months);
    let total_interest = total_payment - params.principal;
    let max_loan_amount = params.max_loan_amount();
    let required_annual_income = monthly_payment * MONTHS_PER_YEAR * INCOME_COVERAGE_MULTIPLE;

    if params.principal > max_loan_amount {
        warnings.push(format!(
            "Requested principal {} exceeds maximum loan amount {} at {}% LTV",
            params.principal, max_loan_amount, params.ltv_ratio_percent
        ));
    }

    let output = LoanSummary {
        monthly_payment,
        total_payment,
        total_interest,
        max_loan_amount,
        required_annual_income,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization (annuity formula)",
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "term_months": params.term_months,
            "monthly_rate": params.monthly_rate().to_string(),
            "income_coverage_multiple": INCOME_COVERAGE_MULTIPLE.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Generate the period-by-period repayment schedule.
///
/// `monthly_payment` is normally the value from [`compute_summary`]; a larger
/// custom payment models early payoff and shortens the schedule. `max_periods`
/// bounds how many rows are materialized (callers rendering a preview pass a
/// small cap; pass `term_months` for the full schedule).
pub fn generate_schedule(
    params: &LoanParameters,
    monthly_payment: Money,
    max_periods: u32,
) -> LendingResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    params.validate()?;

    if monthly_payment <= Decimal::ZERO {
        return Err(LendingError::InvalidParameter {
            field: "monthly_payment".into(),
            reason: "Payment must be positive".into(),
        });
    }
    if max_periods == 0 {
        return Err(LendingError::InvalidParameter {
            field: "max_periods".into(),
            reason: "At least one period must be materialized".into(),
        });
    }

    let mut warnings: Vec<String> = Vec::new();
    let rate = params.monthly_rate();
    let periods = params.term_months.min(max_periods);

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = params.principal;
    let mut total_interest_paid = Decimal::ZERO;
    let mut total_principal_paid = Decimal::ZERO;

    for period_index in 1..=periods {
        let interest_component = balance * rate;
        let principal_component = monthly_payment - interest_component;

        if principal_component <= Decimal::ZERO {
            return Err(LendingError::NonAmortizing {
                period: period_index,
                payment: monthly_payment,
                interest_due: interest_component,
            });
        }

        balance -= principal_component;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        total_interest_paid += interest_component;
        total_principal_paid += principal_component;

        rows.push(AmortizationRow {
            period_index,
            payment_amount: monthly_payment,
            principal_component,
            interest_component,
            remaining_balance: balance,
            due_date: due_date(params, period_index)?,
        });

        if balance.is_zero() {
            break;
        }
    }

    let fully_amortized = rows
        .last()
        .map(|r| r.remaining_balance.is_zero())
        .unwrap_or(false);

    if !fully_amortized && periods < params.term_months {
        warnings.push(format!(
            "Schedule truncated at {} of {} periods",
            periods, params.term_months
        ));
    }

    let output = ScheduleOutput {
        rows,
        total_interest_paid,
        total_principal_paid,
        fully_amortized,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization Schedule",
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "monthly_rate": rate.to_string(),
            "monthly_payment": monthly_payment.to_string(),
            "max_periods": max_periods,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Due date for a 1-based period: origination date plus `period_index` months,
/// month-end clamped by `chrono`.
fn due_date(
    params: &LoanParameters,
    period_index: u32,
) -> LendingResult<Option<chrono::NaiveDate>> {
    match params.start_date {
        None => Ok(None),
        Some(origin) => origin
            .checked_add_months(Months::new(period_index))
            .map(Some)
            .ok_or_else(|| {
                LendingError::DateError(format!(
                    "Due date overflow adding {period_index} months to {origin}"
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn standard_loan() -> LoanParameters {
        LoanParameters {
            principal: dec!(100_000),
            annual_rate_percent: dec!(8.5),
            term_months: 12,
            asset_value: dec!(150_000),
            ltv_ratio_percent: dec!(75),
            start_date: None,
        }
    }

    #[test]
    fn test_summary_standard_loan() {
        let result = compute_summary(&standard_loan()).unwrap();
        let s = &result.result;

        // Annuity at 8.5%/12 over 12 months: ~8721.98 per month
        assert!((s.monthly_payment - dec!(8721.98)).abs() < dec!(0.01));
        assert!((s.total_payment - dec!(104663.74)).abs() < dec!(0.10));
        assert!((s.total_interest - dec!(4663.74)).abs() < dec!(0.10));

        // 150k collateral at 75% LTV
        assert_eq!(s.max_loan_amount, dec!(112_500));

        // payment * 12 * 3
        let expected_income = s.monthly_payment * dec!(36);
        assert_eq!(s.required_annual_income, expected_income);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_summary_zero_rate_is_linear() {
        let mut params = standard_loan();
        params.annual_rate_percent = Decimal::ZERO;
        params.principal = dec!(12_000);

        let s = compute_summary(&params).unwrap().result;
        assert_eq!(s.monthly_payment, dec!(1_000));
        assert_eq!(s.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_summary_deterministic() {
        let params = standard_loan();
        let a = compute_summary(&params).unwrap().result;
        let b = compute_summary(&params).unwrap().result;
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_over_ltv_warns_without_rejecting() {
        let mut params = standard_loan();
        params.principal = dec!(120_000); // above the 112.5k max

        let result = compute_summary(&params).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("exceeds maximum loan amount"));
    }

    #[test]
    fn test_invalid_principal() {
        let mut params = standard_loan();
        params.principal = Decimal::ZERO;
        match compute_summary(&params) {
            Err(LendingError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "principal")
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_term() {
        let mut params = standard_loan();
        params.term_months = 0;
        match compute_summary(&params) {
            Err(LendingError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "term_months")
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_ltv() {
        let mut params = standard_loan();
        params.ltv_ratio_percent = dec!(150);
        match compute_summary(&params) {
            Err(LendingError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "ltv_ratio_percent")
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_decomposition_and_monotonicity() {
        let params = standard_loan();
        let payment = compute_summary(&params).unwrap().result.monthly_payment;
        let sched = generate_schedule(&params, payment, params.term_months)
            .unwrap()
            .result;

        assert_eq!(sched.rows.len(), 12);

        let mut prev_balance = params.principal;
        for row in &sched.rows {
            // Decimal arithmetic keeps the split exact
            assert_eq!(
                row.payment_amount,
                row.principal_component + row.interest_component
            );
            assert!(row.remaining_balance <= prev_balance);
            prev_balance = row.remaining_balance;
        }

        assert_eq!(sched.rows.last().unwrap().remaining_balance, Decimal::ZERO);
        assert!(sched.fully_amortized);
    }

    #[test]
    fn test_schedule_respects_display_cap() {
        let mut params = standard_loan();
        params.term_months = 360;
        let payment = compute_summary(&params).unwrap().result.monthly_payment;

        // The dashboard preview caps rendering at 24 rows
        let result = generate_schedule(&params, payment, 24).unwrap();
        assert_eq!(result.result.rows.len(), 24);
        assert!(!result.result.fully_amortized);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("truncated"));
    }

    #[test]
    fn test_schedule_early_payoff_with_custom_payment() {
        let params = standard_loan();
        let standard = compute_summary(&params).unwrap().result.monthly_payment;
        let sched = generate_schedule(&params, standard * dec!(2), params.term_months)
            .unwrap()
            .result;

        assert!(sched.rows.len() < params.term_months as usize);
        assert_eq!(sched.rows.last().unwrap().remaining_balance, Decimal::ZERO);
        assert!(sched.fully_amortized);
    }

    #[test]
    fn test_schedule_rejects_non_amortizing_payment() {
        let params = standard_loan();
        // First-period interest is ~708.33; a 500 payment never touches principal
        match generate_schedule(&params, dec!(500), params.term_months) {
            Err(LendingError::NonAmortizing { period, .. }) => assert_eq!(period, 1),
            other => panic!("expected NonAmortizing, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_zero_rate() {
        let mut params = standard_loan();
        params.annual_rate_percent = Decimal::ZERO;
        params.principal = dec!(12_000);

        let sched = generate_schedule(&params, dec!(1_000), params.term_months)
            .unwrap()
            .result;
        assert_eq!(sched.rows.len(), 12);
        for row in &sched.rows {
            assert_eq!(row.interest_component, Decimal::ZERO);
        }
        assert_eq!(sched.total_principal_paid, dec!(12_000));
    }

    #[test]
    fn test_due_dates_advance_monthly_with_clamping() {
        let mut params = standard_loan();
        params.term_months = 3;
        params.start_date = NaiveDate::from_ymd_opt(2026, 1, 31);
        let payment = compute_summary(&params).unwrap().result.monthly_payment;

        let sched = generate_schedule(&params, payment, 3).unwrap().result;
        let dates: Vec<_> = sched.rows.iter().map(|r| r.due_date.unwrap()).collect();

        // Jan 31 origination: February clamps to the 28th
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2026, 4, 30).unwrap());
    }
}
