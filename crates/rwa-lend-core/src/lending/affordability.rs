//! Collateral capacity and income affordability checks for a loan request.
//!
//! Mirrors the eligibility panel of the lending dashboard: how much the
//! collateral supports at the requested LTV, how much of that capacity the
//! request consumes, and whether declared income clears the 3x
//! debt-to-income requirement.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LendingError;
use crate::lending::amortization::{level_payment, LoanParameters, INCOME_COVERAGE_MULTIPLE};
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::LendingResult;

const PERCENT: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Input for an affordability assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub loan: LoanParameters,
    /// Borrower's declared gross annual income.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<Money>,
}

/// Affordability assessment output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_loan_amount: Money,
    /// Requested principal as a percentage of the collateral capacity.
    pub ltv_utilization_percent: Rate,
    pub within_ltv_limit: bool,
    pub monthly_payment: Money,
    pub required_annual_income: Money,
    /// Declared income over required income; present when income was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_coverage: Option<Multiple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_income_test: Option<bool>,
}

/// Assess a loan request against collateral capacity and declared income.
///
/// An over-capacity principal warns but never rejects; the LTV limit is
/// advisory at this stage of the request flow.
pub fn assess_affordability(
    input: &AffordabilityInput,
) -> LendingResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    input.loan.validate()?;

    if let Some(income) = input.annual_income {
        if income <= Decimal::ZERO {
            return Err(LendingError::InvalidParameter {
                field: "annual_income".into(),
                reason: "Declared income must be positive".into(),
            });
        }
    }

    let mut warnings: Vec<String> = Vec::new();

    // validate() guarantees positive asset value and LTV, so capacity is
    // always a safe divisor
    let max_loan_amount = input.loan.max_loan_amount();
    let ltv_utilization_percent = input.loan.principal / max_loan_amount * PERCENT;
    let within_ltv_limit = input.loan.principal <= max_loan_amount;

    if !within_ltv_limit {
        warnings.push(format!(
            "Requested principal {} exceeds collateral capacity {} ({}% utilization)",
            input.loan.principal,
            max_loan_amount,
            ltv_utilization_percent.round_dp(2)
        ));
    }

    let monthly_payment = level_payment(&input.loan)?;
    let required_annual_income = monthly_payment * MONTHS_PER_YEAR * INCOME_COVERAGE_MULTIPLE;

    let (income_coverage, meets_income_test) = match input.annual_income {
        Some(income) => {
            let coverage = income / required_annual_income;
            let meets = income >= required_annual_income;
            if !meets {
                warnings.push(format!(
                    "Declared income {} is below the required {}",
                    income, required_annual_income
                ));
            }
            (Some(coverage), Some(meets))
        }
        None => (None, None),
    };

    let output = AffordabilityOutput {
        max_loan_amount,
        ltv_utilization_percent,
        within_ltv_limit,
        monthly_payment,
        required_annual_income,
        income_coverage,
        meets_income_test,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Collateral Capacity & 3x Debt-to-Income Test",
        &serde_json::json!({
            "asset_value": input.loan.asset_value.to_string(),
            "ltv_ratio_percent": input.loan.ltv_ratio_percent.to_string(),
            "income_coverage_multiple": INCOME_COVERAGE_MULTIPLE.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(principal: Money, income: Option<Money>) -> AffordabilityInput {
        AffordabilityInput {
            loan: LoanParameters {
                principal,
                annual_rate_percent: dec!(8.5),
                term_months: 12,
                asset_value: dec!(150_000),
                ltv_ratio_percent: dec!(75),
                start_date: None,
            },
            annual_income: income,
        }
    }

    #[test]
    fn test_within_capacity_no_income() {
        let result = assess_affordability(&request(dec!(100_000), None)).unwrap();
        let a = &result.result;

        assert_eq!(a.max_loan_amount, dec!(112_500));
        assert!(a.within_ltv_limit);
        // 100k / 112.5k = 88.88...%
        assert!((a.ltv_utilization_percent - dec!(88.89)).abs() < dec!(0.01));
        assert!(a.income_coverage.is_none());
        assert!(a.meets_income_test.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_over_capacity_warns() {
        let result = assess_affordability(&request(dec!(120_000), None)).unwrap();
        assert!(!result.result.within_ltv_limit);
        assert!(result.result.ltv_utilization_percent > dec!(100));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_income_test_passes() {
        // Required income ~314k for the standard loan; 400k clears it
        let result = assess_affordability(&request(dec!(100_000), Some(dec!(400_000)))).unwrap();
        let a = &result.result;
        assert_eq!(a.meets_income_test, Some(true));
        assert!(a.income_coverage.unwrap() > Decimal::ONE);
    }

    #[test]
    fn test_income_test_fails_with_warning() {
        let result = assess_affordability(&request(dec!(100_000), Some(dec!(100_000)))).unwrap();
        let a = &result.result;
        assert_eq!(a.meets_income_test, Some(false));
        assert!(a.income_coverage.unwrap() < Decimal::ONE);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("below the required")));
    }

    #[test]
    fn test_zero_collateral_rejected_before_ratio_math() {
        let mut input = request(dec!(100_000), None);
        input.loan.asset_value = Decimal::ZERO;
        match assess_affordability(&input).unwrap_err() {
            LendingError::InvalidParameter { field, .. } => assert_eq!(field, "asset_value"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_income_rejected() {
        let err = assess_affordability(&request(dec!(100_000), Some(dec!(-1)))).unwrap_err();
        match err {
            LendingError::InvalidParameter { field, .. } => assert_eq!(field, "annual_income"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }
}
