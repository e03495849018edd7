//! Display formatting conventions used by the dashboard and CLI renderers:
//! currency to whole units with thousands separators, percentages to two
//! decimal places. Not part of the calculation contract.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Rate};

/// Format a monetary amount rounded to whole units, e.g. `104663.74` -> `"104,664"`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}")
}

/// Format a percentage value to two decimal places, e.g. `88.8888` -> `"88.89%"`.
pub fn format_percent(percent: Rate) -> String {
    let rounded = percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded)
}

/// Whether a serialized output field holds a monetary amount. Renderers use
/// this to decide which columns get currency formatting.
pub fn is_currency_field(name: &str) -> bool {
    matches!(
        name,
        "principal"
            | "monthly_payment"
            | "total_payment"
            | "total_interest"
            | "max_loan_amount"
            | "required_annual_income"
            | "payment_amount"
            | "principal_component"
            | "interest_component"
            | "remaining_balance"
            | "total_interest_paid"
            | "total_principal_paid"
            | "asset_value"
            | "annual_income"
    )
}
