use serde_json::Value;

use crate::output::format_field;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority, then
/// fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // The single number each command is usually run for
    let priority_keys = [
        "monthly_payment",
        "total_interest_paid",
        "income_coverage",
        "max_loan_amount",
        "total_interest",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_field(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_field(key, val));
            return;
        }
    }

    println!("{}", format_field("", result_obj));
}
