pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print a JSON scalar for human-readable renderers, applying the
/// dashboard display conventions to known money and percent fields.
pub(crate) fn format_field(name: &str, value: &Value) -> String {
    use rwa_lend_core::display::{format_currency, format_percent, is_currency_field};

    if let Some(decimal) = value
        .as_str()
        .and_then(|s| s.parse::<rust_decimal::Decimal>().ok())
    {
        if is_currency_field(name) {
            return format_currency(decimal);
        }
        if is_percent_field(name) {
            return format_percent(decimal);
        }
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_field(name, v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn is_percent_field(name: &str) -> bool {
    matches!(
        name,
        "annual_rate_percent" | "ltv_ratio_percent" | "ltv_utilization_percent"
    )
}
