use serde_json::Value;
use tabled::{builder::Builder, Table};

use crate::output::format_field;

/// Render the computation envelope as tables: the amortization schedule gets a
/// row-per-period table, everything else a Field/Value table, followed by
/// warnings and methodology from the envelope.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_trailer(map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_schedule_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    // Schedule output: period rows first, then the scalar totals
    if let Some(Value::Array(rows)) = result.get("rows") {
        print_schedule_rows(rows);
        if let Value::Object(map) = result {
            let scalars: Vec<(&String, &Value)> =
                map.iter().filter(|(k, _)| k.as_str() != "rows").collect();
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in scalars {
                    builder.push_record([key.as_str(), &format_field(key, val)]);
                }
                println!("\n{}", Table::from(builder));
            }
        }
        return;
    }

    print_flat_object(result);
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn print_schedule_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", row);
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| format_field(h, v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

fn print_envelope_trailer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}
