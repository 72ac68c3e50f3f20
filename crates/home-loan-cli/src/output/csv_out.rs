use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A schedule (directly, or under `result.schedule.periods`) becomes one
/// row per month; anything else is flattened to `field,value` pairs with
/// dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(periods)) = value.pointer("/result/schedule/periods") {
                write_array_csv(wtr, periods);
            } else {
                let source = match map.get("result") {
                    Some(Value::Object(result)) => result,
                    _ => map,
                };
                let _ = wtr.write_record(["field", "value"]);
                write_flattened(wtr, "", source);
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }
}

fn write_flattened<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    prefix: &str,
    map: &Map<String, Value>,
) {
    for (key, val) in map {
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => write_flattened(wtr, &field, inner),
            _ => {
                let _ = wtr.write_record([field.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

/// Columns follow the record's field order (serde_json `preserve_order`).
fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use home_loan_core::amortization::loan::LoanParameters;
    use home_loan_core::amortization::simulator::{self, MortgageInput};

    fn one_year_input() -> MortgageInput {
        MortgageInput {
            loan: LoanParameters {
                term_years: 1,
                ..LoanParameters::default()
            },
            prepayment: None,
        }
    }

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_columns_in_record_order() {
        let schedule = simulator::amortization_schedule(&one_year_input()).unwrap();
        let value = serde_json::to_value(&schedule.periods).unwrap();
        let out = render(&value);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("month,payment,interest,principal,extra_payment,balance")
        );
        assert!(lines.next().unwrap().starts_with("1,"));
        assert_eq!(out.lines().count(), 13);
    }

    #[test]
    fn test_simulation_envelope_writes_schedule_rows() {
        let result = simulator::simulate_mortgage(&one_year_input()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        let out = render(&value);
        assert!(out.starts_with("month,payment,interest,principal,extra_payment,balance\n"));
    }

    #[test]
    fn test_quote_flattens_to_field_value() {
        let value = serde_json::json!({
            "result": { "monthly_payment": "100", "nested": { "a": 1 } },
            "warnings": []
        });
        assert_eq!(render(&value), "field,value\nmonthly_payment,100\nnested.a,1\n");
    }
}
