use serde_json::Value;

/// Headline figures, most specific first.
const PRIORITY_KEYS: [&str; 4] = [
    "initial_payment",
    "monthly_payment",
    "total_interest",
    "duration_months",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result and one level below it
/// (e.g. `summary.initial_payment`), then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = find_priority(result_obj) {
        println!("{}", format_minimal(val));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_priority(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    for key in &PRIORITY_KEYS {
        if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
            return Some(val);
        }
    }
    map.values()
        .filter(|v| v.is_object())
        .find_map(|inner| {
            let inner = inner.as_object()?;
            PRIORITY_KEYS
                .iter()
                .find_map(|key| inner.get(*key).filter(|v| !v.is_null()))
        })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
