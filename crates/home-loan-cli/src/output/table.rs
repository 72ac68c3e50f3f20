use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalars of an object share one Field/Value table; nested objects get
/// their own titled table and arrays of records (the schedule) render one
/// row per record.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object_sections(None, map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object_sections(None, res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", format_value(other)),
    }

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

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object_sections(title: Option<&str>, map: &Map<String, Value>) {
    let scalars: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(_, v)| !v.is_object() && !is_record_array(v))
        .collect();

    if !scalars.is_empty() {
        if let Some(t) = title {
            println!("\n{}", t);
        }
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        match val {
            Value::Object(inner) => print_object_sections(Some(key.as_str()), inner),
            Value::Array(arr) if is_record_array(val) => {
                println!("\n{}", key);
                print_array_table(arr);
            }
            _ => {}
        }
    }
}

fn is_record_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
