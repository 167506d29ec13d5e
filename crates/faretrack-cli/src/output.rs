use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(data: &Value, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(data)?
            } else {
                serde_json::to_string(data)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(data),
    }

    Ok(())
}

fn render_table(data: &Value) {
    let Value::Object(fields) = data else {
        println!("{data}");
        return;
    };

    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                println!("{key}:");
                for item in items {
                    println!("  - {}", render_item(item));
                }
            }
            Value::Null => println!("{key:<14}: -"),
            other => println!("{key:<14}: {}", render_scalar(other)),
        }
    }
}

fn render_item(item: &Value) -> String {
    let Value::Object(fields) = item else {
        return render_scalar(item);
    };

    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", render_scalar(value)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::from("-"),
        other => other.to_string(),
    }
}
