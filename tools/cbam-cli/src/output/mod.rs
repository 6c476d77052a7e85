use serde_json::Value;

pub use crate::types::OutputFormat;

/// Output formatting interface
pub trait Formatter {
    fn format(&self, data: &Value) -> anyhow::Result<String>;
}

pub struct JsonFormatter;
pub struct YamlFormatter;
pub struct TableFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

impl Formatter for YamlFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(data)?)
    }
}

/// Columns shown first for VNF instances and packages when present
const PREFERRED_COLUMNS: [&str; 5] = [
    "id",
    "vnfInstanceName",
    "vnfdId",
    "instantiationState",
    "onboardingState",
];

impl Formatter for TableFormatter {
    fn format(&self, data: &Value) -> anyhow::Result<String> {
        match data {
            Value::Array(items) => {
                if items.is_empty() {
                    return Ok("No data available".to_string());
                }

                let headers = match items.first() {
                    Some(Value::Object(first)) => {
                        let mut keys: Vec<String> = PREFERRED_COLUMNS
                            .iter()
                            .filter(|k| first.contains_key(**k))
                            .map(|k| k.to_string())
                            .collect();
                        if keys.is_empty() {
                            keys = first
                                .iter()
                                .filter(|(_, v)| is_scalar(v))
                                .map(|(k, _)| k.clone())
                                .collect();
                            keys.sort();
                        }
                        keys
                    }
                    _ => Vec::new(),
                };

                let mut table = String::new();
                table.push_str(&format!("{}\n", headers.join(" | ")));
                table.push_str(&format!(
                    "{}\n",
                    "-".repeat(headers.join(" | ").len())
                ));

                for item in items {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| {
                                format_value(obj.get(h).unwrap_or(&Value::Null))
                            })
                            .collect();
                        table.push_str(&format!("{}\n", row.join(" | ")));
                    } else {
                        table.push_str(&format!("{}\n", format_value(item)));
                    }
                }

                Ok(table)
            }
            Value::Object(obj) => {
                let mut table = String::new();
                table.push_str("Key | Value\n");
                table.push_str("--- | -----\n");

                let mut keys: Vec<_> = obj.keys().collect();
                keys.sort();

                for key in keys {
                    let value =
                        format_value(obj.get(key).unwrap_or(&Value::Null));
                    table.push_str(&format!("{} | {}\n", key, value));
                }

                Ok(table)
            }
            _ => Ok(format_value(data)),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        _ => value.to_string(),
    }
}

/// Get formatter for the specified output format
pub fn get_formatter(format: &OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Format and print data in the specified format
pub fn print_output(data: &Value, format: &OutputFormat) -> anyhow::Result<()> {
    let formatter = get_formatter(format);
    let output = formatter.format(data)?;
    println!("{}", output);
    Ok(())
}

/// Output arguments shared by the read commands
#[derive(clap::Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}
