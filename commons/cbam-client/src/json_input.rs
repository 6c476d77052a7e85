use crate::error::{CbamError, Result};
use serde_json::Value;

/// A JSON request body in any of the shapes callers tend to have at hand.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonInput {
    /// An already structured document
    Value(Value),
    /// A JSON document as text
    Text(String),
    /// A JSON document split into lines
    Lines(Vec<String>),
}

impl From<Value> for JsonInput {
    fn from(value: Value) -> Self {
        JsonInput::Value(value)
    }
}

impl From<String> for JsonInput {
    fn from(text: String) -> Self {
        JsonInput::Text(text)
    }
}

impl From<&str> for JsonInput {
    fn from(text: &str) -> Self {
        JsonInput::Text(text.to_string())
    }
}

impl From<Vec<String>> for JsonInput {
    fn from(lines: Vec<String>) -> Self {
        JsonInput::Lines(lines)
    }
}

/// Turn any [`JsonInput`] into one compact, canonical JSON string.
pub fn normalize_json_input(input: &JsonInput) -> Result<String> {
    let value = match input {
        JsonInput::Value(value) => return Ok(serde_json::to_string(value)?),
        JsonInput::Text(text) => parse(text)?,
        JsonInput::Lines(lines) => parse(&lines.join("\n"))?,
    };
    Ok(serde_json::to_string(&value)?)
}

fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| CbamError::InvalidJsonInput(e.to_string()))
}
