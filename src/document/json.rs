//! Document ⇄ JSON

use crate::error::Result;
use crate::key::Value;

use super::Document;

pub fn to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string(document)?)
}

pub fn from_json(json: &str) -> Result<Document> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a document as the UTF-8 JSON value handed to the host
pub fn to_value(document: &Document) -> Result<Value> {
    Ok(Value::from(serde_json::to_vec(document)?))
}

/// Decode a value produced by [`to_value`]
pub fn from_value(value: &Value) -> Result<Document> {
    Ok(serde_json::from_slice(value.as_bytes())?)
}
