use crate::utils::error::{Result, RsWikiError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An error payload returned inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Present when the upstream API sends `"success": false` alongside the message.
    pub success: Option<bool>,
}

impl ErrorResponse {
    pub fn from_raw(data: &Value) -> Self {
        let error = match data.get("error") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
            Some(other) => other.to_string(),
        };

        Self {
            error,
            success: data.get("success").and_then(Value::as_bool),
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            success: None,
        }
    }

    /// Returns the error payload if `data` carries one: an `error` key or `"success": false`.
    pub fn detect(data: &Value) -> Option<Self> {
        let object = data.as_object()?;
        let failed = object.get("success").and_then(Value::as_bool) == Some(false);
        if object.contains_key("error") || failed {
            Some(Self::from_raw(data))
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub has_more: bool,
    pub total_pages: u32,
    pub total_items: u32,
}

impl PaginationMeta {
    pub fn from_raw(data: &Value) -> Result<Self> {
        Ok(Self::deserialize(data)?)
    }
}

/// Reads an item id that may arrive as a JSON number or a numeric string.
pub fn id_from_value(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| RsWikiError::decode(format!("invalid item id {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| RsWikiError::decode(format!("invalid item id '{}'", s))),
        other => Err(RsWikiError::decode(format!(
            "expected an item id, found {}",
            other
        ))),
    }
}

pub fn expect_object<'a>(
    data: &'a Value,
    what: &str,
) -> Result<&'a serde_json::Map<String, Value>> {
    data.as_object()
        .ok_or_else(|| RsWikiError::decode(format!("expected {} to be a JSON object", what)))
}

pub fn expect_array<'a>(data: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    data.as_array()
        .ok_or_else(|| RsWikiError::decode(format!("expected {} to be a JSON array", what)))
}

pub fn field<'a>(data: &'a Value, key: &str) -> Result<&'a Value> {
    data.get(key)
        .ok_or_else(|| RsWikiError::decode(format!("missing field '{}'", key)))
}

/// Decodes a map keyed by stringified item id; the key is handed to `decode`
/// since the inner records omit it.
pub fn decode_id_keyed<T, F>(data: &Value, mut decode: F) -> Result<Vec<T>>
where
    F: FnMut(u64, &Value) -> Result<T>,
{
    expect_object(data, "id-keyed map")?
        .iter()
        .map(|(key, value)| {
            let id = key
                .parse::<u64>()
                .map_err(|_| RsWikiError::decode(format!("map key '{}' is not an item id", key)))?;
            decode(id, value)
        })
        .collect()
}
