//! Request body helpers shared by the resource stores

use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Parse a request body; empty or non-JSON bodies yield `None`
pub fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// The payload as a JSON object, if it is one
pub fn as_object(payload: Option<&Value>) -> Option<&Map<String, Value>> {
    payload.and_then(Value::as_object)
}

/// Require all `fields` to be present, with `message` as the 400 text
pub fn require_fields<'a>(
    payload: Option<&'a Value>,
    fields: &[&str],
    message: &str,
) -> Result<&'a Map<String, Value>> {
    match as_object(payload) {
        Some(object) if fields.iter().all(|field| object.contains_key(*field)) => Ok(object),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

pub fn string_field(object: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::Validation(format!(
            "{} must be a string",
            capitalize(field)
        ))),
    }
}

/// A finite number, or a string holding one
pub fn number_field(object: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    let invalid = || AppError::Validation(format!("{} must be a number", capitalize(field)));

    let value = match object.get(field) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    // "NaN" and "inf" parse, but cannot be written back out as JSON numbers
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(invalid())
    }
}

/// An integer, or a string holding one
pub fn integer_field(object: &Map<String, Value>, field: &str) -> Result<Option<i64>> {
    let invalid = || AppError::Validation(format!("{} must be an integer", capitalize(field)));

    match object.get(field) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
