//! Route handlers: one module per resource family, each following the same
//! pipeline: access gate, validate, dispatch to store or mailer, respond with
//! the uniform envelope.

pub mod blogs;
pub mod careers;
pub mod contact;
pub mod upload;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Unwrap a JSON body into an object, mapping extractor rejections into the
/// error envelope instead of letting axum answer with plain text.
pub(crate) fn object_payload(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, ApiError> {
    let Json(value) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("Expected a JSON object body")),
    }
}

/// Borrow a normalized text field. Validation guarantees presence for
/// required fields, so the fallback never shows up in practice.
pub(crate) fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or("")
}

pub(crate) fn opt_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Parse a path id, answering 400 in the envelope on malformed input.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid record id"))
}

/// Tags out of a stored or normalized field map, for mail composition.
pub(crate) fn tags_vec(fields: &Map<String, Value>) -> Vec<String> {
    fields
        .get("tags")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
