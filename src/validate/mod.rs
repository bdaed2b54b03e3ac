//! Declarative per-field request validation.
//!
//! A [`Schema`] maps field names to rule chains (`required`, `trim`, `email`,
//! `optional`) and checks a raw JSON payload against them, producing either a
//! normalized field map or the full list of field-level failures. Rules are
//! fail-fast per field but accumulate across fields, so a response always
//! names every bad field at once.

use serde::Serialize;
use serde_json::{Map, Value};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Rule chain applied to one field. Values are always text; trimming happens
/// before the presence and shape checks.
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    required: bool,
    email: bool,
}

impl Rules {
    /// Field must be present and non-empty after trimming.
    pub fn required() -> Self {
        Self {
            required: true,
            email: false,
        }
    }

    /// Field may be absent; if present it is still trimmed and checked.
    pub fn optional() -> Self {
        Self {
            required: false,
            email: false,
        }
    }

    /// Value must match a `local@domain` email shape.
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }
}

/// Field-name to rule-chain mapping for one route's payload.
///
/// Unknown payload fields are ignored; only declared fields reach the
/// normalized output.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Rules)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Rules) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Validate a payload, returning normalized fields or every failure.
    pub fn check(&self, payload: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
        self.check_inner(payload, false)
    }

    /// Validate a partial payload for updates: presence is never required,
    /// but fields that are present must still satisfy their rules.
    pub fn check_update(
        &self,
        payload: &Map<String, Value>,
    ) -> Result<Map<String, Value>, Vec<FieldError>> {
        self.check_inner(payload, true)
    }

    fn check_inner(
        &self,
        payload: &Map<String, Value>,
        all_optional: bool,
    ) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut normalized = Map::new();
        let mut errors = Vec::new();

        for (name, rules) in &self.fields {
            let required = rules.required && !all_optional;

            match payload.get(*name) {
                None | Some(Value::Null) => {
                    if required {
                        errors.push(FieldError::new(name, "is required"));
                    }
                }
                Some(Value::String(raw)) => {
                    let value = raw.trim();
                    if value.is_empty() {
                        if required {
                            errors.push(FieldError::new(name, "must not be empty"));
                        }
                        // Empty optional fields normalize to absent.
                        continue;
                    }
                    if rules.email && !is_email(value) {
                        errors.push(FieldError::new(name, "must be a valid email address"));
                        continue;
                    }
                    normalized.insert(name.to_string(), Value::String(value.to_string()));
                }
                Some(_) => {
                    errors.push(FieldError::new(name, "must be a string"));
                }
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }
}

/// Minimal `local@domain` shape check: exactly one `@`, a non-empty local
/// part, a dotted domain, and no whitespace anywhere.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Normalize a submitted `tags` value into an array of trimmed strings.
/// Accepts either a JSON array of strings or a single comma-separated string.
pub fn normalize_tags(value: &Value) -> Result<Value, FieldError> {
    let tags: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => {
                        let t = s.trim();
                        if !t.is_empty() {
                            tags.push(t.to_string());
                        }
                    }
                    _ => {
                        return Err(FieldError::new("tags", "must be a list of strings"));
                    }
                }
            }
            tags
        }
        _ => return Err(FieldError::new("tags", "must be a list of strings")),
    };

    Ok(Value::Array(tags.into_iter().map(Value::String).collect()))
}
