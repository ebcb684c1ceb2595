//! Synchronous field-level validation against a resource schema
//!
//! Fields are walked in declared order; the first violated rule for a field
//! produces that field's single error and evaluation moves on to the next
//! field. No network call happens when any error is recorded.

use super::{FieldRule, ResourceSchema};
use crate::api::FieldError;
use serde_json::Value;
use url::Url;

/// Validate a payload object against a schema.
///
/// Returns the ordered error list (declared field order); empty means valid.
pub fn validate_payload(schema: &ResourceSchema, payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for rule in &schema.fields {
        let value = payload.get(rule.name);
        if let Some(message) = validate_field(rule, value) {
            errors.push(FieldError {
                field: rule.name.to_string(),
                message,
            });
        }
    }
    errors
}

/// Evaluate one field's rules; `None` means the value passed.
///
/// Rule order: required -> minLength -> maxLength -> isUrl.
pub fn validate_field(rule: &FieldRule, value: Option<&Value>) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        // Non-string values (flags, numbers, arrays) carry no text rules
        Some(_) => return None,
    };

    let present = text.map(|s| !s.trim().is_empty()).unwrap_or(false);
    if rule.required && !present {
        return Some(rule.required_message());
    }
    let Some(text) = text.filter(|_| present) else {
        return None;
    };

    let len = text.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            return Some(rule.min_length_message());
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            return Some(rule.max_length_message());
        }
    }
    if rule.is_url && !is_valid_url(text) {
        return Some(rule.url_message());
    }
    None
}

/// A URL field is valid only with an explicit http(s) scheme and a
/// well-formed parse.
fn is_valid_url(value: &str) -> bool {
    (value.starts_with("http://") || value.starts_with("https://")) && Url::parse(value).is_ok()
}
