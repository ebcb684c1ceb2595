//! Pre-flight payload sanitization
//!
//! The backend enforces hard per-field length limits and rejects oversized
//! payloads with a 422. This pass mirrors those limits client-side before any
//! mutation: strings are trimmed and truncated to the schema limit, string
//! arrays per element, and nested objects recursively. Date-valued fields are
//! left untouched. This is a courtesy to the user, not a substitute for the
//! server's own validation.

use super::ResourceSchema;
use serde_json::Value;

/// Sanitize a payload object in place against a resource schema.
pub fn sanitize_payload(schema: &ResourceSchema, payload: &mut Value) {
    let Value::Object(map) = payload else {
        return;
    };
    for (key, value) in map.iter_mut() {
        let rule = schema.field(key);
        if rule.map(|r| r.is_date).unwrap_or(false) {
            continue;
        }
        let max = rule.and_then(|r| r.max_length);
        sanitize_value(schema, value, max);
    }
}

fn sanitize_value(schema: &ResourceSchema, value: &mut Value, max: Option<usize>) {
    match value {
        Value::String(s) => {
            let mut cleaned = s.trim().to_string();
            if let Some(max) = max {
                if cleaned.chars().count() > max {
                    cleaned = cleaned.chars().take(max).collect();
                }
            }
            *s = cleaned;
        }
        Value::Array(items) => {
            for item in items {
                sanitize_value(schema, item, max);
            }
        }
        Value::Object(map) => {
            // Nested objects pick up limits by field name from the same schema
            for (key, nested) in map.iter_mut() {
                let rule = schema.field(key);
                if rule.map(|r| r.is_date).unwrap_or(false) {
                    continue;
                }
                let nested_max = rule.and_then(|r| r.max_length);
                sanitize_value(schema, nested, nested_max);
            }
        }
        // Numbers, bools, and nulls pass through unchanged
        _ => {}
    }
}
