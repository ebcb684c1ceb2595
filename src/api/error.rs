//! Typed errors for backend API operations
//!
//! Provides structured error types so callers can distinguish recoverable
//! failure modes (field validation, expired session) without string matching.

use serde::Deserialize;
use thiserror::Error;

/// One per-field violation extracted from a 422 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API operation errors with typed variants
///
/// Enables callers to distinguish between different failure modes:
/// - `Validation` (422) - field-level errors; user corrects input and resubmits
/// - `AuthRequired` (401) - session expired/invalid; session token is wiped
/// - `Request` (other 4xx) - policy/permission issue; shown as a single message
/// - `Server` (5xx) - server-side issue; generic retry-later message
/// - `Network` - no response received (connect failure, timeout)
/// - `Decode` - response body did not match the expected shape
#[derive(Debug, Error)]
pub enum ApiError {
    /// Structured validation failure (HTTP 422)
    ///
    /// Carries every `{field, message}` pair from the response detail so a
    /// form can re-populate its field error map.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Session token is expired, invalid, or missing (HTTP 401)
    ///
    /// The client clears the stored token before raising this; callers are
    /// expected to redirect to the login entry point.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Other client-side rejection (4xx)
    #[error("Request rejected: {0}")]
    Request(String),

    /// Server-side error (HTTP 5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Network connectivity issue (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body failed to parse into the expected type
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Error body shape used by the backend: `{detail: string | [{loc, msg}]}`,
/// with a legacy `message` field on some routes.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Message(String),
    Violations(Vec<Violation>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct Violation {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

impl Violation {
    /// Field name for this violation: the last `loc` segment, stringified.
    /// `["body", "title"]` maps to `title`; array indices map verbatim.
    fn field_name(&self) -> String {
        match self.loc.last() {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "_".to_string(),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Check if this error is worth one immediate automatic retry.
    /// Only read paths consult this; mutations are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Server(_) | ApiError::Network(_))
    }

    /// Check if this error means the session must be re-established
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::AuthRequired(_))
    }

    /// Field errors carried by a `Validation` error, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ApiError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Classify an HTTP failure status plus raw body text into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        match status.as_u16() {
            422 => ApiError::Validation(extract_field_errors(parsed)),
            401 => ApiError::AuthRequired(best_message(parsed, "session expired or invalid")),
            400..=499 => ApiError::Request(best_message(parsed, "request was rejected")),
            500..=599 => ApiError::Server(best_message(parsed, "the server failed to respond")),
            _ => ApiError::Request(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Convert transport-level errors into typed ApiError
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("connection failed: {}", e))
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, &e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Best available human-readable message: structured `detail`, then legacy
/// `message`, then a static fallback.
fn best_message(body: Option<ErrorBody>, fallback: &str) -> String {
    match body {
        Some(ErrorBody {
            detail: Some(ErrorDetail::Message(m)),
            ..
        }) => m,
        Some(ErrorBody {
            detail: Some(ErrorDetail::Violations(v)),
            ..
        }) => v
            .iter()
            .map(|x| format!("{}: {}", x.field_name(), x.msg))
            .collect::<Vec<_>>()
            .join("; "),
        Some(ErrorBody {
            message: Some(m), ..
        }) => m,
        _ => fallback.to_string(),
    }
}

fn extract_field_errors(body: Option<ErrorBody>) -> Vec<FieldError> {
    match body {
        Some(ErrorBody {
            detail: Some(ErrorDetail::Violations(violations)),
            ..
        }) => violations
            .into_iter()
            .map(|v| FieldError {
                field: v.field_name(),
                message: v.msg,
            })
            .collect(),
        Some(ErrorBody {
            detail: Some(ErrorDetail::Message(m)),
            ..
        }) => vec![FieldError {
            field: "_".to_string(),
            message: m,
        }],
        _ => vec![FieldError {
            field: "_".to_string(),
            message: "validation failed".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_422_maps_last_loc_segment_to_field() {
        let body = r#"{"detail": [{"loc": ["body", "title"], "msg": "too long"}]}"#;
        let err = ApiError::from_http_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY, body);
        let fields = err.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "title");
        assert_eq!(fields[0].message, "too long");
    }

    #[test]
    fn test_422_with_numeric_loc_segment() {
        let body = r#"{"detail": [{"loc": ["body", "tags", 2], "msg": "too long"}]}"#;
        let err = ApiError::from_http_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.field_errors()[0].field, "2");
    }

    #[test]
    fn test_401_is_auth_required() {
        let err = ApiError::from_http_status(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"detail": "Not authenticated"}"#,
        );
        assert!(err.needs_login());
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Authentication required: Not authenticated"
        );
    }

    #[test]
    fn test_4xx_prefers_detail_then_message_then_fallback() {
        let err = ApiError::from_http_status(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"detail": "Admins only"}"#,
        );
        assert!(matches!(err, ApiError::Request(ref m) if m == "Admins only"));

        let err = ApiError::from_http_status(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"message": "No permission"}"#,
        );
        assert!(matches!(err, ApiError::Request(ref m) if m == "No permission"));

        let err = ApiError::from_http_status(reqwest::StatusCode::FORBIDDEN, "not json");
        assert!(matches!(err, ApiError::Request(ref m) if m == "request was rejected"));
    }

    #[test]
    fn test_5xx_is_retryable() {
        let err = ApiError::from_http_status(reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ApiError::Server(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_not_retryable() {
        let err = ApiError::Validation(vec![FieldError {
            field: "title".to_string(),
            message: "required".to_string(),
        }]);
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Validation failed: title: required");
    }
}
