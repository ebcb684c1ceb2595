//! User-facing notifications
//!
//! Every mutation outcome and every classified API error surfaces as exactly
//! one toast. The CLI renders toasts as colored lines; tests plug in a
//! recording or silent implementation.

use crate::api::ApiError;
use colored::Colorize;
use std::sync::Mutex;

/// Toast sink. Implementations must be cheap; callers fire-and-forget.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Map a classified error to its user-visible toast line.
pub fn toast_for(error: &ApiError) -> String {
    match error {
        ApiError::Validation(fields) => {
            format!("Please correct {} field(s) and resubmit", fields.len())
        }
        ApiError::AuthRequired(_) => "Your session has expired. Please log in again".to_string(),
        ApiError::Request(msg) => msg.clone(),
        ApiError::Server(_) => "Something went wrong on the server. Please try again later".to_string(),
        ApiError::Network(_) => "Could not reach the server. Check your connection".to_string(),
        ApiError::Decode(_) => "The server returned an unexpected response".to_string(),
    }
}

/// Colored stderr toasts for the admin console
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}

/// Drops every toast; for library consumers that render their own UI
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Records toasts in memory; test helper
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(bool, String)>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| {
                m.iter()
                    .filter(|(ok, _)| *ok)
                    .map(|(_, msg)| msg.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| {
                m.iter()
                    .filter(|(ok, _)| !*ok)
                    .map(|(_, msg)| msg.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((true, message.to_string()));
        }
    }

    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((false, message.to_string()));
        }
    }
}
