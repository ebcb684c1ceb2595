//! Form drafts and the submission state machine
//!
//! A `FormSession` is the mutable local copy of a record's fields plus its
//! field→error map; it lives for one edit session and is discarded on cancel
//! or successful submit. Submission runs Idle -> Validating -> {Invalid,
//! Submitting} -> {Success, Failed}: local validation aborts before any
//! network call, and a server 422 re-populates the error map from the
//! structured detail, overriding whatever local validation said.

use crate::api::{ApiError, FieldError};
use crate::mutation::ResourceWriter;
use crate::resources::ResourceKind;
use crate::schema::{schema_for, validate_field, validate_payload};
use serde_json::{Map, Value};

/// Submission lifecycle. `Submitting` is the only state in which form
/// controls report disabled; that disabled state, not request cancellation,
/// is what prevents double submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success,
}

/// Outcome of one submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Local validation failed; the error map is populated and nothing was
    /// sent over the network
    Invalid,
    /// The mutation succeeded; the returned record carries the server state
    Saved(Value),
    /// The mutation failed; for a 422 the error map now mirrors the server's
    /// validation detail
    Failed(ApiError),
}

pub struct FormSession {
    kind: ResourceKind,
    /// Existing record id when editing, `None` when creating
    record_id: Option<String>,
    draft: Map<String, Value>,
    errors: Vec<FieldError>,
    state: FormState,
}

impl FormSession {
    /// Start a blank create form
    pub fn create(kind: ResourceKind) -> Self {
        Self {
            kind,
            record_id: None,
            draft: Map::new(),
            errors: Vec::new(),
            state: FormState::Idle,
        }
    }

    /// Start an edit form pre-filled from an existing record
    pub fn edit(kind: ResourceKind, id: impl Into<String>, record: Value) -> Self {
        let draft = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind,
            record_id: Some(id.into()),
            draft,
            errors: Vec::new(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// True while a submit is in flight; the UI disables every control
    pub fn controls_disabled(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// First invalid field in declared order, for scroll-into-view/focus
    pub fn first_invalid(&self) -> Option<&str> {
        self.errors.first().map(|e| e.field.as_str())
    }

    /// Edit one field. The field's error entry clears immediately
    /// (optimistic; full revalidation waits for the next submit), except URL
    /// fields, which revalidate eagerly on every change.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.errors.retain(|e| e.field != name);

        let rule = schema_for(self.kind).field(name);
        if let Some(rule) = rule.filter(|r| r.is_url) {
            if let Some(message) = validate_field(rule, Some(&value)) {
                self.errors.push(FieldError {
                    field: name.to_string(),
                    message,
                });
            }
        }
        self.draft.insert(name.to_string(), value);
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.draft.get(name)
    }

    /// Validate and, if clean, run the create/update mutation.
    pub async fn submit(&mut self, writer: &ResourceWriter) -> SubmitOutcome {
        self.state = FormState::Validating;
        let payload = Value::Object(self.draft.clone());

        let errors = validate_payload(schema_for(self.kind), &payload);
        if !errors.is_empty() {
            self.errors = errors;
            self.state = FormState::Idle;
            return SubmitOutcome::Invalid;
        }
        self.errors.clear();

        self.state = FormState::Submitting;
        let result: Result<Value, ApiError> = match &self.record_id {
            Some(id) => writer.update(self.kind, id, payload).await,
            None => writer.create(self.kind, payload).await,
        };

        match result {
            Ok(record) => {
                self.state = FormState::Success;
                SubmitOutcome::Saved(record)
            }
            Err(error) => {
                self.apply_server_errors(&error);
                self.state = FormState::Idle;
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// A 422 overrides the local error map with the server's field detail.
    fn apply_server_errors(&mut self, error: &ApiError) {
        let fields = error.field_errors();
        if !fields.is_empty() {
            self.errors = fields.to_vec();
        }
    }
}
