//! Declarative field schemas shared by validation and payload sanitization
//!
//! One schema per resource kind: field name, label, required/length/format
//! rules, and the length limits the backend enforces with a 422. The same
//! table drives both the pre-submit validator and the sanitization pass, so
//! the two can never disagree about a limit.

mod sanitize;
mod validate;

pub use sanitize::sanitize_payload;
pub use validate::{validate_payload, validate_field};

use crate::resources::ResourceKind;
use once_cell::sync::Lazy;

/// Rules for one field, evaluated in the order required -> minLength ->
/// maxLength -> isUrl; the first violation wins.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub is_url: bool,
    /// Date-valued fields are exempt from trim/truncate sanitization
    pub is_date: bool,
    /// Overrides every generated message for this field when set
    pub message: Option<&'static str>,
}

impl FieldRule {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            min_length: None,
            max_length: None,
            is_url: false,
            is_date: false,
            message: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn min(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub const fn max(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub const fn url(mut self) -> Self {
        self.is_url = true;
        self
    }

    pub const fn date(mut self) -> Self {
        self.is_date = true;
        self
    }

    pub const fn message(mut self, msg: &'static str) -> Self {
        self.message = Some(msg);
        self
    }

    /// Message for a missing required field
    pub fn required_message(&self) -> String {
        match self.message {
            Some(m) => m.to_string(),
            None => format!("{} is required", self.label),
        }
    }

    /// Message for a minLength violation
    pub fn min_length_message(&self) -> String {
        match (self.message, self.min_length) {
            (Some(m), _) => m.to_string(),
            (None, Some(n)) => format!("{} must be at least {} characters", self.label, n),
            (None, None) => format!("{} is too short", self.label),
        }
    }

    /// Message for a maxLength violation
    pub fn max_length_message(&self) -> String {
        match (self.message, self.max_length) {
            (Some(m), _) => m.to_string(),
            (None, Some(n)) => format!("{} must be at most {} characters", self.label, n),
            (None, None) => format!("{} is too long", self.label),
        }
    }

    /// Message for a malformed URL
    pub fn url_message(&self) -> String {
        match self.message {
            Some(m) => m.to_string(),
            None => format!("{} must be a valid http(s) URL", self.label),
        }
    }
}

/// Ordered field rules for one resource kind
#[derive(Debug)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    pub fields: Vec<FieldRule>,
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

static SCHEMAS: Lazy<Vec<ResourceSchema>> = Lazy::new(|| {
    vec![
        ResourceSchema {
            kind: ResourceKind::Programs,
            fields: vec![
                FieldRule::new("title", "Title").required().min(3).max(200),
                FieldRule::new("description", "Description").max(2000),
                FieldRule::new("partnerUniversity", "Partner University")
                    .required()
                    .max(200),
                FieldRule::new("country", "Country").max(100),
                FieldRule::new("duration", "Duration").required().max(100),
                FieldRule::new("deadline", "Deadline").required().date(),
                FieldRule::new("applicationLink", "Application Link")
                    .required()
                    .url()
                    .max(500),
                FieldRule::new("category", "Category").max(100),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::News,
            fields: vec![
                FieldRule::new("title", "Title").required().min(3).max(200),
                FieldRule::new("excerpt", "Excerpt").max(500),
                FieldRule::new("content", "Content").required().max(10_000),
                FieldRule::new("category", "Category").required().max(100),
                FieldRule::new("imageUrl", "Image URL").url().max(500),
                FieldRule::new("publishedAt", "Published At").date(),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Partnerships,
            fields: vec![
                FieldRule::new("university", "University").required().max(200),
                FieldRule::new("country", "Country").required().max(100),
                FieldRule::new("description", "Description").max(2000),
                FieldRule::new("websiteUrl", "Website URL").url().max(500),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Events,
            fields: vec![
                FieldRule::new("title", "Title").required().min(3).max(200),
                FieldRule::new("description", "Description").max(2000),
                FieldRule::new("location", "Location").max(200),
                FieldRule::new("date", "Date").required().date(),
                FieldRule::new("endDate", "End Date").date(),
                FieldRule::new("registrationLink", "Registration Link")
                    .url()
                    .max(500),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Team,
            fields: vec![
                FieldRule::new("name", "Name").required().max(150),
                FieldRule::new("role", "Role").required().max(150),
                FieldRule::new("email", "Email").max(254),
                FieldRule::new("photoUrl", "Photo URL").url().max(500),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Faqs,
            fields: vec![
                FieldRule::new("question", "Question").required().min(5).max(300),
                FieldRule::new("answer", "Answer").required().max(2000),
                FieldRule::new("category", "Category").max(100),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Gallery,
            fields: vec![
                FieldRule::new("title", "Title").required().max(200),
                FieldRule::new("category", "Category").max(100),
                FieldRule::new("imageUrl", "Image URL").url().max(500),
            ],
        },
        ResourceSchema {
            kind: ResourceKind::Contacts,
            fields: vec![
                FieldRule::new("name", "Name").required().max(150),
                FieldRule::new("email", "Email").required().max(254),
                FieldRule::new("subject", "Subject").max(200),
                FieldRule::new("message", "Message").required().min(10).max(2000),
            ],
        },
    ]
});

/// Schema for one resource kind
pub fn schema_for(kind: ResourceKind) -> &'static ResourceSchema {
    SCHEMAS
        .iter()
        .find(|s| s.kind == kind)
        .unwrap_or_else(|| unreachable!("every ResourceKind has a schema"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_schema() {
        for kind in ResourceKind::ALL {
            assert!(!schema_for(kind).fields.is_empty());
        }
    }

    #[test]
    fn test_generated_messages_use_label() {
        let rule = schema_for(ResourceKind::Programs)
            .field("applicationLink")
            .unwrap();
        assert_eq!(rule.required_message(), "Application Link is required");
        assert_eq!(
            rule.max_length_message(),
            "Application Link must be at most 500 characters"
        );
    }

    #[test]
    fn test_custom_message_overrides_generated() {
        let rule = FieldRule::new("slug", "Slug").required().message("Pick a slug");
        assert_eq!(rule.required_message(), "Pick a slug");
        assert_eq!(rule.max_length_message(), "Pick a slug");
    }
}
