//! oia-console: client SDK for the international affairs office backend
//!
//! This library provides:
//! - Typed HTTP adapter with bearer-token sessions and a classified error taxonomy
//! - Cached, de-duplicated resource queries with a staleness window
//! - Mutations with schema-driven payload sanitization and cache invalidation
//! - Declarative per-resource validation schemas and a form-submission state machine
//! - Debounced global search

pub mod api;
pub mod config;
pub mod forms;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod resources;
pub mod schema;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use query::QueryCache;
pub use session::SessionStore;
