//! HTTP client adapter
//!
//! Single chokepoint for every outbound call: injects the session bearer
//! token, distinguishes JSON from multipart bodies, decodes responses
//! strictly into typed records, and classifies failures into the `ApiError`
//! taxonomy. Classified errors also emit their user-visible toast here, so
//! no caller can forget one.

mod auth;
mod error;

pub use auth::{login, logout, LoginCredentials};
pub use error::{ApiError, FieldError};

use crate::notify::{toast_for, Notifier, SilentNotifier};
use crate::session::SessionStore;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Request body variants the adapter understands
pub enum Body {
    Empty,
    Json(Value),
    /// Multipart uploads; reqwest sets the boundary content-type itself,
    /// so no JSON content-type header must be attached
    Multipart(reqwest::multipart::Form),
}

/// Typed client for the backend REST API
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
            notifier: Arc::new(SilentNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// GET a typed value
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let text = self.execute(Method::GET, path, query, Body::Empty).await?;
        self.decode(path, &text)
    }

    /// POST a JSON payload, decoding the created record
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let text = self.execute(Method::POST, path, &[], Body::Json(body)).await?;
        self.decode(path, &text)
    }

    /// PUT a JSON payload, decoding the updated record
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let text = self.execute(Method::PUT, path, &[], Body::Json(body)).await?;
        self.decode(path, &text)
    }

    /// DELETE; the response body, if any, is discarded
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, &[], Body::Empty).await?;
        Ok(())
    }

    /// POST a multipart form (file upload surface)
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let text = self
            .execute(Method::POST, path, &[], Body::Multipart(form))
            .await?;
        self.decode(path, &text)
    }

    /// Run one request through the chokepoint and return the raw body text
    /// of a successful response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Body,
    ) -> Result<String, ApiError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        // Token is read fresh per request; a login/logout between calls is
        // picked up without rebuilding the client.
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from_network_error(e);
                tracing::debug!(%method, path, outcome = %err, "request failed");
                self.notifier.error(&toast_for(&err));
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let err = ApiError::from_http_status(status, &body_text);
            if err.needs_login() {
                // First 401 wipes the session; callers redirect to login
                self.session.clear();
            }
            tracing::debug!(%method, path, status = status.as_u16(), outcome = %err, "request rejected");
            self.notifier.error(&toast_for(&err));
            return Err(err);
        }

        tracing::debug!(%method, path, status = status.as_u16(), "request ok");
        response.text().await.map_err(ApiError::from_network_error)
    }

    /// Strict decode at the boundary: an unexpected shape is a typed error,
    /// never a defensively rendered value.
    fn decode<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|e| {
            let err = ApiError::Decode(format!("{}: {}", path, e));
            self.notifier.error(&toast_for(&err));
            err
        })
    }
}
