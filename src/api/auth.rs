//! Admin login/logout against the backend auth endpoint
//!
//! The token itself is opaque; the server signals expiry with a 401, at
//! which point the adapter has already wiped the session.

use super::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    token: String,
}

/// Exchange credentials for a bearer token and store it in the session.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<(), ApiError> {
    let response: LoginResponse = client
        .post(
            "auth/login",
            json!({
                "email": credentials.email,
                "password": credentials.password,
            }),
        )
        .await?;

    if let Err(e) = client.session().set(&response.token) {
        // The in-memory token is already set; only persistence failed
        tracing::warn!("Session token not persisted: {}", e);
    }
    Ok(())
}

/// Drop the stored token. Purely client-side; the server keeps no session.
pub fn logout(client: &ApiClient) {
    client.session().clear();
}
