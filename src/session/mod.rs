//! Session token storage
//!
//! One opaque bearer token, held in memory and mirrored to a fixed file in
//! the platform config directory so the CLI stays logged in between runs.
//! The token is set on login and cleared on logout or the first 401; the
//! server is the only authority on expiry.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::RwLock;

/// Fixed storage key for the persisted token
const TOKEN_FILE: &str = "session_token";

/// Explicit session object injected into the API client.
///
/// Absence of a token implies unauthenticated; requests are then sent
/// without an `Authorization` header and the server answers 401.
#[derive(Debug)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
    token_path: PathBuf,
}

impl SessionStore {
    /// Open a session store rooted at the given directory, loading any
    /// previously persisted token.
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session dir {}", dir.display()))?;
        let token_path = dir.join(TOKEN_FILE);
        let token = match std::fs::read_to_string(&token_path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(_) => None,
        };
        Ok(Self {
            token: RwLock::new(token),
            token_path,
        })
    }

    /// Default location under the platform config directory
    pub fn default_dir() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "oia") {
            Ok(proj_dirs.config_dir().to_path_buf())
        } else {
            Ok(PathBuf::from(".oia"))
        }
    }

    /// Current bearer token, if logged in
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a new token (login) and persist it
    pub fn set(&self, token: &str) -> Result<()> {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
        std::fs::write(&self.token_path, token).with_context(|| {
            format!("Failed to persist session token to {}", self.token_path.display())
        })?;
        Ok(())
    }

    /// Wipe the token (logout or first 401)
    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        if self.token_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.token_path) {
                tracing::warn!("Failed to remove persisted session token: {}", e);
            }
        }
    }
}
