//! Debounced global search
//!
//! Keystrokes submit the current text; only the submission that survives the
//! debounce window untouched reaches the backend, and queries below the
//! minimum length never do. A result arriving after a newer submission is
//! discarded rather than shown.

use super::QueryCache;
use crate::api::ApiError;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct DebouncedSearch {
    cache: Arc<QueryCache>,
    debounce: Duration,
    min_query_len: usize,
    generation: AtomicU64,
}

impl DebouncedSearch {
    pub fn new(cache: Arc<QueryCache>, debounce_ms: u64, min_query_len: usize) -> Self {
        Self {
            cache,
            debounce: Duration::from_millis(debounce_ms),
            min_query_len,
            generation: AtomicU64::new(0),
        }
    }

    /// Submit the current input. Returns `Ok(None)` when this submission was
    /// superseded by a newer one or the query is below the minimum length;
    /// `Ok(Some(results))` only for the submission that actually fetched.
    pub async fn submit<T: DeserializeOwned>(&self, query: &str) -> Result<Option<T>, ApiError> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            // A newer keystroke arrived during the debounce window
            return Ok(None);
        }

        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return Ok(None);
        }

        let results = self.cache.cross::<T>("search", &[("q", query)]).await?;

        if self.generation.load(Ordering::SeqCst) != my_generation {
            // Stale response: a newer submission started while this one was
            // in flight; drop it instead of rendering outdated results
            return Ok(None);
        }
        Ok(Some(results))
    }
}
