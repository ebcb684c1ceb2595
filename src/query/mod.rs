//! Cached, de-duplicated read access to the backend
//!
//! Reads are keyed by (resource kind, path, parameter set). A fetched value
//! stays fresh for the configured staleness window and is served from cache
//! until the window lapses, the params change, or a mutation invalidates the
//! kind. Each key owns a slot mutex held across the network call, so two
//! identical reads issued concurrently share one fetch. Retryable read
//! failures (5xx, network) get exactly one immediate retry; everything else
//! surfaces to the caller untouched.

mod search;

pub use search::DebouncedSearch;

use crate::api::{ApiClient, ApiError};
use crate::resources::ResourceKind;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Time source for the staleness window; injectable so tests can step it.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall-clock seconds since the unix epoch
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Identity of one cached read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    /// `None` for cross-resource reads (global search)
    kind: Option<ResourceKind>,
    path: String,
    /// Sorted so parameter order never splits the cache
    params: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<Value>,
    fetched_at: u64,
}

/// Query layer: cached reads with per-key de-duplication
pub struct QueryCache {
    client: Arc<ApiClient>,
    slots: DashMap<QueryKey, Arc<Mutex<Slot>>>,
    staleness_secs: u64,
    clock: Arc<dyn Clock>,
}

impl QueryCache {
    pub fn new(client: Arc<ApiClient>, staleness_secs: u64) -> Self {
        Self {
            client,
            slots: DashMap::new(),
            staleness_secs,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Cached list read for one resource kind
    pub async fn list<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.fetch(Some(kind), kind.path().to_string(), params).await
    }

    /// Cached detail read for one record
    pub async fn detail<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        id: &str,
    ) -> Result<T, ApiError> {
        self.fetch(Some(kind), format!("{}/{}", kind.path(), id), &[])
            .await
    }

    /// Cached cross-resource read (global search)
    pub async fn cross<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.fetch(None, path.to_string(), params).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        kind: Option<ResourceKind>,
        path: String,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut sorted: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        sorted.sort();

        let key = QueryKey {
            kind,
            path,
            params: sorted,
        };
        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Slot::default())))
            .clone();

        // Holding the slot lock across the fetch is what de-duplicates:
        // identical concurrent reads queue here and then hit the fresh value.
        let mut slot = slot.lock().await;
        let now = self.clock.now_secs();
        if let Some(value) = slot.value.as_ref() {
            if now.saturating_sub(slot.fetched_at) < self.staleness_secs {
                return decode(value.clone());
            }
        }

        let value = self.fetch_with_retry(&key).await?;
        slot.value = Some(value.clone());
        slot.fetched_at = self.clock.now_secs();
        decode(value)
    }

    /// One immediate retry for retryable failures, then surface.
    async fn fetch_with_retry(&self, key: &QueryKey) -> Result<Value, ApiError> {
        match self.client.get::<Value>(&key.path, &key.params).await {
            Ok(value) => Ok(value),
            Err(first) if first.is_retryable() => {
                tracing::warn!(path = %key.path, error = %first, "read failed, retrying once");
                self.client.get::<Value>(&key.path, &key.params).await
            }
            Err(first) => Err(first),
        }
    }

    /// Drop every cached read touching the given resource kind.
    ///
    /// Cross-resource reads (search) are dropped too: their results may
    /// contain records of any kind.
    pub fn invalidate(&self, kind: ResourceKind) {
        self.slots
            .retain(|key, _| key.kind.is_some() && key.kind != Some(kind));
        tracing::info!(%kind, "query cache invalidated");
    }

    /// Drop everything (logout, environment switch)
    pub fn invalidate_all(&self) {
        self.slots.clear();
    }

    #[cfg(test)]
    fn cached_keys(&self) -> usize {
        self.slots.len()
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use tempfile::TempDir;

    fn cache_for_tests(tmp: &TempDir) -> QueryCache {
        let session = Arc::new(SessionStore::open(tmp.path().to_path_buf()).unwrap());
        let client = Arc::new(ApiClient::new("http://127.0.0.1:1", session));
        QueryCache::new(client, 300)
    }

    #[test]
    fn test_param_order_does_not_split_keys() {
        let a = QueryKey {
            kind: Some(ResourceKind::Programs),
            path: "programs".to_string(),
            params: vec![
                ("category".to_string(), "exchange".to_string()),
                ("page".to_string(), "1".to_string()),
            ],
        };
        let mut params = vec![
            ("page".to_string(), "1".to_string()),
            ("category".to_string(), "exchange".to_string()),
        ];
        params.sort();
        let b = QueryKey {
            kind: Some(ResourceKind::Programs),
            path: "programs".to_string(),
            params,
        };
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_invalidate_scopes_to_kind_plus_search() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_for_tests(&tmp);
        for (kind, path) in [
            (Some(ResourceKind::Programs), "programs"),
            (Some(ResourceKind::News), "news"),
            (None, "search"),
        ] {
            let key = QueryKey {
                kind,
                path: path.to_string(),
                params: vec![],
            };
            cache
                .slots
                .insert(key, Arc::new(Mutex::new(Slot::default())));
        }

        cache.invalidate(ResourceKind::Programs);
        assert_eq!(cache.cached_keys(), 1);
        let survivor = cache.slots.iter().next().unwrap().key().clone();
        assert_eq!(survivor.kind, Some(ResourceKind::News));
    }
}
