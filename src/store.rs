//! Remote settings stores
//!
//! One generic [`RemoteStore`] backs both the school settings and the design
//! settings. They differ only in endpoint and [`FailurePolicy`]: school
//! settings stay absent when the first fetch fails, design settings fall back
//! to a fixed default record so the UI always has a coherent look.
//!
//! State is published through a `tokio::sync::watch` channel. `revision`
//! increments only when `data` is replaced, which is what reactions key on.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, SettingsBackend};
use crate::config::{DesignConfig, RemoteConfig};
use crate::constants::endpoints;

/// Observable store state
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped every time `data` is replaced
    pub revision: u64,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
            revision: 0,
        }
    }
}

/// What a failed fetch does to `data`
#[derive(Debug, Clone)]
pub enum FailurePolicy<T> {
    /// Leave `data` as it was (absent if never fetched)
    KeepPrevious,
    /// Populate `data` with this record if nothing was loaded yet
    FallbackTo(T),
}

struct Inner<T> {
    backend: Arc<dyn SettingsBackend>,
    endpoint: String,
    policy: FailurePolicy<T>,
    state: watch::Sender<StoreState<T>>,
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone,
{
    fn apply_fetch(&self, result: Result<Value, ApiError>) {
        let parsed = result.and_then(|value| {
            serde_json::from_value::<T>(value).map_err(|e| ApiError::Decode(e.to_string()))
        });

        match parsed {
            Ok(data) => {
                info!(endpoint = %self.endpoint, "Settings loaded");
                self.state.send_modify(|s| {
                    s.data = Some(data);
                    s.error = None;
                    s.revision += 1;
                    s.loading = false;
                });
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Failed to load settings");
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    if let (FailurePolicy::FallbackTo(fallback), true) = (&self.policy, s.data.is_none()) {
                        info!(endpoint = %self.endpoint, "Using default settings");
                        s.data = Some(fallback.clone());
                        s.revision += 1;
                    }
                    s.loading = false;
                });
            }
        }
    }
}

/// A single remote settings resource with loading/error/data state
pub struct RemoteStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RemoteStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub type RemoteConfigStore = RemoteStore<RemoteConfig>;
pub type DesignConfigStore = RemoteStore<DesignConfig>;

impl RemoteStore<RemoteConfig> {
    /// School settings store: stays absent when fetching fails
    pub fn remote_config(backend: Arc<dyn SettingsBackend>) -> Self {
        Self::new(backend, endpoints::SETTINGS, FailurePolicy::KeepPrevious)
    }
}

impl RemoteStore<DesignConfig> {
    /// Design settings store: falls back to [`DesignConfig::default`]
    pub fn design_config(backend: Arc<dyn SettingsBackend>) -> Self {
        Self::new(
            backend,
            endpoints::DESIGN_SETTINGS,
            FailurePolicy::FallbackTo(DesignConfig::default()),
        )
    }
}

impl<T> RemoteStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Unmounted store in its initial `loading` state; no request is issued
    pub fn new(backend: Arc<dyn SettingsBackend>, endpoint: &str, policy: FailurePolicy<T>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                endpoint: endpoint.to_string(),
                policy,
                state,
            }),
        }
    }

    /// Issue the initial fetch on the current tokio runtime
    ///
    /// The task only holds a weak handle, so if every handle to the store is
    /// dropped before the response arrives the response is discarded.
    pub fn mount(self) -> Self {
        let weak = Arc::downgrade(&self.inner);
        let backend = Arc::clone(&self.inner.backend);
        let endpoint = self.inner.endpoint.clone();

        tokio::spawn(async move {
            let result = backend.get_json(&endpoint).await;
            match weak.upgrade() {
                Some(inner) => inner.apply_fetch(result),
                None => debug!(endpoint = %endpoint, "Store dropped before fetch completed, ignoring response"),
            }
        });

        self
    }

    /// Read the resource; failures land in `error`, never in the return
    pub async fn fetch(&self) {
        self.inner.state.send_modify(|s| s.loading = true);
        let result = self.inner.backend.get_json(&self.inner.endpoint).await;
        self.inner.apply_fetch(result);
    }

    pub async fn refresh(&self) {
        self.fetch().await
    }

    /// Shallow-merge `partial` over the current data and write it
    ///
    /// Returns `Ok(None)` without touching the network if nothing has been
    /// loaded yet. On success `data` becomes the server's canonical object;
    /// nothing is applied before the server confirms. On failure `error` is
    /// set, `data` is kept and the error is returned to the caller.
    pub async fn update(&self, partial: Map<String, Value>) -> Result<Option<T>, ApiError> {
        let current = self.inner.state.borrow().data.clone();
        let Some(current) = current else {
            debug!(endpoint = %self.inner.endpoint, "Update skipped, settings not loaded");
            return Ok(None);
        };

        let mut merged = serde_json::to_value(&current).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(partial);
        }

        let result = self
            .inner
            .backend
            .put_json(&self.inner.endpoint, &merged)
            .await
            .and_then(|value| serde_json::from_value::<T>(value).map_err(|e| ApiError::Decode(e.to_string())));

        match result {
            Ok(saved) => {
                info!(endpoint = %self.inner.endpoint, "Settings updated");
                // Completion order decides: a later-finishing write overwrites this one
                self.inner.state.send_modify(|s| {
                    s.data = Some(saved.clone());
                    s.error = None;
                    s.revision += 1;
                });
                Ok(Some(saved))
            }
            Err(e) => {
                warn!(endpoint = %self.inner.endpoint, error = %e, "Failed to update settings");
                self.inner.state.send_modify(|s| s.error = Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Replace local data with an object already saved elsewhere
    pub fn replace(&self, data: T) {
        self.inner.state.send_modify(|s| {
            s.data = Some(data);
            s.revision += 1;
        });
    }

    pub fn set_error(&self, error: Option<String>) {
        self.inner.state.send_modify(|s| s.error = error);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    pub fn state(&self) -> StoreState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.inner.state.subscribe()
    }

    /// Wait until the store is no longer loading
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|s| !s.loading).await;
    }
}
