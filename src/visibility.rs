//! Persisted boolean UI visibility flags
//!
//! A flag reads its stored value once at construction (absent means
//! visible) and writes through on every change. Other writers to the same
//! storage are picked up by [`VisibilityFlag::reload`] or by forwarding
//! storage change notifications to [`VisibilityFlag::on_storage_event`].

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::constants::storage;
use crate::persistence::KeyValueStorage;

const DEFAULT_VISIBLE: bool = true;

/// Decode a stored value; absent or unrecognized values read as visible
fn parse_flag(key: &str, raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return DEFAULT_VISIBLE;
    };

    match serde_json::from_str::<bool>(raw.trim()) {
        Ok(value) => value,
        Err(_) => {
            warn!(key = %key, value = %raw, "Unrecognized stored flag value, using default");
            DEFAULT_VISIBLE
        }
    }
}

pub struct VisibilityFlag<S> {
    storage: S,
    key: String,
    visible: bool,
}

impl<S: KeyValueStorage> VisibilityFlag<S> {
    pub fn load(storage: S, key: &str) -> Self {
        let visible = parse_flag(key, storage.get_string(key).as_deref());
        debug!(key = %key, visible = visible, "Loaded visibility flag");
        Self {
            storage,
            key: key.to_string(),
            visible,
        }
    }

    /// The contact ribbon flag
    pub fn contact_ribbon(storage: S) -> Self {
        Self::load(storage, storage::CONTACT_RIBBON_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) -> Result<()> {
        self.set(false)
    }

    pub fn show(&mut self) -> Result<()> {
        self.set(true)
    }

    /// Update in memory and persist. The in-memory value changes even when
    /// the write fails, so the current view still reflects the request.
    pub fn set(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        let encoded = if visible { "true" } else { "false" };
        self.storage
            .set_string(&self.key, encoded)
            .with_context(|| format!("Failed to persist visibility flag '{}'", self.key))
    }

    /// Re-read from storage, returning the current value
    pub fn reload(&mut self) -> bool {
        self.visible = parse_flag(&self.key, self.storage.get_string(&self.key).as_deref());
        self.visible
    }

    /// Reconcile a storage change notification; other keys are ignored
    pub fn on_storage_event(&mut self, key: &str, new_value: Option<&str>) {
        if key != self.key {
            return;
        }
        self.visible = parse_flag(&self.key, new_value);
        debug!(key = %key, visible = self.visible, "Visibility flag changed externally");
    }
}
