//! Wires the settings stores to the document appliers
//!
//! Both stores are mounted independently; neither waits for the other. One
//! reaction task per concern watches its store and reruns its applier
//! whenever the store's data is replaced:
//! - design settings → theme classes and CSS properties
//! - school settings → document title and favicon
//!
//! All document mutation goes through those two tasks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::SettingsBackend;
use crate::dom::Document;
use crate::presentation::{FaviconSynchronizer, apply_design, apply_document_title};
use crate::store::{DesignConfigStore, RemoteConfigStore, RemoteStore, StoreState};
use crate::urls::resolve_asset_url;

fn lock(document: &Mutex<Document>) -> MutexGuard<'_, Document> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Reaction {
    handle: JoinHandle<()>,
    /// Last store revision this reaction applied
    applied: watch::Receiver<u64>,
}

/// Run `apply` for the current data and again after every data replacement
fn spawn_reaction<T, F>(name: &'static str, mut rx: watch::Receiver<StoreState<T>>, mut apply: F) -> Reaction
where
    T: Send + Sync + 'static,
    F: FnMut(Option<&T>) + Send + 'static,
{
    let (applied_tx, applied) = watch::channel(0);

    let handle = tokio::spawn(async move {
        let mut last_revision = 0;
        loop {
            {
                let state = rx.borrow_and_update();
                if state.revision != last_revision {
                    last_revision = state.revision;
                    debug!(reaction = name, revision = last_revision, "Applying settings");
                    apply(state.data.as_ref());
                    applied_tx.send_replace(last_revision);
                }
            }
            if rx.changed().await.is_err() {
                debug!(reaction = name, "Store dropped, reaction stopped");
                break;
            }
        }
    });

    Reaction { handle, applied }
}

/// Mounted stores plus the reactions keeping a document in sync with them
pub struct PresentationRuntime {
    document: Arc<Mutex<Document>>,
    remote: RemoteConfigStore,
    design: DesignConfigStore,
    remote_reaction: Reaction,
    design_reaction: Reaction,
}

impl PresentationRuntime {
    /// Mount both stores and start the reactions on the current tokio runtime
    pub fn start(backend: Arc<dyn SettingsBackend>, document: Document) -> Self {
        let document = Arc::new(Mutex::new(document));
        let api_base_url = backend.api_base_url().to_string();

        let remote = RemoteStore::remote_config(Arc::clone(&backend)).mount();
        let design = RemoteStore::design_config(Arc::clone(&backend)).mount();

        let design_reaction = {
            let document = Arc::clone(&document);
            spawn_reaction("design", design.subscribe(), move |design| {
                apply_design(&mut lock(&document), design);
            })
        };

        let remote_reaction = {
            let document = Arc::clone(&document);
            let mut favicon = FaviconSynchronizer::new();
            spawn_reaction("remote", remote.subscribe(), move |remote| {
                let mut doc = lock(&document);
                apply_document_title(&mut doc, remote);
                let url = resolve_asset_url(remote.and_then(|r| r.favicon.as_deref()), &api_base_url);
                favicon.sync(&mut doc, Some(url.as_str()));
            })
        };

        info!(api = %backend.api_base_url(), "Presentation runtime started");

        Self {
            document,
            remote,
            design,
            remote_reaction,
            design_reaction,
        }
    }

    pub fn remote(&self) -> &RemoteConfigStore {
        &self.remote
    }

    pub fn design(&self) -> &DesignConfigStore {
        &self.design
    }

    /// Snapshot of the current document state
    pub fn document(&self) -> Document {
        lock(&self.document).clone()
    }

    /// Wait until both stores have settled and their latest data is applied
    pub async fn settled(&self) {
        tokio::join!(self.remote.settled(), self.design.settled());

        let targets = [
            (&self.remote_reaction, self.remote.state().revision),
            (&self.design_reaction, self.design.state().revision),
        ];
        for (reaction, target) in targets {
            let mut applied = reaction.applied.clone();
            // Closed only if the reaction task ended, nothing left to wait for
            let _ = applied.wait_for(|revision| *revision >= target).await;
        }
    }
}

impl Drop for PresentationRuntime {
    fn drop(&mut self) {
        self.remote_reaction.handle.abort();
        self.design_reaction.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::testing::FakeBackend;
    use crate::config::DesignConfig;
    use crate::constants::{css, endpoints};
    use serde_json::json;

    const BASE: &str = "https://api.example.com/api";

    fn body_has(doc: &Document, class: &str) -> bool {
        doc.body.as_ref().unwrap().has_class(class)
    }

    #[tokio::test]
    async fn test_design_failure_applies_default_theme() {
        let backend = Arc::new(FakeBackend::new(BASE));
        backend.on_get(endpoints::SETTINGS, Err(ApiError::Transport("offline".into())));
        backend.on_get(endpoints::DESIGN_SETTINGS, Err(ApiError::Transport("offline".into())));

        let runtime = PresentationRuntime::start(backend.clone(), Document::new());
        assert!(runtime.remote().loading());
        assert!(runtime.design().loading());

        runtime.settled().await;

        assert_eq!(runtime.design().data(), Some(DesignConfig::default()));
        assert!(runtime.remote().data().is_none());

        let doc = runtime.document();
        assert!(body_has(&doc, "theme-default"));
        assert_eq!(doc.root.property(css::PRIMARY_COLOR), Some("#3B82F6"));
        assert_eq!(doc.head.as_ref().unwrap().links_where_rel_contains("icon").count(), 0);
    }

    #[tokio::test]
    async fn test_remote_settings_drive_title_and_favicon() {
        let backend = Arc::new(FakeBackend::new(BASE));
        backend.on_get(
            endpoints::SETTINGS,
            Ok(json!({"school_name": "Hillside High", "favicon": "/media/favicon.png"})),
        );
        backend.on_get(endpoints::DESIGN_SETTINGS, Ok(json!({"theme": "premium"})));

        let runtime = PresentationRuntime::start(backend.clone(), Document::new());
        runtime.settled().await;

        let doc = runtime.document();
        let head = doc.head.as_ref().unwrap();
        assert_eq!(head.title, "Hillside High");
        assert_eq!(head.links_where_rel_contains("icon").count(), crate::constants::favicon::RELS.len());
        assert!(
            head.links_where_rel_contains("icon")
                .all(|l| l.href.starts_with("https://api.example.com/media/favicon.png?t="))
        );
        assert!(body_has(&doc, "theme-premium"));
    }

    #[tokio::test]
    async fn test_replaced_design_is_reapplied() {
        let backend = Arc::new(FakeBackend::new(BASE));
        backend.on_get(endpoints::SETTINGS, Ok(json!({})));
        backend.on_get(endpoints::DESIGN_SETTINGS, Ok(json!({"theme": "default"})));

        let runtime = PresentationRuntime::start(backend.clone(), Document::new());
        runtime.settled().await;

        runtime.design().replace(DesignConfig {
            theme: "dark".to_string(),
            compact_mode: true,
            ..DesignConfig::default()
        });
        runtime.settled().await;

        let doc = runtime.document();
        assert!(body_has(&doc, "theme-dark"));
        assert!(!body_has(&doc, "theme-default"));
        assert!(body_has(&doc, "compact-mode"));
        assert_eq!(doc.root.classes_with_prefix("theme-").count(), 1);
    }

    #[tokio::test]
    async fn test_updated_favicon_replaces_links() {
        let backend = Arc::new(FakeBackend::new(BASE));
        backend.on_get(endpoints::SETTINGS, Ok(json!({"favicon": "/media/a.png"})));
        backend.on_get(endpoints::DESIGN_SETTINGS, Ok(json!({})));
        backend.on_put(endpoints::SETTINGS, Ok(json!({"favicon": "https://cdn.example.com/b.png"})));

        let runtime = PresentationRuntime::start(backend.clone(), Document::new());
        runtime.settled().await;

        let mut partial = serde_json::Map::new();
        partial.insert("favicon".to_string(), json!("https://cdn.example.com/b.png"));
        runtime.remote().update(partial).await.unwrap();
        runtime.settled().await;

        let doc = runtime.document();
        let links: Vec<_> = doc.head.as_ref().unwrap().links_where_rel_contains("icon").collect();
        assert_eq!(links.len(), crate::constants::favicon::RELS.len());
        assert!(links.iter().all(|l| l.href.starts_with("https://cdn.example.com/b.png?t=")));
    }
}
