#![forbid(unsafe_code)]
//! Settings and theme propagation for the school portal
//!
//! Two remote settings stores (school settings and design settings) feed
//! appliers that keep a document's theme classes, CSS custom properties,
//! title and favicon in sync. A persisted visibility flag covers UI toggles
//! that must survive reloads.

pub mod api;
pub mod color;
pub mod config;
pub mod constants;
pub mod dom;
pub mod persistence;
pub mod presentation;
pub mod runtime;
pub mod store;
pub mod urls;
pub mod visibility;

pub use api::{ApiError, AssetKind, HttpBackend, SettingsBackend, upload_asset};
pub use config::{AppConfig, DesignConfig, RemoteConfig};
pub use dom::Document;
pub use runtime::PresentationRuntime;
pub use store::{DesignConfigStore, FailurePolicy, RemoteConfigStore, RemoteStore, StoreState};
pub use visibility::VisibilityFlag;
