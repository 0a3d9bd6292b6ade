//! Configuration types
//!
//! - **app**: local application config (API base URL, timeouts, storage path)
//! - **remote**: school-wide settings served by the backend
//! - **design**: visual theming settings served by the backend

pub mod app;
pub mod design;
pub mod remote;

pub use app::AppConfig;
pub use design::DesignConfig;
pub use remote::RemoteConfig;
