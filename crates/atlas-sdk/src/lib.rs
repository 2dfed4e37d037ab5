//! # Atlas SDK
//!
//! HTTP collaborators for an Atlas backend: authentication, the project
//! store, and the professor/administrator stores.

pub mod accounts;
pub mod client;
pub mod config;
mod payload;
pub mod projects;

pub use accounts::HttpAccountStore;
pub use client::AtlasClient;
pub use config::ClientConfig;
pub use projects::HttpProjectStore;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::AtlasClient;
    pub use crate::config::ClientConfig;
    pub use atlas_core::prelude::*;
}
