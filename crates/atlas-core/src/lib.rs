//! # Atlas Core
//!
//! Core domain types for the Atlas software-factory project requests.
//!
//! This crate provides the fundamental building blocks:
//! - [`Project`] - A persisted project request and its lifecycle status
//! - [`ProjectDraft`] - A request that has not been stored yet
//! - [`Session`] - Who is acting, backed by a stored credential
//! - [`AtlasError`] - Error taxonomy shared by every crate

pub mod account;
pub mod error;
pub mod project;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use account::{Account, AccountId, AccountKind, AuthResponse, LoginCredentials, Profile};
pub use error::{AtlasError, Result};
pub use project::{Project, ProjectDraft, ProjectDraftBuilder, ProjectId};
pub use session::{
    Credential, CredentialStorage, FileCredentialStorage, MemoryCredentialStorage, Session,
};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{AtlasError, Result};
    pub use crate::project::{Project, ProjectDraft, ProjectId};
    pub use crate::session::{Credential, Session};
    pub use crate::types::{Actor, ProjectStatus, Role};
}
