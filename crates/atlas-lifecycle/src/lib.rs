//! # Atlas Lifecycle
//!
//! Project status state machine, access decisions, and the view controller
//! that drives status changes.
//!
//! - [`AccessGuard`] - Who may do what, read from the live [`Session`](atlas_core::Session)
//! - [`LifecycleEngine`] - Legal transitions and their store side effects
//! - [`ProjectViewController`] - Fetch, select, confirm, submit
//! - [`AccountService`] - Guarded professor/administrator management

pub mod accounts;
pub mod controller;
pub mod engine;
pub mod guard;
pub mod policy;

#[cfg(test)]
pub(crate) mod testing;

pub use accounts::AccountService;
pub use controller::{ConfirmationPrompt, ProjectViewController, ViewOutcome, ViewState};
pub use engine::LifecycleEngine;
pub use guard::{AccessGuard, Action};
pub use policy::{AnyToAny, TransitionPolicy};
