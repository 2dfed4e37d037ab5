//! # Atlas Store
//!
//! Persistence seams for projects and accounts, with in-memory backends.

pub mod accounts;
pub mod store;

pub use accounts::{AccountStore, InMemoryAccountStore};
pub use store::{InMemoryProjectStore, ProjectStore};
