//! HTTP handlers.

pub mod accounts;
pub mod auth;
pub mod health;
pub mod projects;
