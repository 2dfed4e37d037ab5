//! Professor and administrator accounts.

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::types::Role;

pub type AccountId = i64;

/// Which account collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Professor,
    Administrator,
}

impl AccountKind {
    /// REST collection path for this kind.
    pub fn resource_path(&self) -> &'static str {
        match self {
            AccountKind::Professor => "/professor",
            AccountKind::Administrator => "/adm",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            AccountKind::Professor => Role::Professor,
            AccountKind::Administrator => Role::Administrator,
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            AccountKind::Professor => "Professor",
            AccountKind::Administrator => "Administrator",
        }
    }
}

impl From<Role> for AccountKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Professor => AccountKind::Professor,
            Role::Administrator => AccountKind::Administrator,
        }
    }
}

/// A login account. The password is only sent, never expected back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountId>,

    pub login: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Account {
    /// A new account to be created with the given password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            login: login.into(),
            password: Some(password.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.login.trim().is_empty() {
            return Err(AtlasError::Validation("Login cannot be empty".to_string()));
        }
        if matches!(&self.password, Some(p) if p.is_empty()) {
            return Err(AtlasError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy without the password, for responses and logs.
    pub fn redacted(&self) -> Account {
        Account {
            password: None,
            ..self.clone()
        }
    }
}

/// Body of `POST /auth/login` and the register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub login: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// Response of `POST /auth/login`.
///
/// The role stays a string here so that an unknown claim is reported as an
/// authorization failure rather than a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub role: String,
}

/// Response of `GET /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: AccountId,
    pub login: String,
    pub role: Role,
}
