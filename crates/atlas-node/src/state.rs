//! Application state.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use atlas_core::{Account, AccountId, AccountKind, AtlasError, Result, Role};
use atlas_store::{AccountStore, InMemoryAccountStore, InMemoryProjectStore};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// An authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: AccountId,
    pub login: String,
    pub role: Role,
}

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Project records.
    pub projects: InMemoryProjectStore,

    /// Professor and administrator accounts, passwords hashed.
    pub accounts: InMemoryAccountStore,

    /// Issued bearer tokens.
    tokens: Arc<RwLock<HashMap<String, AuthUser>>>,

    /// Held across the login check and the write, so logins stay unique.
    account_writes: Arc<Mutex<()>>,
}

impl AppState {
    /// Create a new, empty application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account, hashing its password.
    pub async fn register(&self, kind: AccountKind, login: &str, password: &str) -> Result<Account> {
        if password.is_empty() {
            return Err(AtlasError::Validation("Password cannot be empty".to_string()));
        }
        let hashed = hash_password(password)?;

        let _guard = self.account_writes.lock().await;
        if self.login_owner(login).await.is_some() {
            return Err(AtlasError::Validation(format!("Login already in use: {login}")));
        }
        self.accounts
            .create(kind, &Account::new(login, hashed))
            .await
    }

    /// Replace an account's login and, when given, its password.
    ///
    /// An empty or absent password keeps the current one.
    pub async fn update_account(
        &self,
        kind: AccountKind,
        id: AccountId,
        account: &Account,
    ) -> Result<Account> {
        let mut update = Account {
            id: Some(id),
            login: account.login.clone(),
            password: None,
        };
        update.validate()?;
        if let Some(password) = account.password.as_deref().filter(|p| !p.is_empty()) {
            update.password = Some(hash_password(password)?);
        }

        let _guard = self.account_writes.lock().await;
        match self.login_owner(&update.login).await {
            Some(owner) if owner != (kind, id) => {
                return Err(AtlasError::Validation(format!(
                    "Login already in use: {}",
                    update.login
                )));
            }
            _ => {}
        }
        self.accounts.update(kind, id, &update).await
    }

    /// Logins are unique across professors and administrators.
    pub async fn login_taken(&self, login: &str) -> bool {
        self.login_owner(login).await.is_some()
    }

    async fn login_owner(&self, login: &str) -> Option<(AccountKind, AccountId)> {
        for kind in [AccountKind::Professor, AccountKind::Administrator] {
            if let Some(account) = self.accounts.find_by_login(kind, login).await {
                return Some((kind, account.id.unwrap_or_default()));
            }
        }
        None
    }

    /// Check credentials and issue a fresh token.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<(String, AuthUser)> {
        for kind in [AccountKind::Administrator, AccountKind::Professor] {
            let Some(account) = self.accounts.find_by_login(kind, login).await else {
                continue;
            };
            let matches = match account.password.as_deref() {
                Some(stored) => verify_password(password, stored)?,
                None => false,
            };
            if !matches {
                break;
            }

            let user = AuthUser {
                account_id: account.id.unwrap_or_default(),
                login: account.login,
                role: kind.role(),
            };
            let token = Uuid::new_v4().to_string();
            self.tokens.write().await.insert(token.clone(), user.clone());
            return Ok((token, user));
        }
        Err(AtlasError::Unauthorized("Invalid login or password".to_string()))
    }

    /// Resolve a bearer token.
    pub async fn user_for_token(&self, token: &str) -> Option<AuthUser> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Drop every token issued to an account, e.g. after it is deleted.
    pub async fn revoke_tokens(&self, kind: AccountKind, account_id: AccountId) {
        let role = kind.role();
        self.tokens
            .write()
            .await
            .retain(|_, user| !(user.role == role && user.account_id == account_id));
    }

    /// Drop every token issued to a role.
    pub async fn revoke_role(&self, role: Role) {
        self.tokens.write().await.retain(|_, user| user.role != role);
    }
}

/// Hash a password with Argon2id and a random salt, in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AtlasError::Internal(format!("Failed to hash password: {e}")))
}

/// Check a password against a stored PHC hash. A mismatch is `Ok(false)`.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AtlasError::Internal(format!("Stored password hash is malformed: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AtlasError::Internal(format!("Failed to verify password: {e}"))),
    }
}
