//! Account store implementations.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::{Account, AccountId, AccountKind, AtlasError, Result};
use tokio::sync::RwLock;
use tracing::debug;

/// CRUD persistence for professor and administrator accounts.
///
/// Returned accounts never carry a password.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>>;

    async fn get(&self, kind: AccountKind, id: AccountId) -> Result<Account>;

    async fn create(&self, kind: AccountKind, account: &Account) -> Result<Account>;

    /// Replace login and, when given, password.
    async fn update(&self, kind: AccountKind, id: AccountId, account: &Account)
        -> Result<Account>;

    async fn delete(&self, kind: AccountKind, id: AccountId) -> Result<()>;

    /// Remove every account of `kind`.
    async fn delete_all(&self, kind: AccountKind) -> Result<()>;
}

fn account_not_found(kind: AccountKind, id: AccountId) -> AtlasError {
    AtlasError::NotFound {
        resource_type: kind.noun().to_string(),
        id: id.to_string(),
    }
}

/// In-memory implementation of AccountStore.
///
/// Passwords are stored as given; callers that care hash them first.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountKind, BTreeMap<AccountId, Account>>>>,
    last_id: Arc<RwLock<AccountId>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn next_id(&self) -> AccountId {
        let mut last = self.last_id.write().await;
        *last += 1;
        *last
    }

    /// Look up an account by login, password included.
    pub async fn find_by_login(&self, kind: AccountKind, login: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&kind)?
            .values()
            .find(|a| a.login == login)
            .cloned()
    }

    /// Look up an account by id, password included.
    pub async fn find_by_id(&self, kind: AccountKind, id: AccountId) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts.get(&kind)?.get(&id).cloned()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&kind)
            .map(|m| m.values().map(Account::redacted).collect())
            .unwrap_or_default())
    }

    async fn get(&self, kind: AccountKind, id: AccountId) -> Result<Account> {
        self.find_by_id(kind, id)
            .await
            .map(|a| a.redacted())
            .ok_or_else(|| account_not_found(kind, id))
    }

    async fn create(&self, kind: AccountKind, account: &Account) -> Result<Account> {
        account.validate()?;
        if account.password.is_none() {
            return Err(AtlasError::Validation(
                "Password is required for new accounts".to_string(),
            ));
        }
        if self.find_by_login(kind, &account.login).await.is_some() {
            return Err(AtlasError::Validation(format!(
                "Login already in use: {}",
                account.login
            )));
        }

        let id = self.next_id().await;
        let stored = Account {
            id: Some(id),
            ..account.clone()
        };

        let mut accounts = self.accounts.write().await;
        accounts.entry(kind).or_default().insert(id, stored.clone());
        debug!(kind = kind.noun(), account_id = id, "Account created");

        Ok(stored.redacted())
    }

    async fn update(
        &self,
        kind: AccountKind,
        id: AccountId,
        account: &Account,
    ) -> Result<Account> {
        account.validate()?;

        let mut accounts = self.accounts.write().await;
        let collection = accounts.entry(kind).or_default();
        if collection
            .values()
            .any(|a| a.login == account.login && a.id != Some(id))
        {
            return Err(AtlasError::Validation(format!(
                "Login already in use: {}",
                account.login
            )));
        }

        let slot = collection
            .get_mut(&id)
            .ok_or_else(|| account_not_found(kind, id))?;
        slot.login = account.login.clone();
        if let Some(password) = &account.password {
            slot.password = Some(password.clone());
        }
        debug!(kind = kind.noun(), account_id = id, "Account updated");

        Ok(slot.redacted())
    }

    async fn delete(&self, kind: AccountKind, id: AccountId) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts
            .get_mut(&kind)
            .and_then(|m| m.remove(&id))
            .ok_or_else(|| account_not_found(kind, id))?;
        debug!(kind = kind.noun(), account_id = id, "Account deleted");
        Ok(())
    }

    async fn delete_all(&self, kind: AccountKind) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.remove(&kind);
        debug!(kind = kind.noun(), "All accounts deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_hides_password() {
        let store = InMemoryAccountStore::new();

        let created = store
            .create(AccountKind::Professor, &Account::new("ana", "pw"))
            .await
            .unwrap();

        assert_eq!(created.id, Some(1));
        assert_eq!(created.password, None);
        let stored = store.find_by_login(AccountKind::Professor, "ana").await.unwrap();
        assert_eq!(stored.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_kinds_are_separate() {
        let store = InMemoryAccountStore::new();
        store
            .create(AccountKind::Professor, &Account::new("ana", "pw"))
            .await
            .unwrap();

        assert!(store.list(AccountKind::Administrator).await.unwrap().is_empty());
        assert_eq!(store.list(AccountKind::Professor).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected() {
        let store = InMemoryAccountStore::new();
        store
            .create(AccountKind::Professor, &Account::new("ana", "pw"))
            .await
            .unwrap();

        let result = store
            .create(AccountKind::Professor, &Account::new("ana", "other"))
            .await;
        assert!(matches!(result, Err(AtlasError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_absent() {
        let store = InMemoryAccountStore::new();
        let created = store
            .create(AccountKind::Administrator, &Account::new("root", "pw"))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let renamed = Account {
            id: Some(id),
            login: "admin".to_string(),
            password: None,
        };
        store
            .update(AccountKind::Administrator, id, &renamed)
            .await
            .unwrap();

        let stored = store.find_by_id(AccountKind::Administrator, id).await.unwrap();
        assert_eq!(stored.login, "admin");
        assert_eq!(stored.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_delete_all() {
        let store = InMemoryAccountStore::new();
        for login in ["a", "b", "c"] {
            store
                .create(AccountKind::Professor, &Account::new(login, "pw"))
                .await
                .unwrap();
        }

        store.delete_all(AccountKind::Professor).await.unwrap();

        assert!(store.list(AccountKind::Professor).await.unwrap().is_empty());
        assert!(matches!(
            store.get(AccountKind::Professor, 1).await,
            Err(AtlasError::NotFound { .. })
        ));
    }
}
