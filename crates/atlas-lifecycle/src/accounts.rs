//! Guarded professor and administrator management.

use std::sync::Arc;

use atlas_core::{Account, AccountId, AccountKind, Actor, Result};
use atlas_store::AccountStore;
use tracing::info;

use crate::guard::{AccessGuard, Action};

fn action_for(kind: AccountKind) -> Action {
    match kind {
        AccountKind::Professor => Action::ManageProfessors,
        AccountKind::Administrator => Action::ManageAdmins,
    }
}

/// Account CRUD, with every call checked by the [`AccessGuard`].
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    guard: AccessGuard,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, guard: AccessGuard) -> Self {
        Self { store, guard }
    }

    pub async fn list(&self, kind: AccountKind, actor: &Actor) -> Result<Vec<Account>> {
        self.guard.authorize(actor, action_for(kind))?;
        self.store.list(kind).await
    }

    pub async fn get(&self, kind: AccountKind, id: AccountId, actor: &Actor) -> Result<Account> {
        self.guard.authorize(actor, action_for(kind))?;
        self.store.get(kind, id).await
    }

    pub async fn create(
        &self,
        kind: AccountKind,
        account: &Account,
        actor: &Actor,
    ) -> Result<Account> {
        self.guard.authorize(actor, action_for(kind))?;
        account.validate()?;

        let created = self.store.create(kind, account).await?;
        info!(kind = kind.noun(), login = %created.login, "Account created");
        Ok(created)
    }

    pub async fn update(
        &self,
        kind: AccountKind,
        id: AccountId,
        account: &Account,
        actor: &Actor,
    ) -> Result<Account> {
        self.guard.authorize(actor, action_for(kind))?;
        account.validate()?;

        let updated = self.store.update(kind, id, account).await?;
        info!(kind = kind.noun(), account_id = id, "Account updated");
        Ok(updated)
    }

    pub async fn delete(&self, kind: AccountKind, id: AccountId, actor: &Actor) -> Result<()> {
        self.guard.authorize(actor, action_for(kind))?;
        self.store.delete(kind, id).await?;
        info!(kind = kind.noun(), account_id = id, "Account deleted");
        Ok(())
    }

    /// Remove every professor account.
    pub async fn delete_all_professors(&self, actor: &Actor) -> Result<()> {
        self.guard.authorize(actor, Action::ManageProfessors)?;
        self.store.delete_all(AccountKind::Professor).await?;
        info!("All professor accounts deleted");
        Ok(())
    }
}
