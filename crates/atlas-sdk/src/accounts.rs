//! Professor and administrator collections over HTTP.

use async_trait::async_trait;
use atlas_core::{Account, AccountId, AccountKind, Result};
use atlas_store::AccountStore;
use reqwest::Method;

use crate::client::{check_status, read_json, transport_error, AtlasClient};
use crate::payload::decode_list;

/// [`AccountStore`] backed by the `/professor` and `/adm` REST resources.
#[derive(Debug, Clone)]
pub struct HttpAccountStore {
    client: AtlasClient,
}

impl HttpAccountStore {
    pub fn new(client: AtlasClient) -> Self {
        Self { client }
    }
}

fn item_path(kind: AccountKind, id: AccountId) -> String {
    format!("{}/{}", kind.resource_path(), id)
}

#[async_trait]
impl AccountStore for HttpAccountStore {
    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>> {
        let response = self
            .client
            .request(Method::GET, kind.resource_path())
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, kind.noun(), None).await?;
        let body = response.bytes().await.map_err(transport_error)?;
        decode_list(&body)
    }

    async fn get(&self, kind: AccountKind, id: AccountId) -> Result<Account> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::GET, &item_path(kind, id))
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, kind.noun(), Some(&id_text)).await?).await
    }

    async fn create(&self, kind: AccountKind, account: &Account) -> Result<Account> {
        let response = self
            .client
            .request(Method::POST, kind.resource_path())
            .json(account)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, kind.noun(), None).await?).await
    }

    async fn update(
        &self,
        kind: AccountKind,
        id: AccountId,
        account: &Account,
    ) -> Result<Account> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::PUT, &item_path(kind, id))
            .json(account)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, kind.noun(), Some(&id_text)).await?).await
    }

    async fn delete(&self, kind: AccountKind, id: AccountId) -> Result<()> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::DELETE, &item_path(kind, id))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, kind.noun(), Some(&id_text)).await?;
        Ok(())
    }

    async fn delete_all(&self, kind: AccountKind) -> Result<()> {
        let response = self
            .client
            .request(Method::DELETE, kind.resource_path())
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, kind.noun(), None).await?;
        Ok(())
    }
}
