//! Project collection over HTTP.

use async_trait::async_trait;
use atlas_core::{Project, ProjectDraft, ProjectId, Result};
use atlas_store::ProjectStore;
use reqwest::Method;

use crate::client::{check_status, read_json, transport_error, AtlasClient};
use crate::payload::decode_list;

const RESOURCE: &str = "Project";

/// [`ProjectStore`] backed by the `/project` REST resource.
#[derive(Debug, Clone)]
pub struct HttpProjectStore {
    client: AtlasClient,
}

impl HttpProjectStore {
    pub fn new(client: AtlasClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectStore for HttpProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let response = self
            .client
            .request(Method::GET, "/project")
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, RESOURCE, None).await?;
        let body = response.bytes().await.map_err(transport_error)?;
        decode_list(&body)
    }

    async fn get(&self, id: ProjectId) -> Result<Project> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::GET, &format!("/project/{id}"))
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, RESOURCE, Some(&id_text)).await?).await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project> {
        let response = self
            .client
            .request(Method::POST, "/project")
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, RESOURCE, None).await?).await
    }

    async fn update(&self, id: ProjectId, project: &Project) -> Result<Project> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::PUT, &format!("/project/{id}"))
            .json(project)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(check_status(response, RESOURCE, Some(&id_text)).await?).await
    }

    async fn delete(&self, id: ProjectId) -> Result<()> {
        let id_text = id.to_string();
        let response = self
            .client
            .request(Method::DELETE, &format!("/project/{id}"))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, RESOURCE, Some(&id_text)).await?;
        Ok(())
    }
}
