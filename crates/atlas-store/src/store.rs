//! Project store implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::{AtlasError, Project, ProjectDraft, ProjectId, ProjectStatus, Result};
use tokio::sync::RwLock;
use tracing::debug;

/// CRUD persistence for project records.
///
/// Implementations are the single source of truth: every returned
/// [`Project`] is the authoritative representation after the call.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects visible to the current actor.
    async fn list(&self) -> Result<Vec<Project>>;

    /// Fetch one project. Unknown ids yield [`AtlasError::NotFound`].
    async fn get(&self, id: ProjectId) -> Result<Project>;

    /// Persist a draft. The store assigns the id and the initial status.
    async fn create(&self, draft: &ProjectDraft) -> Result<Project>;

    /// Replace the whole record stored under `id`.
    async fn update(&self, id: ProjectId, project: &Project) -> Result<Project>;

    /// Remove a project.
    async fn delete(&self, id: ProjectId) -> Result<()>;
}

fn project_not_found(id: ProjectId) -> AtlasError {
    AtlasError::NotFound {
        resource_type: "Project".to_string(),
        id: id.to_string(),
    }
}

/// In-memory implementation of ProjectStore.
#[derive(Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<BTreeMap<ProjectId, Project>>>,

    /// Last assigned id.
    last_id: Arc<RwLock<ProjectId>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: Arc::new(RwLock::new(BTreeMap::new())),
            last_id: Arc::new(RwLock::new(0)),
        }
    }

    async fn next_id(&self) -> ProjectId {
        let mut last = self.last_id.write().await;
        *last += 1;
        *last
    }

    /// Number of stored projects.
    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.values().cloned().collect())
    }

    async fn get(&self, id: ProjectId) -> Result<Project> {
        let projects = self.projects.read().await;
        projects.get(&id).cloned().ok_or_else(|| project_not_found(id))
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project> {
        draft.validate()?;

        let id = self.next_id().await;
        let project = Project::from_store(id, draft.clone(), ProjectStatus::INITIAL);

        let mut projects = self.projects.write().await;
        projects.insert(id, project.clone());
        debug!(project_id = id, "Project created");

        Ok(project)
    }

    async fn update(&self, id: ProjectId, project: &Project) -> Result<Project> {
        let draft = project.draft();
        draft.validate()?;

        let mut projects = self.projects.write().await;
        let slot = projects.get_mut(&id).ok_or_else(|| project_not_found(id))?;

        // The path id wins over whatever id the payload carries.
        *slot = Project::from_store(id, draft, project.status());
        debug!(project_id = id, status = %project.status(), "Project updated");

        Ok(slot.clone())
    }

    async fn delete(&self, id: ProjectId) -> Result<()> {
        let mut projects = self.projects.write().await;
        projects.remove(&id).ok_or_else(|| project_not_found(id))?;
        debug!(project_id = id, "Project deleted");
        Ok(())
    }
}
