//! Test doubles shared by the engine and controller tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atlas_core::{
    AtlasError, Credential, Project, ProjectDraft, ProjectId, Result, Role, Session,
};
use atlas_store::{InMemoryProjectStore, ProjectStore};
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::engine::LifecycleEngine;
use crate::guard::AccessGuard;

/// Wraps the in-memory store, counting calls and injecting failures.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryProjectStore,
    calls: AtomicUsize,
    updates: Mutex<Vec<(ProjectId, Project)>>,
    fail_with: Mutex<Option<AtlasError>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<(ProjectId, Project)> {
        self.updates.lock().unwrap().clone()
    }

    /// Every following call fails with `err` until cleared.
    pub fn fail_with(&self, err: Option<AtlasError>) {
        *self.fail_with.lock().unwrap() = err;
    }

    /// Updates wait until the returned handle is notified.
    pub fn hold_updates(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Seed a project without counting the call.
    pub async fn seed(&self, draft: &ProjectDraft) -> Project {
        self.inner.create(draft).await.unwrap()
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectStore for RecordingStore {
    async fn list(&self) -> Result<Vec<Project>> {
        self.enter()?;
        self.inner.list().await
    }

    async fn get(&self, id: ProjectId) -> Result<Project> {
        self.enter()?;
        self.inner.get(id).await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project> {
        self.enter()?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: ProjectId, project: &Project) -> Result<Project> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.updates.lock().unwrap().push((id, project.clone()));

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failure = self.fail_with.lock().unwrap().clone();
        match failure {
            Some(err) => Err(err),
            None => self.inner.update(id, project).await,
        }
    }

    async fn delete(&self, id: ProjectId) -> Result<()> {
        self.enter()?;
        self.inner.delete(id).await
    }
}

pub fn sample_draft() -> ProjectDraft {
    ProjectDraft::builder()
        .name("Lab booking")
        .objective("Let students reserve lab benches")
        .scope("Computer science labs")
        .target_audience("Students and technicians")
        .start_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
        .build()
        .unwrap()
}

pub fn session_as(role: Option<Role>) -> Session {
    let session = Session::in_memory();
    if let Some(role) = role {
        session.establish(Credential::new("test-token", role)).unwrap();
    }
    session
}

pub fn engine_with(store: Arc<RecordingStore>, session: Session) -> LifecycleEngine {
    LifecycleEngine::new(store, AccessGuard::new(session))
}
