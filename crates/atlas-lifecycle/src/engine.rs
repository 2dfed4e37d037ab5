//! Project lifecycle engine.
//!
//! Owns the rules for moving a project between statuses. The engine checks
//! permissions and transition legality before touching the store, and on
//! success hands back the store's representation, never a locally patched
//! copy. It has no UI side effects: every failure is an `Err`.

use std::sync::Arc;

use atlas_core::{
    Actor, AtlasError, Project, ProjectDraft, ProjectId, ProjectStatus, Result,
};
use atlas_store::ProjectStore;
use tracing::{debug, info, warn};

use crate::guard::{AccessGuard, Action};
use crate::policy::{AnyToAny, TransitionPolicy};

/// The lifecycle engine.
pub struct LifecycleEngine {
    store: Arc<dyn ProjectStore>,
    guard: AccessGuard,
    policy: Arc<dyn TransitionPolicy>,
}

impl LifecycleEngine {
    /// Create an engine with the unrestricted [`AnyToAny`] policy.
    pub fn new(store: Arc<dyn ProjectStore>, guard: AccessGuard) -> Self {
        Self {
            store,
            guard,
            policy: Arc::new(AnyToAny),
        }
    }

    /// Replace the transition policy.
    pub fn with_policy(mut self, policy: Arc<dyn TransitionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Statuses `project` may move to, in display order.
    ///
    /// Never includes the current status. Calling it twice with the same
    /// arguments yields the same list.
    pub fn available_transitions(&self, project: &Project, actor: &Actor) -> Vec<ProjectStatus> {
        let current = project.status();
        self.policy
            .allowed_targets(current, actor)
            .into_iter()
            .filter(|status| *status != current)
            .collect()
    }

    /// Checks a transition without contacting the store.
    pub fn validate_transition(
        &self,
        project: &Project,
        target: ProjectStatus,
        actor: &Actor,
    ) -> Result<()> {
        self.guard.authorize(actor, Action::TransitionProject)?;

        let current = project.status();
        if target == current {
            return Err(AtlasError::NoOpTransition { status: current });
        }
        if !self.available_transitions(project, actor).contains(&target) {
            return Err(AtlasError::InvalidTransition {
                from: current,
                to: target,
            });
        }
        Ok(())
    }

    /// Ask the store to move `project` to `target`.
    ///
    /// The full project is re-sent with the new status. No version token is
    /// exchanged: concurrent writers race and the last write wins.
    pub async fn request_transition(
        &self,
        project: &Project,
        target: ProjectStatus,
        actor: &Actor,
    ) -> Result<Project> {
        if let Err(e) = self.validate_transition(project, target, actor) {
            debug!(project_id = project.id(), target = %target, error = %e, "Transition rejected locally");
            return Err(e);
        }

        let from = project.status();
        match self
            .store
            .update(project.id(), &project.with_status(target))
            .await
        {
            Ok(updated) => {
                info!(
                    project_id = updated.id(),
                    from = %from,
                    to = %updated.status(),
                    "Project status changed"
                );
                Ok(updated)
            }
            Err(e) => {
                warn!(project_id = project.id(), target = %target, error = %e, "Store rejected transition");
                Err(e)
            }
        }
    }

    /// Professor confirms receipt of a completed project.
    ///
    /// Nothing is persisted; the store has no endpoint for it.
    pub fn acknowledge_completion(&self, project: &Project, actor: &Actor) -> Result<()> {
        self.guard.authorize(actor, Action::AcknowledgeCompletion)?;

        if project.status() != ProjectStatus::Completed {
            return Err(AtlasError::NotCompleted {
                status: project.status(),
            });
        }

        info!(project_id = project.id(), "Project completion acknowledged");
        Ok(())
    }

    /// Submit a new project request. It always starts awaiting review.
    pub async fn create_project(&self, draft: &ProjectDraft, actor: &Actor) -> Result<Project> {
        self.guard.authorize(actor, Action::CreateProject)?;
        draft.validate()?;

        let project = self.store.create(draft).await?;
        if project.status() != ProjectStatus::INITIAL {
            warn!(
                project_id = project.id(),
                status = %project.status(),
                "Store assigned a non-initial status to a new project"
            );
        }
        info!(project_id = project.id(), "Project created");
        Ok(project)
    }

    pub async fn list_projects(&self, actor: &Actor) -> Result<Vec<Project>> {
        self.guard.authorize(actor, Action::ViewProjects)?;
        self.store.list().await
    }

    pub async fn get_project(&self, id: ProjectId, actor: &Actor) -> Result<Project> {
        self.guard.authorize(actor, Action::ViewProjects)?;
        self.store.get(id).await
    }

    /// Replace a project's editable fields. Administrators only.
    ///
    /// The current status is re-sent unchanged; status moves only through
    /// [`request_transition`](Self::request_transition).
    pub async fn update_project_details(
        &self,
        project: &Project,
        draft: &ProjectDraft,
        actor: &Actor,
    ) -> Result<Project> {
        self.guard.authorize(actor, Action::EditProject)?;
        draft.validate()?;

        let updated = self
            .store
            .update(project.id(), &project.with_details(draft.clone()))
            .await?;
        info!(project_id = updated.id(), "Project details updated");
        Ok(updated)
    }

    pub async fn delete_project(&self, id: ProjectId, actor: &Actor) -> Result<()> {
        self.guard.authorize(actor, Action::DeleteProject)?;
        self.store.delete(id).await?;
        info!(project_id = id, "Project deleted");
        Ok(())
    }
}
