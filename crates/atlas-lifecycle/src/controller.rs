//! Project view controller.
//!
//! Bridges view events to the lifecycle engine. A status change is a
//! two-phase commit: the administrator picks a candidate status, opens a
//! confirmation naming both the current and the candidate status, and only
//! then is the transition submitted.
//!
//! The controller is shared (`&self` everywhere) so a view can keep polling
//! it while a request is in flight. Each `enter`/`leave` bumps a view token;
//! a response that comes back under a stale token is dropped.

use std::sync::Arc;

use atlas_core::{Actor, AtlasError, Project, ProjectId, ProjectStatus, Result};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::engine::LifecycleEngine;
use crate::guard::LOGIN_ROUTE;

/// What the view is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing entered yet, or a fetch is pending.
    Loading,
    /// A project is displayed.
    Ready,
    /// The store does not know this id. Not retried.
    NotFound,
    /// Fetch failed for another reason; the actor may retry.
    Failed(String),
    /// The session is gone; go to [`LOGIN_ROUTE`].
    LoginRequired,
}

/// The second, explicit acknowledgment before a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub project_id: ProjectId,
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

impl ConfirmationPrompt {
    pub fn message(&self) -> String {
        format!(
            "Change project status from \"{}\" to \"{}\"? The requesting professor will be notified.",
            self.from.label(),
            self.to.label()
        )
    }
}

/// Result of a view action.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// The store accepted the change; this is its representation.
    Updated(Project),
    /// Completion acknowledged.
    Acknowledged,
    /// The action failed; the view stays interactive.
    Rejected(AtlasError),
    /// The session was cleared; navigate to [`LOGIN_ROUTE`].
    RedirectToLogin,
    /// The view was left before the response arrived.
    Discarded,
}

#[derive(Debug)]
struct ViewInner {
    token: u64,
    state: ViewState,
    project: Option<Project>,
    pending: Option<ProjectStatus>,
    confirmation: Option<ConfirmationPrompt>,
    in_flight: bool,
    last_error: Option<AtlasError>,
}

impl ViewInner {
    fn new() -> Self {
        Self {
            token: 0,
            state: ViewState::Loading,
            project: None,
            pending: None,
            confirmation: None,
            in_flight: false,
            last_error: None,
        }
    }

    fn reset(&mut self) {
        self.token += 1;
        self.state = ViewState::Loading;
        self.project = None;
        self.pending = None;
        self.confirmation = None;
        self.in_flight = false;
        self.last_error = None;
    }

    fn displayed(&self) -> Result<&Project> {
        match (&self.state, &self.project) {
            (ViewState::Ready, Some(project)) => Ok(project),
            _ => Err(AtlasError::Validation("No project is displayed".to_string())),
        }
    }
}

/// Orchestrates fetch-on-entry, status changes, and acknowledgment.
pub struct ProjectViewController {
    engine: Arc<LifecycleEngine>,
    inner: RwLock<ViewInner>,
}

impl ProjectViewController {
    pub fn new(engine: Arc<LifecycleEngine>) -> Self {
        Self {
            engine,
            inner: RwLock::new(ViewInner::new()),
        }
    }

    fn actor(&self) -> Option<Actor> {
        self.engine.guard().session().current_actor()
    }

    /// Open the view for project `id` and fetch it.
    pub async fn enter(&self, id: ProjectId) -> ViewState {
        let token = {
            let mut inner = self.inner.write().await;
            inner.reset();
            inner.token
        };

        let Some(actor) = self.actor() else {
            let mut inner = self.inner.write().await;
            inner.state = ViewState::LoginRequired;
            return inner.state.clone();
        };

        debug!(project_id = id, "Fetching project for view");
        let result = self.engine.get_project(id, &actor).await;

        let mut inner = self.inner.write().await;
        if inner.token != token {
            debug!(project_id = id, "Ignoring fetch for a view that was left");
            return inner.state.clone();
        }

        let state = match result {
            Ok(project) => {
                inner.pending = Some(project.status());
                inner.project = Some(project);
                ViewState::Ready
            }
            Err(AtlasError::NotFound { .. }) => ViewState::NotFound,
            Err(e) if e.requires_login() => {
                self.engine.guard().session().invalidate();
                ViewState::LoginRequired
            }
            Err(e) => {
                warn!(project_id = id, error = %e, "Failed to load project");
                ViewState::Failed(e.to_string())
            }
        };
        inner.state = state.clone();
        state
    }

    /// Navigate away. Responses still in flight will be discarded.
    pub async fn leave(&self) {
        let mut inner = self.inner.write().await;
        inner.reset();
    }

    pub async fn state(&self) -> ViewState {
        self.inner.read().await.state.clone()
    }

    pub async fn project(&self) -> Option<Project> {
        self.inner.read().await.project.clone()
    }

    pub async fn pending_status(&self) -> Option<ProjectStatus> {
        self.inner.read().await.pending
    }

    pub async fn confirmation(&self) -> Option<ConfirmationPrompt> {
        self.inner.read().await.confirmation.clone()
    }

    pub async fn is_in_flight(&self) -> bool {
        self.inner.read().await.in_flight
    }

    pub async fn last_error(&self) -> Option<AtlasError> {
        self.inner.read().await.last_error.clone()
    }

    /// Choices for the status selector. Empty unless the actor may transition.
    pub async fn available_transitions(&self) -> Vec<ProjectStatus> {
        let inner = self.inner.read().await;
        match (inner.displayed(), self.actor()) {
            (Ok(project), Some(actor)) if self.engine.guard().can_transition(&actor) => {
                self.engine.available_transitions(project, &actor)
            }
            _ => Vec::new(),
        }
    }

    /// Hold `status` as the candidate. Nothing is submitted.
    ///
    /// Changing the candidate closes an open confirmation.
    pub async fn select_status(&self, status: ProjectStatus) {
        let mut inner = self.inner.write().await;
        if inner.pending != Some(status) {
            inner.confirmation = None;
        }
        inner.pending = Some(status);
    }

    fn check_submit(&self, inner: &ViewInner) -> Result<(Project, ProjectStatus)> {
        let project = inner.displayed()?;
        let actor = self
            .actor()
            .ok_or_else(|| AtlasError::Unauthorized("No active session".to_string()))?;
        let target = inner.pending.ok_or_else(|| {
            AtlasError::Validation("Select a status first".to_string())
        })?;

        self.engine.validate_transition(project, target, &actor)?;
        if inner.in_flight {
            return Err(AtlasError::Validation(
                "A status change is already in progress".to_string(),
            ));
        }
        Ok((project.clone(), target))
    }

    /// Whether the submit affordance is enabled.
    pub async fn can_submit(&self) -> bool {
        let inner = self.inner.read().await;
        self.check_submit(&inner).is_ok()
    }

    /// First phase: open the confirmation for the selected status.
    pub async fn open_confirmation(&self) -> Result<ConfirmationPrompt> {
        let mut inner = self.inner.write().await;
        let (project, target) = self.check_submit(&inner)?;

        let prompt = ConfirmationPrompt {
            project_id: project.id(),
            from: project.status(),
            to: target,
        };
        inner.confirmation = Some(prompt.clone());
        Ok(prompt)
    }

    pub async fn cancel_confirmation(&self) {
        self.inner.write().await.confirmation = None;
    }

    /// Second phase: submit the confirmed transition.
    ///
    /// On failure the confirmation stays open so the actor can retry.
    pub async fn confirm(&self) -> ViewOutcome {
        let (token, project, target) = {
            let mut inner = self.inner.write().await;
            let (project, target) = match self.check_submit(&inner) {
                Ok(checked) => checked,
                Err(e) if e.requires_login() => return ViewOutcome::RedirectToLogin,
                Err(e) => return ViewOutcome::Rejected(e),
            };
            if inner.confirmation.as_ref().map(|c| c.to) != Some(target) {
                return ViewOutcome::Rejected(AtlasError::Validation(
                    "Confirm the status change first".to_string(),
                ));
            }
            inner.in_flight = true;
            inner.last_error = None;
            (inner.token, project, target)
        };

        let Some(actor) = self.actor() else {
            return self.finish_without_session(token).await;
        };
        let result = self.engine.request_transition(&project, target, &actor).await;

        let mut inner = self.inner.write().await;
        if inner.token != token {
            debug!(project_id = project.id(), "Discarding transition response for a view that was left");
            return ViewOutcome::Discarded;
        }
        inner.in_flight = false;

        match result {
            Ok(updated) => {
                inner.pending = Some(updated.status());
                inner.project = Some(updated.clone());
                inner.confirmation = None;
                ViewOutcome::Updated(updated)
            }
            Err(e) if e.requires_login() => {
                drop(inner);
                self.finish_without_session(token).await
            }
            Err(e) => {
                inner.last_error = Some(e.clone());
                ViewOutcome::Rejected(e)
            }
        }
    }

    async fn finish_without_session(&self, token: u64) -> ViewOutcome {
        self.engine.guard().session().invalidate();
        info!(route = LOGIN_ROUTE, "Session rejected, redirecting to login");

        let mut inner = self.inner.write().await;
        if inner.token == token {
            inner.in_flight = false;
            inner.confirmation = None;
            inner.state = ViewState::LoginRequired;
        }
        ViewOutcome::RedirectToLogin
    }

    /// Professor confirms receipt of the displayed, completed project.
    pub async fn acknowledge_completion(&self) -> ViewOutcome {
        let inner = self.inner.read().await;
        let project = match inner.displayed() {
            Ok(project) => project,
            Err(e) => return ViewOutcome::Rejected(e),
        };
        let Some(actor) = self.actor() else {
            return ViewOutcome::RedirectToLogin;
        };

        match self.engine.acknowledge_completion(project, &actor) {
            Ok(()) => ViewOutcome::Acknowledged,
            Err(e) => ViewOutcome::Rejected(e),
        }
    }

    /// Whether the acknowledgment affordance is shown.
    pub async fn can_acknowledge(&self) -> bool {
        let inner = self.inner.read().await;
        match (inner.displayed(), self.actor()) {
            (Ok(project), Some(actor)) => self
                .engine
                .acknowledge_completion(project, &actor)
                .is_ok(),
            _ => false,
        }
    }

    /// Role-appropriate dashboard to return to.
    pub fn back_route(&self) -> &'static str {
        self.engine.guard().dashboard_route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{engine_with, sample_draft, session_as, RecordingStore};
    use atlas_core::{Role, Session};
    use atlas_store::ProjectStore;

    async fn setup(role: Option<Role>) -> (Arc<RecordingStore>, Session, Arc<ProjectViewController>, Project) {
        let store = Arc::new(RecordingStore::new());
        let project = store.seed(&sample_draft()).await;
        let session = session_as(role);
        let engine = Arc::new(engine_with(store.clone(), session.clone()));
        let controller = Arc::new(ProjectViewController::new(engine));
        (store, session, controller, project)
    }

    #[tokio::test]
    async fn test_enter_loads_project() {
        let (_, _, controller, project) = setup(Some(Role::Administrator)).await;

        assert_eq!(controller.enter(project.id()).await, ViewState::Ready);
        assert_eq!(controller.project().await, Some(project.clone()));
        assert_eq!(controller.pending_status().await, Some(project.status()));
        assert!(!controller.can_submit().await);
    }

    #[tokio::test]
    async fn test_enter_unknown_project() {
        let (_, _, controller, _) = setup(Some(Role::Professor)).await;

        assert_eq!(controller.enter(999).await, ViewState::NotFound);
        assert_eq!(controller.back_route(), "/professor/dashboard");
    }

    #[tokio::test]
    async fn test_enter_without_session() {
        let (store, _, controller, project) = setup(None).await;

        assert_eq!(controller.enter(project.id()).await, ViewState::LoginRequired);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_enter_connectivity_failure() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        store.fail_with(Some(AtlasError::Connection("unreachable".into())));

        let state = controller.enter(project.id()).await;
        assert!(matches!(state, ViewState::Failed(_)));
    }

    #[tokio::test]
    async fn test_two_phase_transition() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;

        controller.select_status(ProjectStatus::UnderReview).await;
        assert!(controller.can_submit().await);
        assert!(store.updates().is_empty());

        let prompt = controller.open_confirmation().await.unwrap();
        assert_eq!(prompt.from, ProjectStatus::AwaitingPreliminaryReview);
        assert_eq!(prompt.to, ProjectStatus::UnderReview);
        assert!(prompt.message().contains("\"Aguardando Análise\""));
        assert!(prompt.message().contains("Em Análise"));

        let outcome = controller.confirm().await;
        let ViewOutcome::Updated(updated) = outcome else {
            panic!("expected update, got {outcome:?}");
        };
        assert_eq!(updated.status(), ProjectStatus::UnderReview);
        assert_eq!(
            controller.project().await.map(|p| p.status()),
            Some(ProjectStatus::UnderReview)
        );
        assert_eq!(controller.confirmation().await, None);
        assert_eq!(store.updates()[0].1.status(), ProjectStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_confirm_requires_prompt() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::InProgress).await;

        let outcome = controller.confirm().await;

        assert!(matches!(outcome, ViewOutcome::Rejected(AtlasError::Validation(_))));
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_same_status_disables_submit() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(project.status()).await;

        assert!(!controller.can_submit().await);
        assert_eq!(
            controller.open_confirmation().await,
            Err(AtlasError::NoOpTransition {
                status: project.status()
            })
        );
        assert_eq!(
            controller.confirm().await,
            ViewOutcome::Rejected(AtlasError::NoOpTransition {
                status: project.status()
            })
        );
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_professor_cannot_submit() {
        let (store, _, controller, project) = setup(Some(Role::Professor)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::Completed).await;

        assert!(controller.available_transitions().await.is_empty());
        assert!(!controller.can_submit().await);
        assert!(matches!(
            controller.confirm().await,
            ViewOutcome::Rejected(AtlasError::Forbidden { .. })
        ));
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_response_clears_session() {
        let (store, session, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::Rejected).await;
        controller.open_confirmation().await.unwrap();
        store.fail_with(Some(AtlasError::Unauthorized("token expired".into())));

        let outcome = controller.confirm().await;

        assert_eq!(outcome, ViewOutcome::RedirectToLogin);
        assert!(!session.is_authenticated());
        assert_eq!(controller.state().await, ViewState::LoginRequired);
        assert_eq!(controller.back_route(), LOGIN_ROUTE);
    }

    #[tokio::test]
    async fn test_timeout_keeps_prompt_and_status() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::InProgress).await;
        controller.open_confirmation().await.unwrap();
        store.fail_with(Some(AtlasError::Connection("request timed out".into())));

        let outcome = controller.confirm().await;

        let ViewOutcome::Rejected(err) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert!(err.is_recoverable());
        assert_eq!(
            controller.project().await.map(|p| p.status()),
            Some(ProjectStatus::AwaitingPreliminaryReview)
        );
        assert!(controller.confirmation().await.is_some());
        assert_eq!(controller.last_error().await, Some(err));
        assert!(!controller.is_in_flight().await);

        // The actor re-triggers once connectivity is back.
        store.fail_with(None);
        assert!(matches!(controller.confirm().await, ViewOutcome::Updated(_)));
    }

    #[tokio::test]
    async fn test_submit_disabled_while_in_flight() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::UnderReview).await;
        controller.open_confirmation().await.unwrap();
        let release = store.hold_updates();

        let background = controller.clone();
        let first = tokio::spawn(async move { background.confirm().await });
        while !controller.is_in_flight().await {
            tokio::task::yield_now().await;
        }

        assert!(!controller.can_submit().await);
        assert!(matches!(
            controller.confirm().await,
            ViewOutcome::Rejected(AtlasError::Validation(_))
        ));

        release.notify_one();
        assert!(matches!(first.await.unwrap(), ViewOutcome::Updated(_)));
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_late_response_after_leave_is_ignored() {
        let (store, _, controller, project) = setup(Some(Role::Administrator)).await;
        controller.enter(project.id()).await;
        controller.select_status(ProjectStatus::Completed).await;
        controller.open_confirmation().await.unwrap();
        let release = store.hold_updates();

        let background = controller.clone();
        let pending = tokio::spawn(async move { background.confirm().await });
        while !controller.is_in_flight().await {
            tokio::task::yield_now().await;
        }

        controller.leave().await;
        release.notify_one();

        assert_eq!(pending.await.unwrap(), ViewOutcome::Discarded);
        assert_eq!(controller.project().await, None);
        assert_eq!(controller.state().await, ViewState::Loading);
    }

    #[tokio::test]
    async fn test_professor_acknowledges_completed_project() {
        let store = Arc::new(RecordingStore::new());
        let seeded = store.seed(&sample_draft()).await;
        ProjectStore::update(
            store.as_ref(),
            seeded.id(),
            &seeded.with_status(ProjectStatus::Completed),
        )
        .await
        .unwrap();
        let engine = Arc::new(engine_with(store.clone(), session_as(Some(Role::Professor))));
        let controller = ProjectViewController::new(engine);
        controller.enter(seeded.id()).await;

        assert!(controller.can_acknowledge().await);
        assert_eq!(controller.acknowledge_completion().await, ViewOutcome::Acknowledged);
        assert_eq!(
            controller.project().await.map(|p| p.status()),
            Some(ProjectStatus::Completed)
        );
    }

    #[tokio::test]
    async fn test_acknowledge_requires_completion() {
        let (_, _, controller, project) = setup(Some(Role::Professor)).await;
        controller.enter(project.id()).await;

        assert!(!controller.can_acknowledge().await);
        assert!(matches!(
            controller.acknowledge_completion().await,
            ViewOutcome::Rejected(AtlasError::NotCompleted { .. })
        ));
    }
}
