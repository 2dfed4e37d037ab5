//! Role-based access decisions.
//!
//! Every permission question in Atlas is answered here. UI affordances
//! (disabled buttons, hidden menus) are projections of these same checks.

use atlas_core::{Actor, AtlasError, Result, Role, Session};
use tracing::warn;

/// Entry point for unauthenticated actors.
pub const LOGIN_ROUTE: &str = "/login";
pub const ADMIN_DASHBOARD_ROUTE: &str = "/admin/dashboard";
pub const PROFESSOR_DASHBOARD_ROUTE: &str = "/professor/dashboard";

/// Guarded actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewProjects,
    CreateProject,
    TransitionProject,
    EditProject,
    DeleteProject,
    AcknowledgeCompletion,
    ManageProfessors,
    ManageAdmins,
}

impl Action {
    /// Whether `role` may perform this action at all.
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Action::ViewProjects | Action::CreateProject => true,
            Action::TransitionProject
            | Action::EditProject
            | Action::DeleteProject
            | Action::ManageProfessors
            | Action::ManageAdmins => role.is_admin(),
            Action::AcknowledgeCompletion => role.is_professor(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::ViewProjects => "view projects",
            Action::CreateProject => "create projects",
            Action::TransitionProject => "change project status",
            Action::EditProject => "edit project details",
            Action::DeleteProject => "delete projects",
            Action::AcknowledgeCompletion => "acknowledge project completion",
            Action::ManageProfessors => "manage professors",
            Action::ManageAdmins => "manage administrators",
        }
    }
}

/// Maps an actor and an action to permit or deny.
///
/// Checks read the session on every call, so a logout or an invalidated
/// credential takes effect on the very next check.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    session: Session,
}

impl AccessGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// True only if the session is live and backs `actor`'s role.
    fn backs(&self, actor: &Actor) -> bool {
        self.session.current_role() == Some(actor.role)
    }

    pub fn permits(&self, actor: &Actor, action: Action) -> bool {
        self.backs(actor) && action.permits(actor.role)
    }

    pub fn can_transition(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::TransitionProject)
    }

    pub fn can_create_project(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::CreateProject)
    }

    pub fn can_edit_project(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::EditProject)
    }

    pub fn can_delete_project(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::DeleteProject)
    }

    pub fn can_acknowledge_completion(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::AcknowledgeCompletion)
    }

    pub fn can_manage_professors(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::ManageProfessors)
    }

    pub fn can_manage_admins(&self, actor: &Actor) -> bool {
        self.permits(actor, Action::ManageAdmins)
    }

    /// Like [`permits`](Self::permits), but explains a denial.
    ///
    /// A missing or mismatched session is [`AtlasError::Unauthorized`]
    /// (send the actor to login); an insufficient role is
    /// [`AtlasError::Forbidden`].
    pub fn authorize(&self, actor: &Actor, action: Action) -> Result<()> {
        if !self.backs(actor) {
            warn!(role = %actor.role, action = action.describe(), "No session backs this actor");
            return Err(AtlasError::Unauthorized(
                "No active session for this actor".to_string(),
            ));
        }
        if !action.permits(actor.role) {
            warn!(role = %actor.role, action = action.describe(), "Action denied");
            return Err(AtlasError::Forbidden {
                action: action.describe().to_string(),
            });
        }
        Ok(())
    }

    /// Where "back" leads for the current session.
    pub fn dashboard_route(&self) -> &'static str {
        match self.session.current_role() {
            Some(Role::Administrator) => ADMIN_DASHBOARD_ROUTE,
            Some(Role::Professor) => PROFESSOR_DASHBOARD_ROUTE,
            None => LOGIN_ROUTE,
        }
    }
}
