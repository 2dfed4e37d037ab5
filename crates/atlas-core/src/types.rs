//! Common types used across Atlas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

/// Lifecycle status of a project request.
///
/// Variant order is the display order used for transition menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Initial state, assigned by the store on creation.
    #[serde(rename = "AGUARDANDO_ANALISE_PRELIMINAR")]
    AwaitingPreliminaryReview,
    /// An administrator is evaluating the request.
    #[serde(rename = "EM_ANALISE")]
    UnderReview,
    /// The request was declined.
    #[serde(rename = "PROJETO_RECUSADO")]
    Rejected,
    /// Approved and work has started.
    #[serde(rename = "EM_ANDAMENTO")]
    InProgress,
    /// Work finished.
    #[serde(rename = "FINALIZADO")]
    Completed,
}

impl ProjectStatus {
    /// Every status, in declaration order.
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::AwaitingPreliminaryReview,
        ProjectStatus::UnderReview,
        ProjectStatus::Rejected,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    /// The status every newly created project starts in.
    pub const INITIAL: ProjectStatus = ProjectStatus::AwaitingPreliminaryReview;

    /// Wire name exchanged with the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::AwaitingPreliminaryReview => "AGUARDANDO_ANALISE_PRELIMINAR",
            ProjectStatus::UnderReview => "EM_ANALISE",
            ProjectStatus::Rejected => "PROJETO_RECUSADO",
            ProjectStatus::InProgress => "EM_ANDAMENTO",
            ProjectStatus::Completed => "FINALIZADO",
        }
    }

    /// Human-readable label shown to professors and administrators.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::AwaitingPreliminaryReview => "Aguardando Análise",
            ProjectStatus::UnderReview => "Em Análise",
            ProjectStatus::Rejected => "Recusado",
            ProjectStatus::InProgress => "Em Andamento",
            ProjectStatus::Completed => "Finalizado",
        }
    }

    /// Returns true for states not expected to change further.
    ///
    /// This is a convention only; administrators may still move a project out.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Rejected | ProjectStatus::Completed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AtlasError::Validation(format!("Unknown project status: {s}")))
    }
}

/// Role claim carried in the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,
    #[serde(rename = "PROFESSOR")]
    Professor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "ADMINISTRADOR",
            Role::Professor => "PROFESSOR",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    pub fn is_professor(&self) -> bool {
        matches!(self, Role::Professor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMINISTRADOR" => Ok(Role::Administrator),
            "PROFESSOR" => Ok(Role::Professor),
            other => Err(AtlasError::Unauthorized(format!(
                "Unrecognized role claim: {other}"
            ))),
        }
    }
}

/// The authenticated entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: Role,
}

impl Actor {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn administrator() -> Self {
        Self::new(Role::Administrator)
    }

    pub fn professor() -> Self {
        Self::new(Role::Professor)
    }
}
