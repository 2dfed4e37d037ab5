//! Transition policies.

use atlas_core::{Actor, ProjectStatus};

/// Decides which target statuses are offered from a given status.
///
/// The engine never offers the current status, whatever the policy returns.
pub trait TransitionPolicy: Send + Sync {
    fn allowed_targets(&self, from: ProjectStatus, actor: &Actor) -> Vec<ProjectStatus>;
}

/// Any status may move to any other one.
///
/// Administrators use this to correct mistakes, so even the conventional
/// terminal states can be left.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyToAny;

impl TransitionPolicy for AnyToAny {
    fn allowed_targets(&self, from: ProjectStatus, _actor: &Actor) -> Vec<ProjectStatus> {
        ProjectStatus::ALL
            .into_iter()
            .filter(|status| *status != from)
            .collect()
    }
}
