//! Project endpoints.

use atlas_core::{Project, ProjectDraft, ProjectId, ProjectStatus};
use atlas_store::ProjectStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::RequireAdmin;
use crate::error::ApiResult;
use crate::state::{AppState, AuthUser};

/// Full replacement of a project. A payload `id` is ignored; the path wins.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(flatten)]
    pub draft: ProjectDraft,
    pub status: ProjectStatus,
}

pub async fn list_projects(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list().await?))
}

pub async fn get_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get(id).await?))
}

/// Any logged-in caller may submit a request. Id and status are assigned here.
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.projects.create(&draft).await?;
    info!(project_id = project.id(), by = %user.login, "Project submitted");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let incoming = Project::from_store(id, req.draft, req.status);
    let project = state.projects.update(id, &incoming).await?;
    info!(project_id = id, status = %project.status(), by = %admin.login, "Project updated");
    Ok(Json(project))
}

pub async fn delete_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> ApiResult<StatusCode> {
    state.projects.delete(id).await?;
    info!(project_id = id, by = %admin.login, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
