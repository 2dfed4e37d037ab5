//! Login, registration and profile endpoints.

use atlas_core::{Account, AccountKind, AuthResponse, LoginCredentials, Profile};
use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::auth::RequireAdmin;
use crate::error::ApiResult;
use crate::state::{AppState, AuthUser};

/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginCredentials>,
) -> ApiResult<Json<AuthResponse>> {
    let (token, user) = state.authenticate(&req.login, &req.password).await?;
    info!(login = %user.login, role = %user.role, "Login succeeded");

    Ok(Json(AuthResponse {
        token,
        role: user.role.as_str().to_string(),
    }))
}

/// Self-service professor registration. No token required.
pub async fn register_professor(
    State(state): State<AppState>,
    Json(req): Json<LoginCredentials>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = state
        .register(AccountKind::Professor, &req.login, &req.password)
        .await?;
    info!(login = %account.login, "Professor registered");
    Ok((StatusCode::CREATED, Json(account)))
}

/// Only administrators can create administrators.
pub async fn register_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<LoginCredentials>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = state
        .register(AccountKind::Administrator, &req.login, &req.password)
        .await?;
    info!(login = %account.login, by = %admin.login, "Administrator registered");
    Ok((StatusCode::CREATED, Json(account)))
}

/// The caller's own account.
pub async fn profile(user: AuthUser) -> Json<Profile> {
    Json(Profile {
        id: user.account_id,
        login: user.login,
        role: user.role,
    })
}
