//! Professor and administrator management. Administrators only.

use atlas_core::{Account, AccountId, AccountKind, AtlasError, Role};
use atlas_store::AccountStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::RequireAdmin;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

async fn list(state: &AppState, kind: AccountKind) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.accounts.list(kind).await?))
}

async fn get(state: &AppState, kind: AccountKind, id: AccountId) -> ApiResult<Json<Account>> {
    Ok(Json(state.accounts.get(kind, id).await?))
}

async fn create(
    state: &AppState,
    kind: AccountKind,
    account: Account,
) -> ApiResult<(StatusCode, Json<Account>)> {
    account.validate()?;
    let password = account.password.as_deref().unwrap_or_default();
    let created = state.register(kind, &account.login, password).await?;
    info!(kind = kind.noun(), login = %created.login, "Account created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    state: &AppState,
    kind: AccountKind,
    id: AccountId,
    account: Account,
) -> ApiResult<Json<Account>> {
    let updated = state.update_account(kind, id, &account).await?;
    info!(kind = kind.noun(), account_id = id, "Account updated");
    Ok(Json(updated))
}

async fn delete(state: &AppState, kind: AccountKind, id: AccountId) -> ApiResult<StatusCode> {
    state.accounts.delete(kind, id).await?;
    state.revoke_tokens(kind, id).await;
    info!(kind = kind.noun(), account_id = id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_professors(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Account>>> {
    list(&state, AccountKind::Professor).await
}

pub async fn get_professor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> ApiResult<Json<Account>> {
    get(&state, AccountKind::Professor, id).await
}

pub async fn create_professor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(account): Json<Account>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    create(&state, AccountKind::Professor, account).await
}

pub async fn update_professor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
    Json(account): Json<Account>,
) -> ApiResult<Json<Account>> {
    update(&state, AccountKind::Professor, id, account).await
}

pub async fn delete_professor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    delete(&state, AccountKind::Professor, id).await
}

pub async fn delete_all_professors(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    state.accounts.delete_all(AccountKind::Professor).await?;
    state.revoke_role(Role::Professor).await;
    info!(by = %admin.login, "All professors deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_admins(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Account>>> {
    list(&state, AccountKind::Administrator).await
}

pub async fn get_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> ApiResult<Json<Account>> {
    get(&state, AccountKind::Administrator, id).await
}

pub async fn create_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(account): Json<Account>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    create(&state, AccountKind::Administrator, account).await
}

pub async fn update_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
    Json(account): Json<Account>,
) -> ApiResult<Json<Account>> {
    update(&state, AccountKind::Administrator, id, account).await
}

/// Administrators cannot delete themselves.
pub async fn delete_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    if admin.account_id == id {
        return Err(ApiError(AtlasError::Validation(
            "Administrators cannot delete their own account".to_string(),
        )));
    }
    delete(&state, AccountKind::Administrator, id).await
}
