//! Bearer token extractors.

use atlas_core::{AtlasError, Role};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::state::{AppState, AuthUser};

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Any logged-in caller. Missing or unknown tokens are rejected with 401.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        state
            .user_for_token(token)
            .await
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))
    }
}

/// A logged-in administrator. Other roles are rejected with 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Administrator {
            return Err(ApiError(AtlasError::Forbidden {
                action: "administrator access required".to_string(),
            }));
        }
        Ok(Self(user))
    }
}
