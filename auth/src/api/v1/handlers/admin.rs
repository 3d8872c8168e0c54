/*
 * Responsibility
 * - /api/admin/users/{userId}/... (ADMIN only)
 * - The role gate runs before the body is read or any service call
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use geekplay_trust::{
    error::AppError, extractors::MaybeAuthenticated, policy::require_role, token::Role,
};

use crate::api::v1::dto::admin::{BanRequest, UserResponse};
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    require_role(principal.as_ref(), Role::Admin)?;

    let users = state.admin.list_users().await;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn ban_user(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
    Path(user_id): Path<i64>,
    body: Result<Json<BanRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let admin = require_role(principal.as_ref(), Role::Admin)?;
    let Json(req) = body?;
    req.validate().map_err(AppError::invalid)?;

    let row = state.admin.ban(admin.user_id, user_id, &req.razon).await?;
    Ok(Json(row.into()))
}

pub async fn unban_user(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let admin = require_role(principal.as_ref(), Role::Admin)?;

    let row = state.admin.unban(admin.user_id, user_id).await?;
    Ok(Json(row.into()))
}
