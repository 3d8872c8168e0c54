/*
 * Responsibility
 * - POST /api/auth/register, POST /api/auth/login
 * - Public routes: no principal required
 */
use axum::{Json, extract::State};
use geekplay_trust::error::AppError;

use crate::api::v1::dto::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let session = state.accounts.register(req.into_registration()).await?;
    Ok(Json(session.into()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let session = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}
