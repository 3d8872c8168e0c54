/*
 * Responsibility
 * - /api/comments handlers
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use geekplay_trust::{error::AppError, extractors::Authenticated};

use crate::api::v1::dto::comments::{CommentRequest, CommentResponse};
use crate::state::AppState;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = state.comments.list_for_post(post_id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

pub async fn count_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Json<u64> {
    Json(state.comments.count_for_post(post_id).await)
}

pub async fn create_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(post_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;

    let comment = state
        .comments
        .create(&principal, post_id, &req.contenido)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let comment = state.comments.update(&principal, id, &req.contenido).await?;
    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.comments.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
