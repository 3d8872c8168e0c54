/*
 * Responsibility
 * - /api/posts handlers
 * - Reads are public; writes need a principal (401) and ownership or ADMIN (403)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use geekplay_trust::{error::AppError, extractors::Authenticated};

use crate::api::v1::dto::posts::{CreatePostRequest, DeletePostQuery, PostRequest, PostResponse};
use crate::state::AppState;

pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<PostResponse>> {
    let posts = state.posts.list().await;
    Json(posts.into_iter().map(PostResponse::from).collect())
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.get(id).await?;
    Ok(Json(post.into()))
}

pub async fn list_my_posts(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Json<Vec<PostResponse>> {
    let posts = state.posts.list_by_author(principal.user_id).await;
    Json(posts.into_iter().map(PostResponse::from).collect())
}

pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<PostResponse>> {
    let posts = state.posts.list_by_author(user_id).await;
    Json(posts.into_iter().map(PostResponse::from).collect())
}

pub async fn list_category_posts(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = state.posts.list_by_category(category_id).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn list_category_slug_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = state.posts.list_by_category_slug(&slug).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let category_id = req.validate().map_err(AppError::invalid)?;

    let post = state
        .posts
        .create(&principal, category_id, req.into_draft())
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn update_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let post = state.posts.update(&principal, id, req.into_draft()).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
    Query(query): Query<DeletePostQuery>,
) -> Result<StatusCode, AppError> {
    state
        .posts
        .delete(&principal, id, query.reason.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
