/*
 * Responsibility
 * - /api/categories handlers
 * - Reads are public; writes are ADMIN only and the gate runs before the body is read
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use geekplay_trust::{
    error::AppError, extractors::MaybeAuthenticated, policy::require_role, token::Role,
};

use crate::api::v1::dto::categories::{CategoryRequest, CategoryResponse, UpdateCategoryRequest};
use crate::state::AppState;

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryResponse>> {
    let categories = state.categories.list().await;
    Json(categories.into_iter().map(CategoryResponse::from).collect())
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = state.categories.get(id).await?;
    Ok(Json(category.into()))
}

pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = state.categories.get_by_slug(&slug).await?;
    Ok(Json(category.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    require_role(principal.as_ref(), Role::Admin)?;
    let Json(req) = body?;
    req.validate().map_err(AppError::invalid)?;

    let (draft, slug) = req.into_parts();
    let category = state.categories.create(draft, &slug).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
    Path(id): Path<i64>,
    body: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, AppError> {
    require_role(principal.as_ref(), Role::Admin)?;
    let Json(req) = body?;
    req.validate().map_err(AppError::invalid)?;

    let category = state.categories.update(id, req.into_draft()).await?;
    Ok(Json(category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    MaybeAuthenticated(principal): MaybeAuthenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_role(principal.as_ref(), Role::Admin)?;

    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
