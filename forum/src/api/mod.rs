/*
 * Responsibility
 * - URL layout of the forum service: /health plus /api/...
 */
use axum::{Router, routing::get};

use crate::state::AppState;

pub mod v1;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(v1::handlers::health::health))
        .nest("/api", v1::routes())
}
