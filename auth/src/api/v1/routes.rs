use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    admin::{ban_user, list_users, unban_user},
    auth::{login, register},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{user_id}/ban", post(ban_user))
        .route("/admin/users/{user_id}/unban", post(unban_user))
}
