use axum::{
    Router,
    routing::{get, put},
};

use crate::api::v1::handlers::{
    categories::{
        create_category, delete_category, get_category, get_category_by_slug, list_categories,
        update_category,
    },
    comments::{count_comments, create_comment, delete_comment, list_comments, update_comment},
    posts::{
        create_post, delete_post, get_post, list_category_posts, list_category_slug_posts,
        list_my_posts, list_posts, list_user_posts, update_post,
    },
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/categories/slug/{slug}", get(get_category_by_slug))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/my-posts", get(list_my_posts))
        .route("/posts/user/{user_id}", get(list_user_posts))
        .route("/posts/category/{category_id}", get(list_category_posts))
        .route("/posts/category/slug/{slug}", get(list_category_slug_posts))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route(
            "/comments/post/{post_id}",
            get(list_comments).post(create_comment),
        )
        .route("/comments/post/{post_id}/count", get(count_comments))
        .route("/comments/{id}", put(update_comment).delete(delete_comment))
}
