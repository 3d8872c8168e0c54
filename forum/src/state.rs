/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::{
    categories::CategoryService, comments::CommentService, posts::PostService,
};

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
}

impl AppState {
    pub fn new(categories: CategoryService, posts: PostService, comments: CommentService) -> Self {
        Self {
            categories: Arc::new(categories),
            posts: Arc::new(posts),
            comments: Arc::new(comments),
        }
    }
}
