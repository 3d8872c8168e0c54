/*
 * Responsibility
 * - In-memory tables for categories, posts and comments behind one lock
 * - One lock so a post and its comments are removed together, and a category
 *   cannot lose its last reference between check and delete
 */
use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::RwLock;

use crate::repos::{category_repo::CategoryRow, comment_repo::CommentRow, post_repo::PostRow};

#[derive(Clone, Debug, Default)]
pub struct Store {
    pub(crate) tables: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub last_category_id: i64,
    pub categories: BTreeMap<i64, CategoryRow>,
    pub last_post_id: i64,
    pub posts: BTreeMap<i64, PostRow>,
    pub last_comment_id: i64,
    pub comments: BTreeMap<i64, CommentRow>,
}
