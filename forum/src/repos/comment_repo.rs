/*
 * Responsibility
 * - comments CRUD over the in-memory store
 * - A comment can only be created under an existing post
 */
use chrono::{DateTime, Utc};

use crate::repos::store::Store;

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub contenido: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewComment {
    pub post_id: i64,
    pub contenido: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

pub async fn list_for_post(store: &Store, post_id: i64) -> Vec<CommentRow> {
    let mut rows: Vec<CommentRow> = store
        .tables
        .read()
        .await
        .comments
        .values()
        .filter(|c| c.post_id == post_id)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

pub async fn count_for_post(store: &Store, post_id: i64) -> u64 {
    store
        .tables
        .read()
        .await
        .comments
        .values()
        .filter(|c| c.post_id == post_id)
        .count() as u64
}

pub async fn get(store: &Store, id: i64) -> Option<CommentRow> {
    store.tables.read().await.comments.get(&id).cloned()
}

/// `None` when the post does not exist (checked under the same lock as the insert).
pub async fn create(store: &Store, new: NewComment) -> Option<CommentRow> {
    let mut tables = store.tables.write().await;
    if !tables.posts.contains_key(&new.post_id) {
        return None;
    }

    tables.last_comment_id += 1;
    let now = Utc::now();
    let row = CommentRow {
        id: tables.last_comment_id,
        post_id: new.post_id,
        contenido: new.contenido,
        author_id: new.author_id,
        author_name: new.author_name,
        author_avatar: new.author_avatar,
        created_at: now,
        updated_at: now,
    };
    tables.comments.insert(row.id, row.clone());
    Some(row)
}

pub async fn update(store: &Store, id: i64, contenido: String) -> Option<CommentRow> {
    let mut tables = store.tables.write().await;
    let row = tables.comments.get_mut(&id)?;

    row.contenido = contenido;
    row.updated_at = Utc::now();
    Some(row.clone())
}

pub async fn delete(store: &Store, id: i64) -> Option<CommentRow> {
    store.tables.write().await.comments.remove(&id)
}
