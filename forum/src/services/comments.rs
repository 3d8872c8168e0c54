//! Comment use cases, same rules as posts: enrich on read, owner or admin on write.
use chrono::{DateTime, Utc};
use geekplay_trust::{
    error::AppError,
    extractors::Principal,
    policy::authorize,
    services::profile::{AuthorStamp, ProfileCache, enrich, enrich_all, resolve_author},
    token::Role,
};

use crate::repos::{
    comment_repo::{self, CommentRow, NewComment},
    post_repo,
    store::Store,
};

#[derive(Debug, Clone)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub contenido: String,
    pub author: AuthorStamp,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CommentService {
    store: Store,
    profiles: ProfileCache,
}

impl CommentService {
    pub fn new(store: Store, profiles: ProfileCache) -> Self {
        Self { store, profiles }
    }

    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, AppError> {
        if post_repo::get(&self.store, post_id).await.is_none() {
            return Err(AppError::NotFound("post"));
        }

        let rows = comment_repo::list_for_post(&self.store, post_id).await;
        let mut authors: Vec<AuthorStamp> = rows.iter().map(stamp_of).collect();
        enrich_all(&self.profiles, &mut authors).await;

        Ok(rows
            .into_iter()
            .zip(authors)
            .map(|(row, author)| view_of(row, author))
            .collect())
    }

    pub async fn count_for_post(&self, post_id: i64) -> u64 {
        comment_repo::count_for_post(&self.store, post_id).await
    }

    pub async fn create(
        &self,
        principal: &Principal,
        post_id: i64,
        contenido: &str,
    ) -> Result<CommentView, AppError> {
        if post_repo::get(&self.store, post_id).await.is_none() {
            return Err(AppError::NotFound("post"));
        }

        let author = resolve_author(&self.profiles, principal).await;
        let row = comment_repo::create(
            &self.store,
            NewComment {
                post_id,
                contenido: contenido.trim().to_string(),
                author_id: author.author_id,
                author_name: author.author_name,
                author_avatar: author.author_avatar,
            },
        )
        .await
        .ok_or(AppError::NotFound("post"))?;

        tracing::debug!(comment_id = row.id, post_id, "comment created");
        Ok(self.view(row).await)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        contenido: &str,
    ) -> Result<CommentView, AppError> {
        let current = comment_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("comment"))?;
        authorize(Some(principal), current.author_id, Role::Admin)?;

        let row = comment_repo::update(&self.store, id, contenido.trim().to_string())
            .await
            .ok_or(AppError::NotFound("comment"))?;
        Ok(self.view(row).await)
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), AppError> {
        let current = comment_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("comment"))?;
        authorize(Some(principal), current.author_id, Role::Admin)?;

        comment_repo::delete(&self.store, id)
            .await
            .ok_or(AppError::NotFound("comment"))?;

        tracing::debug!(comment_id = id, removed_by = principal.user_id, "comment deleted");
        Ok(())
    }

    async fn view(&self, row: CommentRow) -> CommentView {
        let mut author = stamp_of(&row);
        enrich(&self.profiles, &mut author).await;
        view_of(row, author)
    }
}

fn stamp_of(row: &CommentRow) -> AuthorStamp {
    AuthorStamp {
        author_id: row.author_id,
        author_name: row.author_name.clone(),
        author_avatar: row.author_avatar.clone(),
    }
}

fn view_of(row: CommentRow, author: AuthorStamp) -> CommentView {
    CommentView {
        id: row.id,
        post_id: row.post_id,
        contenido: row.contenido,
        author,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
