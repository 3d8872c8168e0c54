//! Post use cases: enrichment on every read, ownership guard on every write.
//! Every post sits in one category; the category is fixed at creation.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use geekplay_trust::{
    error::AppError,
    extractors::Principal,
    policy::{Access, authorize},
    services::{
        notify::{ModerationNotice, NotificationDispatcher},
        profile::{AuthorStamp, ProfileCache, enrich, enrich_all, resolve_author},
    },
    token::Role,
};

use crate::repos::{
    category_repo::{self, CategoryRow},
    post_repo::{self, NewPost, PostRow},
    store::Store,
};

/// A post as handlers see it, author already decorated.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub titulo: String,
    pub contenido: String,
    pub category: CategoryTag,
    pub author: AuthorStamp,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The category a post belongs to. Name and slug are absent if the category row is gone.
#[derive(Debug, Clone)]
pub struct CategoryTag {
    pub id: i64,
    pub nombre: Option<String>,
    pub slug: Option<String>,
}

impl CategoryTag {
    fn of(id: i64, row: Option<&CategoryRow>) -> Self {
        Self {
            id,
            nombre: row.map(|c| c.nombre.clone()),
            slug: row.map(|c| c.slug.clone()),
        }
    }
}

#[derive(Debug)]
pub struct PostDraft {
    pub titulo: String,
    pub contenido: String,
}

#[derive(Clone, Debug)]
pub struct PostService {
    store: Store,
    profiles: ProfileCache,
    notices: NotificationDispatcher,
}

impl PostService {
    pub fn new(store: Store, profiles: ProfileCache, notices: NotificationDispatcher) -> Self {
        Self {
            store,
            profiles,
            notices,
        }
    }

    pub async fn list(&self) -> Vec<PostView> {
        let rows = post_repo::list(&self.store).await;
        self.views(rows).await
    }

    pub async fn list_by_author(&self, author_id: i64) -> Vec<PostView> {
        let rows = post_repo::list_by_author(&self.store, author_id).await;
        self.views(rows).await
    }

    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<PostView>, AppError> {
        category_repo::get(&self.store, category_id)
            .await
            .ok_or(AppError::NotFound("category"))?;
        let rows = post_repo::list_by_category(&self.store, category_id).await;
        Ok(self.views(rows).await)
    }

    pub async fn list_by_category_slug(&self, slug: &str) -> Result<Vec<PostView>, AppError> {
        let category = category_repo::get_by_slug(&self.store, slug)
            .await
            .ok_or(AppError::NotFound("category"))?;
        let rows = post_repo::list_by_category(&self.store, category.id).await;
        Ok(self.views(rows).await)
    }

    pub async fn get(&self, id: i64) -> Result<PostView, AppError> {
        let row = post_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("post"))?;
        Ok(self.view(row).await)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        category_id: i64,
        draft: PostDraft,
    ) -> Result<PostView, AppError> {
        // Fail before the profile round-trip when the category is unknown
        category_repo::get(&self.store, category_id)
            .await
            .ok_or(AppError::NotFound("category"))?;
        let author = resolve_author(&self.profiles, principal).await;

        let row = post_repo::create(
            &self.store,
            NewPost {
                titulo: draft.titulo.trim().to_string(),
                contenido: draft.contenido.trim().to_string(),
                category_id,
                author_id: author.author_id,
                author_name: author.author_name,
                author_avatar: author.author_avatar,
            },
        )
        .await
        .ok_or(AppError::NotFound("category"))?;

        tracing::info!(
            post_id = row.id,
            author_id = row.author_id,
            category_id,
            "post created"
        );
        Ok(self.view(row).await)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        draft: PostDraft,
    ) -> Result<PostView, AppError> {
        let current = post_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("post"))?;
        authorize(Some(principal), current.author_id, Role::Admin)?;

        let row = post_repo::update(
            &self.store,
            id,
            draft.titulo.trim().to_string(),
            draft.contenido.trim().to_string(),
        )
        .await
        .ok_or(AppError::NotFound("post"))?;

        Ok(self.view(row).await)
    }

    /// Owner or admin. An admin removing someone else's post with a reason notifies the author.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: i64,
        reason: Option<&str>,
    ) -> Result<(), AppError> {
        let current = post_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("post"))?;
        let access = authorize(Some(principal), current.author_id, Role::Admin)?;

        let (post, comments) = post_repo::delete_with_comments(&self.store, id)
            .await
            .ok_or(AppError::NotFound("post"))?;

        tracing::info!(
            post_id = post.id,
            removed_by = principal.user_id,
            comments,
            "post deleted"
        );

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if let (Access::Privileged, Some(reason)) = (access, reason) {
            if post.author_id != principal.user_id {
                self.notices.dispatch(ModerationNotice::post_removed(
                    post.author_id,
                    &post.titulo,
                    reason,
                ));
            }
        }

        Ok(())
    }

    /// One profile lookup per distinct author, all in flight together.
    async fn views(&self, rows: Vec<PostRow>) -> Vec<PostView> {
        let mut authors: Vec<AuthorStamp> = rows.iter().map(stamp_of).collect();
        enrich_all(&self.profiles, &mut authors).await;

        let categories: HashMap<i64, CategoryRow> = category_repo::list(&self.store)
            .await
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        rows.into_iter()
            .zip(authors)
            .map(|(row, author)| {
                let category = CategoryTag::of(row.category_id, categories.get(&row.category_id));
                view_of(row, category, author)
            })
            .collect()
    }

    async fn view(&self, row: PostRow) -> PostView {
        let mut author = stamp_of(&row);
        enrich(&self.profiles, &mut author).await;

        let category = category_repo::get(&self.store, row.category_id).await;
        let category = CategoryTag::of(row.category_id, category.as_ref());
        view_of(row, category, author)
    }
}

fn stamp_of(row: &PostRow) -> AuthorStamp {
    AuthorStamp {
        author_id: row.author_id,
        author_name: row.author_name.clone(),
        author_avatar: row.author_avatar.clone(),
    }
}

fn view_of(row: PostRow, category: CategoryTag, author: AuthorStamp) -> PostView {
    PostView {
        id: row.id,
        titulo: row.titulo,
        contenido: row.contenido,
        category,
        author,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
