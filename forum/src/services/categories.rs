//! Category use cases. Reads are open to everyone; the admin gate lives in the handlers.
use geekplay_trust::error::AppError;

use crate::repos::{
    category_repo::{self, CategoryRow, NewCategory},
    store::Store,
};

#[derive(Debug)]
pub struct CategoryDraft {
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CategoryService {
    store: Store,
}

impl CategoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<CategoryRow> {
        category_repo::list(&self.store).await
    }

    pub async fn get(&self, id: i64) -> Result<CategoryRow, AppError> {
        category_repo::get(&self.store, id)
            .await
            .ok_or(AppError::NotFound("category"))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryRow, AppError> {
        category_repo::get_by_slug(&self.store, slug)
            .await
            .ok_or(AppError::NotFound("category"))
    }

    pub async fn create(&self, draft: CategoryDraft, slug: &str) -> Result<CategoryRow, AppError> {
        let row = category_repo::create(
            &self.store,
            NewCategory {
                nombre: draft.nombre.trim().to_string(),
                descripcion: tidy(draft.descripcion),
                slug: slug.trim().to_string(),
            },
        )
        .await?;

        tracing::info!(category_id = row.id, slug = %row.slug, "category created");
        Ok(row)
    }

    pub async fn update(&self, id: i64, draft: CategoryDraft) -> Result<CategoryRow, AppError> {
        let row = category_repo::update(
            &self.store,
            id,
            draft.nombre.trim().to_string(),
            tidy(draft.descripcion),
        )
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let row = category_repo::delete(&self.store, id).await?;
        tracing::info!(category_id = row.id, slug = %row.slug, "category deleted");
        Ok(())
    }
}

fn tidy(descripcion: Option<String>) -> Option<String> {
    descripcion
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
