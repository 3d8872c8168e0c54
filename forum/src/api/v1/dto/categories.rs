/*
 * Responsibility
 * - Category request/response DTOs (fleet JSON names)
 * - The slug is chosen once at creation and never updated
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::category_repo::CategoryRow;
use crate::services::categories::CategoryDraft;

fn validate_fields(nombre: &str, descripcion: Option<&str>) -> Result<(), &'static str> {
    let nombre = nombre.trim();
    if nombre.is_empty() {
        return Err("nombre is required");
    }
    if nombre.chars().count() > 100 {
        return Err("nombre must be <= 100 chars");
    }
    if descripcion.is_some_and(|d| d.chars().count() > 500) {
        return Err("descripcion must be <= 500 chars");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub slug: String,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_fields(&self.nombre, self.descripcion.as_deref())?;

        let slug = self.slug.trim();
        if slug.is_empty() {
            return Err("slug is required");
        }
        if slug.len() > 50 {
            return Err("slug must be <= 50 chars");
        }
        // lowercase words joined by single hyphens: "peliculas-series"
        let well_formed = slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        if !well_formed {
            return Err("slug must be lowercase letters, digits and single hyphens");
        }
        Ok(())
    }

    pub fn into_parts(self) -> (CategoryDraft, String) {
        (
            CategoryDraft {
                nombre: self.nombre,
                descripcion: self.descripcion,
            },
            self.slug,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_fields(&self.nombre, self.descripcion.as_deref())
    }

    pub fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            nombre: self.nombre,
            descripcion: self.descripcion,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub slug: String,
    pub creado_en: DateTime<Utc>,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            slug: row.slug,
            creado_en: row.created_at,
        }
    }
}
