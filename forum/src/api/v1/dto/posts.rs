/*
 * Responsibility
 * - Post request/response DTOs (fleet JSON names)
 * - validate() does shape checks only
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::posts::{PostDraft, PostView};

/// Create body. The category is required here and fixed afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub titulo: String,
    pub contenido: String,
    pub category_id: Option<i64>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<i64, &'static str> {
        validate_post(&self.titulo, &self.contenido)?;
        self.category_id.ok_or("categoryId is required")
    }

    pub fn into_draft(self) -> PostDraft {
        PostDraft {
            titulo: self.titulo,
            contenido: self.contenido,
        }
    }
}

/// Update body. Only the text changes.
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub titulo: String,
    pub contenido: String,
}

fn validate_post(titulo: &str, contenido: &str) -> Result<(), &'static str> {
    let titulo = titulo.trim();
    if titulo.is_empty() {
        return Err("titulo is required");
    }
    if titulo.chars().count() > 200 {
        return Err("titulo must be <= 200 chars");
    }
    if contenido.trim().is_empty() {
        return Err("contenido is required");
    }
    if contenido.chars().count() > 10_000 {
        return Err("contenido must be <= 10000 chars");
    }
    Ok(())
}

impl PostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_post(&self.titulo, &self.contenido)
    }

    pub fn into_draft(self) -> PostDraft {
        PostDraft {
            titulo: self.titulo,
            contenido: self.contenido,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeletePostQuery {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub titulo: String,
    pub contenido: String,
    pub category_id: i64,
    pub category_nombre: Option<String>,
    pub category_slug: Option<String>,
    pub autor_id: i64,
    pub autor_nombre: Option<String>,
    pub autor_avatar: Option<String>,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            id: view.id,
            titulo: view.titulo,
            contenido: view.contenido,
            category_id: view.category.id,
            category_nombre: view.category.nombre,
            category_slug: view.category.slug,
            autor_id: view.author.author_id,
            autor_nombre: view.author.author_name,
            autor_avatar: view.author.author_avatar,
            creado_en: view.created_at,
            actualizado_en: view.updated_at,
        }
    }
}
