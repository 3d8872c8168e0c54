use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::comments::CommentView;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub contenido: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let contenido = self.contenido.trim();
        if contenido.is_empty() {
            return Err("contenido is required");
        }
        if contenido.chars().count() > 2_000 {
            return Err("contenido must be <= 2000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub contenido: String,
    pub post_id: i64,
    pub autor_id: i64,
    pub autor_nombre: Option<String>,
    pub autor_avatar: Option<String>,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.id,
            contenido: view.contenido,
            post_id: view.post_id,
            autor_id: view.author.author_id,
            autor_nombre: view.author.author_name,
            autor_avatar: view.author.author_avatar,
            creado_en: view.created_at,
            actualizado_en: view.updated_at,
        }
    }
}
