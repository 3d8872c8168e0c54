use chrono::{DateTime, Utc};
use geekplay_trust::token::Role;
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub razon: String,
}

impl BanRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let razon = self.razon.trim();
        if razon.is_empty() {
            return Err("razon is required");
        }
        if razon.chars().count() > 500 {
            return Err("razon must be <= 500 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub role: Role,
    pub baneado: bool,
    #[serde(rename = "motivoBaneo", skip_serializing_if = "Option::is_none")]
    pub motivo_baneo: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            nombre: row.nombre,
            email: row.email,
            role: row.role,
            baneado: row.banned,
            motivo_baneo: row.ban_reason,
            created_at: row.created_at,
        }
    }
}
