/*
 * Responsibility
 * - Account storage (in memory)
 * - Ids are assigned here, emails are unique case-insensitively
 */
use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use geekplay_trust::token::Role;
use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub nombre: String,
    pub role: Role,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nombre: String,
    pub role: Role,
}

#[derive(Clone, Debug, Default)]
pub struct UserRepo {
    inner: Arc<RwLock<UserTable>>,
}

#[derive(Debug, Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<i64, UserRow>,
}

impl UserTable {
    fn email_taken(&self, email: &str) -> bool {
        self.rows
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, new: NewUser) -> Result<UserRow, RepoError> {
        let mut table = self.inner.write().await;
        if table.email_taken(&new.email) {
            return Err(RepoError::Conflict("email already registered"));
        }

        table.last_id += 1;
        let row = UserRow {
            id: table.last_id,
            email: new.email,
            password_hash: new.password_hash,
            nombre: new.nombre,
            role: new.role,
            banned: false,
            ban_reason: None,
            created_at: Utc::now(),
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserRow> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn get(&self, id: i64) -> Option<UserRow> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    /// Oldest first.
    pub async fn list(&self) -> Vec<UserRow> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    /// Apply `change` to one row under the write lock; the row is left untouched when it errs.
    pub async fn update<F>(&self, id: i64, change: F) -> Result<UserRow, RepoError>
    where
        F: FnOnce(&mut UserRow) -> Result<(), RepoError>,
    {
        let mut table = self.inner.write().await;
        let current = table.rows.get(&id).ok_or(RepoError::NotFound)?;

        let mut next = current.clone();
        change(&mut next)?;
        table.rows.insert(id, next.clone());

        Ok(next)
    }
}
