//! Account moderation: listing, ban, unban.
use geekplay_trust::error::AppError;
use geekplay_trust::services::notify::{ModerationNotice, NotificationDispatcher};

use crate::repos::{error::RepoError, user_repo::{UserRepo, UserRow}};

#[derive(Clone, Debug)]
pub struct AdminService {
    users: UserRepo,
    notices: NotificationDispatcher,
}

impl AdminService {
    pub fn new(users: UserRepo, notices: NotificationDispatcher) -> Self {
        Self { users, notices }
    }

    pub async fn list_users(&self) -> Vec<UserRow> {
        self.users.list().await
    }

    /// Record the ban, then tell the user. The ban stands whether or not the notice arrives.
    pub async fn ban(&self, admin_id: i64, user_id: i64, reason: &str) -> Result<UserRow, AppError> {
        let reason = reason.trim().to_string();

        let banned = self
            .users
            .update(user_id, |u| {
                if u.banned {
                    return Err(RepoError::Conflict("user is already banned"));
                }
                u.banned = true;
                u.ban_reason = Some(reason.clone());
                Ok(())
            })
            .await?;

        tracing::info!(admin_id, user_id, "account banned");
        self.notices
            .dispatch(ModerationNotice::account_suspended(user_id, &reason));

        Ok(banned)
    }

    pub async fn unban(&self, admin_id: i64, user_id: i64) -> Result<UserRow, AppError> {
        let user = self
            .users
            .update(user_id, |u| {
                if !u.banned {
                    return Err(RepoError::Conflict("user is not banned"));
                }
                u.banned = false;
                u.ban_reason = None;
                Ok(())
            })
            .await?;

        tracing::info!(admin_id, user_id, "account unbanned");
        Ok(user)
    }
}
