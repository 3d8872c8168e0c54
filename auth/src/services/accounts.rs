//! Registration and login.
use std::sync::Arc;

use geekplay_trust::error::AppError;
use geekplay_trust::token::{IssuedToken, PrincipalSeed, Role, TokenIssuer};

use crate::repos::user_repo::{NewUser, UserRepo, UserRow};
use crate::services::password::{hash_password, verify_password};
use crate::services::provisioning::{NewProfile, ProfileProvisioner};

/// Who may register as `ADMIN`.
#[derive(Clone, Debug)]
pub struct AdminPolicy {
    /// `None` disables admin registration entirely.
    pub secret: Option<String>,
    pub email_domain: String,
}

impl AdminPolicy {
    /// `ADMIN` only for an email in the admin domain presenting the admin secret.
    pub fn role_for(&self, email: &str, admin_key: Option<&str>) -> Role {
        let Some(secret) = self.secret.as_deref() else {
            return Role::User;
        };

        let in_domain = email
            .to_ascii_lowercase()
            .ends_with(&self.email_domain.to_ascii_lowercase());

        if in_domain && admin_key == Some(secret) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub admin_key: Option<String>,
}

/// Service-level return type to keep handlers thin.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: UserRow,
}

#[derive(Clone)]
pub struct AccountService {
    users: UserRepo,
    issuer: TokenIssuer,
    provisioner: Arc<dyn ProfileProvisioner>,
    admin_policy: AdminPolicy,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        users: UserRepo,
        issuer: TokenIssuer,
        provisioner: Arc<dyn ProfileProvisioner>,
        admin_policy: AdminPolicy,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            issuer,
            provisioner,
            admin_policy,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, reg: Registration) -> Result<AuthSession, AppError> {
        let role = self
            .admin_policy
            .role_for(&reg.email, reg.admin_key.as_deref());

        let user = self
            .create_user(reg.email, &reg.password, reg.nombre, role)
            .await?;
        tracing::info!(user_id = user.id, role = %user.role, "account registered");

        self.provision_profile(&user).await;
        self.session_for(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await
            .ok_or(AppError::Unauthorized)?;

        let matches = verify_password(password, &user.password_hash)
            .await
            .map_err(|e| {
                tracing::error!(user_id = user.id, error = %e, "stored password hash unusable");
                AppError::Internal
            })?;
        if !matches {
            return Err(AppError::Unauthorized);
        }

        if user.banned {
            tracing::info!(user_id = user.id, "login refused, account suspended");
            return Err(AppError::AccountSuspended {
                reason: user.ban_reason,
            });
        }

        self.session_for(user)
    }

    /// Create the bootstrap administrator unless an account with that email exists.
    pub async fn ensure_admin(
        &self,
        email: String,
        password: &str,
        nombre: String,
    ) -> Result<(), AppError> {
        if self.users.find_by_email(&email).await.is_some() {
            tracing::debug!("seed admin already present");
            return Ok(());
        }

        let user = self.create_user(email, password, nombre, Role::Admin).await?;
        tracing::info!(user_id = user.id, "seed admin created");
        self.provision_profile(&user).await;
        Ok(())
    }

    async fn create_user(
        &self,
        email: String,
        password: &str,
        nombre: String,
        role: Role,
    ) -> Result<UserRow, AppError> {
        let password_hash = hash_password(password, self.bcrypt_cost)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AppError::Internal
            })?;

        let user = self
            .users
            .insert(NewUser {
                email: email.trim().to_string(),
                password_hash,
                nombre: nombre.trim().to_string(),
                role,
            })
            .await?;

        Ok(user)
    }

    /// Best-effort: a profile service outage never fails the registration.
    async fn provision_profile(&self, user: &UserRow) {
        let profile = NewProfile {
            user_id: user.id,
            nombre: user.nombre.clone(),
            email: user.email.clone(),
            role: user.role,
        };

        match self.provisioner.create_profile(&profile).await {
            Ok(()) => tracing::debug!(user_id = user.id, "profile provisioned"),
            Err(e) => tracing::warn!(user_id = user.id, error = %e, "profile provisioning failed"),
        }
    }

    fn session_for(&self, user: UserRow) -> Result<AuthSession, AppError> {
        let token = self
            .issuer
            .issue(&PrincipalSeed {
                user_id: user.id,
                email: user.email.clone(),
                role: user.role,
            })
            .map_err(|e| {
                tracing::error!(user_id = user.id, error = %e, "token issuance failed");
                AppError::Internal
            })?;

        Ok(AuthSession { token, user })
    }
}
