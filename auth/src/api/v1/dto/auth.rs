use geekplay_trust::token::Role;
use serde::{Deserialize, Serialize};

use crate::services::accounts::{AuthSession, Registration};
use crate::services::password::MAX_PASSWORD_BYTES;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "adminKey")]
    pub admin_key: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.nombre.trim().is_empty() {
            return Err("nombre is required");
        }
        validate_email(&self.email)?;
        validate_password(&self.password)
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            nombre: self.nombre,
            email: self.email,
            password: self.password,
            admin_key: self.admin_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("email and password are required");
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("email is invalid"),
    }
}

fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("password is required");
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err("password must be <= 72 bytes");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub nombre: String,
    pub role: Role,
    /// Seconds until the token expires.
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.token,
            user_id: session.user.id,
            email: session.user.email,
            nombre: session.user.nombre,
            role: session.user.role,
            expires_in: session.token.expires_in,
        }
    }
}
