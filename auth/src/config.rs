use std::net::SocketAddr;

use geekplay_trust::config::{ConfigError, TrustConfig, listen_addr_from_env};

/// Bootstrap administrator, created at startup when configured.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub nombre: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("nombre", &self.nombre)
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub trust: TrustConfig,
    // None disables admin self-registration
    pub admin_secret: Option<String>,
    pub admin_email_domain: String,
    pub bcrypt_cost: u32,
    pub seed_admin: Option<SeedAdmin>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("trust", &self.trust)
            .field("admin_secret", &self.admin_secret.as_ref().map(|_| "<set>"))
            .field("admin_email_domain", &self.admin_email_domain)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("seed_admin", &self.seed_admin)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let trust = TrustConfig::from_env()?;
        let addr = listen_addr_from_env("AUTH_PORT", 3001)?;

        let admin_secret = non_empty_var("ADMIN_SECRET");
        let admin_email_domain =
            non_empty_var("ADMIN_EMAIL_DOMAIN").unwrap_or_else(|| "@geekplay.com".to_string());

        let bcrypt_cost = match std::env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or(ConfigError::Invalid("BCRYPT_COST"))?,
            Err(_) => 10,
        };

        let seed_admin = match (
            non_empty_var("SEED_ADMIN_EMAIL"),
            non_empty_var("SEED_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(SeedAdmin {
                email,
                password,
                nombre: non_empty_var("SEED_ADMIN_NAME")
                    .unwrap_or_else(|| "Administrador".to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("SEED_ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            addr,
            trust,
            admin_secret,
            admin_email_domain,
            bcrypt_cost,
            seed_admin,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
