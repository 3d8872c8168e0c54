/*
 * Responsibility
 * - Settings every service in the fleet shares (signing secret, token ttl, collaborator URLs)
 * - Validation at startup (missing or invalid values fail the boot, never a request)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Configuration consumed by the trust core itself.
///
/// Every service builds one of these; the secret must be identical across the fleet
/// or tokens minted by the auth service will not verify anywhere else.
#[derive(Clone)]
pub struct TrustConfig {
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // base64-encoded HMAC key
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,

    pub profile_service_url: Url,
    pub notification_service_url: Url,
    pub upstream_timeout: Duration,
}

impl std::fmt::Debug for TrustConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the signing secret
        f.debug_struct("TrustConfig")
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("profile_service_url", &self.profile_service_url.as_str())
            .field("notification_service_url", &self.notification_service_url.as_str())
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl TrustConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
            .trim()
            .to_string();
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_ttl_seconds = std::env::var("JWT_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(86_400); // 24h

        let profile_service_url = base_url_from_env("PROFILE_SERVICE_URL", "http://localhost:3002")?;
        let notification_service_url =
            base_url_from_env("NOTIFICATION_SERVICE_URL", "http://localhost:3005")?;

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(3));

        Ok(Self {
            app_env,
            cors_allowed_origins,
            jwt_secret,
            token_ttl_seconds,
            profile_service_url,
            notification_service_url,
            upstream_timeout,
        })
    }
}

/// Parse a collaborator base URL, falling back to `default` when the variable is unset.
fn base_url_from_env(key: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_base_url(&raw).ok_or(ConfigError::Invalid(key))
}

/// Base URLs are joined with relative paths later, so they must end with a slash
/// or the last path segment would be replaced.
pub fn parse_base_url(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

/// Bind address for a service: `0.0.0.0:<port>` with the port read from `key`.
pub fn listen_addr_from_env(key: &'static str, default_port: u16) -> Result<SocketAddr, ConfigError> {
    let port: u16 = std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default_port);

    SocketAddr::from_str(&format!("0.0.0.0:{}", port)).map_err(|_| ConfigError::Invalid(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_accepts_short_production_alias() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:3002/internal").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3002/internal/");
        assert_eq!(
            url.join("api/profile/5").unwrap().as_str(),
            "http://localhost:3002/internal/api/profile/5"
        );
    }

    #[test]
    fn base_url_rejects_non_http_schemes() {
        assert!(parse_base_url("ftp://localhost").is_none());
        assert!(parse_base_url("not a url").is_none());
    }
}
