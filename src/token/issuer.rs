use chrono::{DateTime, TimeZone, Utc};

use crate::token::claims::{Role, TokenClaims};
use crate::token::codec::{TokenCodec, TokenError};

/// Identity facts the auth service knows right after a successful login or registration.
#[derive(Debug, Clone)]
pub struct PrincipalSeed {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// A freshly signed token plus its lifetime, as login/registration responses need it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

/// Mints access tokens. Pure: no storage, no network.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    codec: TokenCodec,
    ttl_seconds: u64,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, ttl_seconds: u64) -> Self {
        Self { codec, ttl_seconds }
    }

    pub fn issue(&self, seed: &PrincipalSeed) -> Result<IssuedToken, TokenError> {
        self.issue_at(seed, Utc::now().timestamp())
    }

    /// Issue with an explicit `now` (epoch seconds).
    pub fn issue_at(&self, seed: &PrincipalSeed, now: i64) -> Result<IssuedToken, TokenError> {
        let exp = now.saturating_add(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX));

        let claims = TokenClaims {
            sub: seed.email.clone(),
            user_id: seed.user_id,
            role: seed.role,
            iat: now,
            exp,
        };

        let token = self.codec.encode(&claims)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds,
            expires_at,
        })
    }
}
