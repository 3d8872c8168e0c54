/*
 * Responsibility
 * - The authenticated identity handlers see for the lifetime of one request
 * - The request authenticator builds it from a verified token and stores it in request extensions
 *
 * Notes
 * - Never persisted, never shared across requests
 * - Ownership / role decisions live in the policy module, not here
 */

use crate::token::{Role, TokenClaims};

/// Identity derived from a valid, unexpired token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub subject: String,
    pub role: Role,
}

impl Principal {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            subject: claims.sub,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Local part of the subject email; the display name of last resort.
    pub fn fallback_display_name(&self) -> String {
        self.subject
            .split('@')
            .next()
            .unwrap_or(&self.subject)
            .to_string()
    }
}

/// Raw `userId` scalar, published next to [`Principal`] for call sites that only need the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUserId(pub i64);

/// Raw `role` scalar, published next to [`Principal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRole(pub Role);
