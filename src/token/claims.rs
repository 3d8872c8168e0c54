use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles carried in the `role` claim.
///
/// The wire form is upper-case (`USER`, `ADMIN`); every service in the fleet compares
/// against these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Case-insensitive parse, used by the CLI and request DTOs.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set of an access token.
///
/// - `sub` is the account email
/// - `userId` is the numeric id shared by every service
/// - `iat` / `exp` are epoch seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// A token is usable only while `now < exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
