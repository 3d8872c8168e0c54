//! Resource-level authorization.
//!
//! - No IO
//! - No panics
//! - Pure decision over the request principal and the resource owner

use thiserror::Error;

use crate::extractors::Principal;
use crate::token::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
}

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Holder of the override role, regardless of ownership.
    Privileged,
    /// The caller owns the resource.
    Owner,
}

/// Owner-or-privileged check.
///
/// Rules, in order:
/// 1. no principal -> `Unauthorized`
/// 2. principal holds `override_role` -> `Privileged`
/// 3. principal owns the resource -> `Owner`
/// 4. otherwise -> `Forbidden`
pub fn authorize(
    principal: Option<&Principal>,
    owner_id: i64,
    override_role: Role,
) -> Result<Access, AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthorized)?;

    if principal.role == override_role {
        return Ok(Access::Privileged);
    }
    if principal.user_id == owner_id {
        return Ok(Access::Owner);
    }

    Err(AuthzError::Forbidden)
}

/// Route-level variant: the whole route is gated on a role, there is no owner.
pub fn require_role(principal: Option<&Principal>, role: Role) -> Result<&Principal, AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthorized)?;
    if principal.role == role {
        Ok(principal)
    } else {
        Err(AuthzError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn principal(user_id: i64, role: Role) -> Principal {
        Principal {
            user_id,
            subject: format!("u{user_id}@mail.com"),
            role,
        }
    }

    proptest! {
        #[test]
        fn allows_iff_admin_or_owner(
            user_id in -50i64..50,
            owner_id in -50i64..50,
            admin in any::<bool>(),
        ) {
            let role = if admin { Role::Admin } else { Role::User };
            let p = principal(user_id, role);

            let decision = authorize(Some(&p), owner_id, Role::Admin);
            let expected = role == Role::Admin || user_id == owner_id;

            prop_assert_eq!(decision.is_ok(), expected);
            if !expected {
                prop_assert_eq!(decision, Err(AuthzError::Forbidden));
            }
        }

        #[test]
        fn missing_principal_is_always_unauthorized(owner_id in any::<i64>()) {
            prop_assert_eq!(authorize(None, owner_id, Role::Admin), Err(AuthzError::Unauthorized));
        }
    }

    #[test]
    fn user_cannot_touch_someone_elses_resource() {
        let p = principal(5, Role::User);
        assert_eq!(authorize(Some(&p), 9, Role::Admin), Err(AuthzError::Forbidden));
    }

    #[test]
    fn user_can_touch_own_resource() {
        let p = principal(5, Role::User);
        assert_eq!(authorize(Some(&p), 5, Role::Admin), Ok(Access::Owner));
    }

    #[test]
    fn admin_override_wins_before_ownership() {
        let p = principal(5, Role::Admin);
        assert_eq!(authorize(Some(&p), 9, Role::Admin), Ok(Access::Privileged));
        assert_eq!(authorize(Some(&p), 5, Role::Admin), Ok(Access::Privileged));
    }

    #[test]
    fn role_gate_ignores_ownership() {
        let user = principal(5, Role::User);
        let admin = principal(6, Role::Admin);

        assert_eq!(require_role(None, Role::Admin), Err(AuthzError::Unauthorized));
        assert_eq!(require_role(Some(&user), Role::Admin), Err(AuthzError::Forbidden));
        assert_eq!(require_role(Some(&admin), Role::Admin), Ok(&admin));
    }
}
