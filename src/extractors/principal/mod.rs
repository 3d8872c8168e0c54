/*!
 * Principal extractor
 *
 * Responsibility:
 * - Hand the per-request identity (Principal) to handlers
 * - axum-specific code lives in core, the plain types in types
 *
 * Public API:
 * - Principal, AuthUserId, AuthRole
 * - Authenticated, MaybeAuthenticated
 */

mod core;
mod types;

pub use self::core::{Authenticated, MaybeAuthenticated};
pub use types::{AuthRole, AuthUserId, Principal};
