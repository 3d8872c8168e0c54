use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::Principal;

/// Extractor for handlers that require an authenticated caller.
/// Relies on the request authenticator having inserted a `Principal` into the extensions;
/// if it is missing (no token, bad token, expired token) the request is rejected with 401.
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor for public routes that behave differently for signed-in callers,
/// and for handlers that defer the decision to the policy module.
pub struct MaybeAuthenticated(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(parts.extensions.get::<Principal>().cloned()))
    }
}
