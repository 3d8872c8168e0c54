//! Bearer token → Principal in request extensions.
//!
//! Runs ahead of every route, public ones included, so it never rejects:
//! - no `Authorization: Bearer ...` header → the request continues unauthenticated
//! - bad signature / malformed token → logged, continues unauthenticated
//! - expired token → continues unauthenticated
//! - valid token → `Principal`, `AuthUserId` and `AuthRole` are inserted
//!
//! Whether a route actually needs a principal is decided later by the
//! `Authenticated` extractor (401) and the policy module (401 / 403).

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::extractors::{AuthRole, AuthUserId, Principal};
use crate::token::{TokenCodec, TokenError};

/// Result of inspecting one request's `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Header absent or not of the form `Bearer <token>`.
    NoCredential,
    /// Header present but the token failed signature or structure checks.
    Invalid(TokenError),
    /// Signature fine, `exp` already passed.
    Expired,
    Authenticated(Principal),
}

/// Decide what a request's `Authorization` header amounts to at time `now` (epoch seconds).
pub fn authenticate_header(
    codec: &TokenCodec,
    header: Option<&HeaderValue>,
    now: i64,
) -> AuthOutcome {
    let Some(token) = header
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return AuthOutcome::NoCredential;
    };

    let token = token.trim();
    if token.is_empty() {
        return AuthOutcome::Invalid(TokenError::Malformed("empty bearer token".to_string()));
    }

    match codec.decode(token) {
        Err(err) => AuthOutcome::Invalid(err),
        Ok(claims) if claims.is_expired_at(now) => AuthOutcome::Expired,
        Ok(claims) => AuthOutcome::Authenticated(Principal::from_claims(claims)),
    }
}

/// Put the request authenticator in front of every route registered on `router` so far.
///
/// ```ignore
/// let router = api::v1::routes();
/// let router = middleware::auth::access::apply(router, codec.clone());
/// ```
pub fn apply<S>(router: Router<S>, codec: Arc<TokenCodec>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(codec, authenticate))
}

async fn authenticate(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // First authentication in the pipeline wins
    if req.extensions().get::<Principal>().is_some() {
        return next.run(req).await;
    }

    let now = chrono::Utc::now().timestamp();

    match authenticate_header(&codec, req.headers().get(header::AUTHORIZATION), now) {
        AuthOutcome::NoCredential => {}
        AuthOutcome::Invalid(err) => {
            tracing::warn!(error = %err, path = %req.uri().path(), "ignoring unusable bearer token");
        }
        AuthOutcome::Expired => {
            tracing::debug!(path = %req.uri().path(), "bearer token expired");
        }
        AuthOutcome::Authenticated(principal) => {
            tracing::debug!(user_id = principal.user_id, role = %principal.role, "request authenticated");

            let extensions = req.extensions_mut();
            extensions.insert(AuthUserId(principal.user_id));
            extensions.insert(AuthRole(principal.role));
            extensions.insert(principal);
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::Request,
        http::StatusCode,
        middleware::from_fn,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::extractors::Authenticated;
    use crate::token::{Role, TokenClaims};

    const SECRET: &[u8] = b"access-middleware-test-secret-0123456789";

    fn codec() -> TokenCodec {
        TokenCodec::from_secret(SECRET)
    }

    fn token(user_id: i64, role: Role, exp: i64) -> String {
        codec()
            .encode(&TokenClaims {
                sub: format!("u{user_id}@mail.com"),
                user_id,
                role,
                iat: exp - 60,
                exp,
            })
            .unwrap()
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn whoami(req: Request) -> String {
        let ext = req.extensions();
        match (
            ext.get::<Principal>(),
            ext.get::<AuthUserId>(),
            ext.get::<AuthRole>(),
        ) {
            (Some(p), Some(AuthUserId(id)), Some(AuthRole(role))) => {
                format!("{}:{}:{}:{}", p.user_id, p.role, id, role)
            }
            (None, None, None) => "anonymous".to_string(),
            _ => "inconsistent".to_string(),
        }
    }

    async fn protected(Authenticated(p): Authenticated) -> String {
        p.user_id.to_string()
    }

    fn app() -> Router {
        let router = Router::new()
            .route("/whoami", get(whoami))
            .route("/protected", get(protected));
        apply(router, Arc::new(codec()))
    }

    async fn call(router: Router, uri: &str, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let res = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn missing_header_is_no_credential() {
        assert_eq!(authenticate_header(&codec(), None, 0), AuthOutcome::NoCredential);
    }

    #[test]
    fn non_bearer_scheme_is_no_credential() {
        let basic = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert_eq!(
            authenticate_header(&codec(), Some(&basic), 0),
            AuthOutcome::NoCredential
        );
    }

    #[test]
    fn empty_bearer_is_invalid() {
        let empty = HeaderValue::from_static("Bearer   ");
        assert!(matches!(
            authenticate_header(&codec(), Some(&empty), 0),
            AuthOutcome::Invalid(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn forged_token_is_invalid_signature() {
        let forged = TokenCodec::from_secret(b"attacker-controlled-secret-value!!")
            .encode(&TokenClaims {
                sub: "evil@mail.com".to_string(),
                user_id: 1,
                role: Role::Admin,
                iat: 0,
                exp: i64::MAX / 2,
            })
            .unwrap();

        assert_eq!(
            authenticate_header(&codec(), Some(&bearer(&forged)), 10),
            AuthOutcome::Invalid(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn token_expired_one_second_ago_is_expired() {
        let now = 1_800_000_000;
        let t = token(5, Role::User, now - 1);
        assert_eq!(
            authenticate_header(&codec(), Some(&bearer(&t)), now),
            AuthOutcome::Expired
        );
    }

    #[test]
    fn valid_token_yields_principal() {
        let now = 1_800_000_000;
        let t = token(5, Role::Admin, now + 10);
        assert_eq!(
            authenticate_header(&codec(), Some(&bearer(&t)), now),
            AuthOutcome::Authenticated(Principal {
                user_id: 5,
                subject: "u5@mail.com".to_string(),
                role: Role::Admin,
            })
        );
    }

    #[tokio::test]
    async fn public_route_reachable_without_token() {
        let (status, body) = call(app(), "/whoami", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn garbage_token_does_not_break_public_route() {
        let (status, body) = call(app(), "/whoami", Some("Bearer garbage".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_publishes_principal_and_scalars() {
        let t = token(5, Role::User, far_future());
        let (status, body) = call(app(), "/whoami", Some(format!("Bearer {t}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "5:USER:5:USER");
    }

    #[tokio::test]
    async fn expired_token_on_protected_route_is_unauthorized() {
        let t = token(5, Role::User, chrono::Utc::now().timestamp() - 1);
        let (status, _) = call(app(), "/protected", Some(format!("Bearer {t}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_accepts_valid_token() {
        let t = token(8, Role::User, far_future());
        let (status, body) = call(app(), "/protected", Some(format!("Bearer {t}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "8");
    }

    #[tokio::test]
    async fn earlier_principal_is_not_overwritten() {
        async fn preset(mut req: Request, next: Next) -> Response {
            req.extensions_mut().insert(Principal {
                user_id: 1,
                subject: "first@mail.com".to_string(),
                role: Role::User,
            });
            next.run(req).await
        }

        let router = Router::new().route("/protected", get(protected));
        let router = apply(router, Arc::new(codec())).layer(from_fn(preset));

        let t = token(99, Role::Admin, far_future());
        let (status, body) = call(router, "/protected", Some(format!("Bearer {t}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1");
    }
}
