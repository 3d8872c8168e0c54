/*
 * Responsibility
 * - Config loading -> dependency wiring -> Router assembly
 * - Middleware (request authenticator, CORS, HTTP limits)
 * - axum::serve() with graceful shutdown, then drain pending notices
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use geekplay_trust::{
    config::{ConfigError, TrustConfig},
    middleware::{self, http::HttpLimits},
    services::notify::{HttpNotificationClient, NotificationDispatcher},
    shutdown, telemetry,
    token::{TokenCodec, TokenIssuer},
};

use crate::{
    api,
    config::Config,
    repos::user_repo::UserRepo,
    services::{
        accounts::{AccountService, AdminPolicy},
        admin::AdminService,
        provisioning::HttpProfileProvisioner,
    },
    state::AppState,
};

pub async fn run() -> Result<()> {
    telemetry::init_tracing();
    let config = Config::from_env()?;
    telemetry::init_panic_hook(config.trust.app_env);

    tracing::info!(
        "starting auth service in {:?} mode on {}",
        config.trust.app_env,
        config.addr
    );

    let codec = TokenCodec::from_base64_secret(&config.trust.jwt_secret)
        .map_err(|_| ConfigError::Invalid("JWT_SECRET"))?;

    let notices = NotificationDispatcher::new(
        Arc::new(HttpNotificationClient::new(
            config.trust.notification_service_url.clone(),
            config.trust.upstream_timeout,
        )?),
        config.trust.upstream_timeout,
    );

    let state = build_state(&config, codec.clone(), notices.clone())?;

    if let Some(seed) = &config.seed_admin {
        state
            .accounts
            .ensure_admin(seed.email.clone(), &seed.password, seed.nombre.clone())
            .await?;
    }

    let app = build_router(state, Arc::new(codec), &config.trust);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    tracing::info!(pending = notices.in_flight(), "draining notices");
    notices.drain().await;

    Ok(())
}

fn build_state(
    config: &Config,
    codec: TokenCodec,
    notices: NotificationDispatcher,
) -> Result<AppState> {
    let users = UserRepo::new();

    let provisioner = HttpProfileProvisioner::new(
        config.trust.profile_service_url.clone(),
        config.trust.upstream_timeout,
    )?;

    let accounts = AccountService::new(
        users.clone(),
        TokenIssuer::new(codec, config.trust.token_ttl_seconds),
        Arc::new(provisioner),
        AdminPolicy {
            secret: config.admin_secret.clone(),
            email_domain: config.admin_email_domain.clone(),
        },
        config.bcrypt_cost,
    );
    let admin = AdminService::new(users, notices);

    Ok(AppState::new(accounts, admin))
}

pub(crate) fn build_router(state: AppState, codec: Arc<TokenCodec>, trust: &TrustConfig) -> Router {
    let router = api::routes().with_state(state);

    let router = middleware::auth::access::apply(router, codec);
    let router = middleware::cors::apply(router, trust);
    middleware::http::apply(router, HttpLimits::default())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use geekplay_trust::config::{AppEnv, parse_base_url};
    use geekplay_trust::services::notify::{ModerationNotice, NotificationSink};
    use geekplay_trust::services::upstream::UpstreamError;
    use geekplay_trust::token::{PrincipalSeed, Role};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use super::*;
    use crate::services::accounts::tests::{RecordingProvisioner, SECRET, service_with};

    struct ChannelSink(mpsc::UnboundedSender<ModerationNotice>);

    #[async_trait::async_trait]
    impl NotificationSink for ChannelSink {
        async fn deliver(&self, notice: &ModerationNotice) -> Result<(), UpstreamError> {
            self.0
                .send(notice.clone())
                .map_err(|e| UpstreamError::Transport(e.to_string()))
        }
    }

    fn trust() -> TrustConfig {
        TrustConfig {
            app_env: AppEnv::Development,
            cors_allowed_origins: vec![],
            jwt_secret: String::new(),
            token_ttl_seconds: 3600,
            profile_service_url: parse_base_url("http://127.0.0.1:9").unwrap(),
            notification_service_url: parse_base_url("http://127.0.0.1:9").unwrap(),
            upstream_timeout: Duration::from_millis(200),
        }
    }

    struct Harness {
        router: Router,
        users: UserRepo,
        notices: mpsc::UnboundedReceiver<ModerationNotice>,
    }

    fn harness() -> Harness {
        let users = UserRepo::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let accounts = service_with(users.clone(), Arc::new(RecordingProvisioner::default()));
        let admin = AdminService::new(
            users.clone(),
            NotificationDispatcher::new(Arc::new(ChannelSink(tx)), Duration::from_secs(1)),
        );

        let router = build_router(
            AppState::new(accounts, admin),
            Arc::new(TokenCodec::from_secret(SECRET)),
            &trust(),
        );

        Harness {
            router,
            users,
            notices: rx,
        }
    }

    fn bearer(user_id: i64, role: Role) -> String {
        let issued = TokenIssuer::new(TokenCodec::from_secret(SECRET), 60)
            .issue(&PrincipalSeed {
                user_id,
                email: format!("u{user_id}@geekplay.com"),
                role,
            })
            .unwrap();
        format!("Bearer {}", issued.token)
    }

    fn post_json(uri: &str, body: Value, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_is_public() {
        let h = harness();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&h.router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn register_then_login() {
        let h = harness();

        let (status, body) = send(
            &h.router,
            post_json(
                "/api/auth/register",
                json!({"nombre": "Ana Gamer", "email": "ana@mail.com", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "USER");
        assert_eq!(body["nombre"], "Ana Gamer");
        let user_id = body["userId"].as_i64().unwrap();

        let (status, body) = send(
            &h.router,
            post_json(
                "/api/auth/login",
                json!({"email": "ana@mail.com", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let claims = TokenCodec::from_secret(SECRET)
            .decode(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.sub, "ana@mail.com");
    }

    #[tokio::test]
    async fn register_rejects_bad_email() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/auth/register",
                json!({"nombre": "Ana", "email": "nope", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn admin_routes_are_role_gated() {
        let h = harness();

        let anonymous = Request::builder()
            .uri("/api/admin/users")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&h.router, anonymous).await.0, StatusCode::UNAUTHORIZED);

        let as_user = Request::builder()
            .uri("/api/admin/users")
            .header(header::AUTHORIZATION, bearer(5, Role::User))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&h.router, as_user).await.0, StatusCode::FORBIDDEN);

        let as_admin = Request::builder()
            .uri("/api/admin/users")
            .header(header::AUTHORIZATION, bearer(1, Role::Admin))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.router, as_admin).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn malformed_ban_body_is_still_role_gated() {
        let h = harness();

        let garbled = |auth: Option<String>| {
            let mut builder = Request::builder()
                .method("POST")
                .uri("/api/admin/users/1/ban")
                .header(header::CONTENT_TYPE, "application/json");
            if let Some(auth) = auth {
                builder = builder.header(header::AUTHORIZATION, auth);
            }
            builder.body(Body::from("{razon:")).unwrap()
        };

        let (status, body) = send(&h.router, garbled(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, body) = send(&h.router, garbled(Some(bearer(5, Role::User)))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");

        let (status, body) = send(&h.router, garbled(Some(bearer(1, Role::Admin)))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn ban_blocks_login_and_notifies() {
        let mut h = harness();

        let (_, body) = send(
            &h.router,
            post_json(
                "/api/auth/register",
                json!({"nombre": "Ana", "email": "ana@mail.com", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        let user_id = body["userId"].as_i64().unwrap();

        // A plain user cannot ban anyone, and nothing is recorded.
        let (status, _) = send(
            &h.router,
            post_json(
                &format!("/api/admin/users/{user_id}/ban"),
                json!({"razon": "spam"}),
                Some(&bearer(7, Role::User)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!h.users.get(user_id).await.unwrap().banned);

        let admin = bearer(1, Role::Admin);
        let (status, body) = send(
            &h.router,
            post_json(
                &format!("/api/admin/users/{user_id}/ban"),
                json!({"razon": "spam"}),
                Some(&admin),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["baneado"], true);
        assert_eq!(body["motivoBaneo"], "spam");

        let notice = h.notices.recv().await.unwrap();
        assert_eq!(notice.target_user_id, user_id);

        let (status, body) = send(
            &h.router,
            post_json(
                "/api/auth/login",
                json!({"email": "ana@mail.com", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "ACCOUNT_SUSPENDED");

        let (status, _) = send(
            &h.router,
            post_json(
                &format!("/api/admin/users/{user_id}/unban"),
                json!({}),
                Some(&admin),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &h.router,
            post_json(
                "/api/auth/login",
                json!({"email": "ana@mail.com", "password": "s3cret!"}),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized_on_admin_routes() {
        let h = harness();
        let issued = TokenIssuer::new(TokenCodec::from_secret(SECRET), 60)
            .issue_at(
                &PrincipalSeed {
                    user_id: 1,
                    email: "root@geekplay.com".to_string(),
                    role: Role::Admin,
                },
                chrono::Utc::now().timestamp() - 61,
            )
            .unwrap();

        let req = Request::builder()
            .uri("/api/admin/users")
            .header(header::AUTHORIZATION, format!("Bearer {}", issued.token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&h.router, req).await.0, StatusCode::UNAUTHORIZED);
    }
}
