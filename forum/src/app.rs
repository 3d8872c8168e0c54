/*
 * Responsibility
 * - Config loading -> default categories -> profile cache / notice dispatcher wiring -> Router assembly
 * - axum::serve() with graceful shutdown, then drain pending notices
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use geekplay_trust::{
    config::{ConfigError, TrustConfig},
    middleware::{self, http::HttpLimits},
    services::{
        notify::{HttpNotificationClient, NotificationDispatcher},
        profile::{HttpProfileClient, ProfileCache},
    },
    shutdown, telemetry,
    token::TokenCodec,
};

use crate::{
    api,
    config::Config,
    repos::{category_repo, store::Store},
    services::{categories::CategoryService, comments::CommentService, posts::PostService},
    state::AppState,
};

pub async fn run() -> Result<()> {
    telemetry::init_tracing();
    let config = Config::from_env()?;
    telemetry::init_panic_hook(config.trust.app_env);

    tracing::info!(
        "starting forum service in {:?} mode on {}",
        config.trust.app_env,
        config.addr
    );

    let codec = TokenCodec::from_base64_secret(&config.trust.jwt_secret)
        .map_err(|_| ConfigError::Invalid("JWT_SECRET"))?;

    let profiles = ProfileCache::new(
        Arc::new(HttpProfileClient::new(
            config.trust.profile_service_url.clone(),
            config.trust.upstream_timeout,
        )?),
        config.trust.upstream_timeout,
    );
    let notices = NotificationDispatcher::new(
        Arc::new(HttpNotificationClient::new(
            config.trust.notification_service_url.clone(),
            config.trust.upstream_timeout,
        )?),
        config.trust.upstream_timeout,
    );

    let store = Store::new();
    let seeded = category_repo::seed_defaults(&store).await;
    tracing::info!(seeded, "default categories ready");

    let state = build_state(store, profiles, notices.clone());
    let app = build_router(state, Arc::new(codec), &config.trust);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    tracing::info!(pending = notices.in_flight(), "draining notices");
    notices.drain().await;

    Ok(())
}

fn build_state(store: Store, profiles: ProfileCache, notices: NotificationDispatcher) -> AppState {
    AppState::new(
        CategoryService::new(store.clone()),
        PostService::new(store.clone(), profiles.clone(), notices),
        CommentService::new(store, profiles),
    )
}

pub(crate) fn build_router(state: AppState, codec: Arc<TokenCodec>, trust: &TrustConfig) -> Router {
    let router = api::routes().with_state(state);

    let router = middleware::auth::access::apply(router, codec);
    let router = middleware::cors::apply(router, trust);
    middleware::http::apply(router, HttpLimits::default())
}
