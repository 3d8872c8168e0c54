use std::{panic, process};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppEnv;

/// Install the global tracing subscriber.
///
/// Prefer RUST_LOG if set; otherwise use a sensible default.
/// Ex:
/// RUST_LOG=info,geekplay_forum=debug,geekplay_trust=debug cargo run -p geekplay-forum
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    // A second init (tests, embedded use) is not an error worth failing over.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Route panics through tracing; abort in development so they are noticed immediately.
pub fn init_panic_hook(app_env: AppEnv) {
    let abort_on_panic = !app_env.is_production();
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}
