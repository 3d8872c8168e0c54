/*
 * Responsibility
 * - tokio runtime entry
 * - calls app::run() (no logic here)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod repos;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
