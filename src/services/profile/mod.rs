/*
 * Responsibility
 * - Author display name / avatar owned by the profile service
 * - HTTP lookup, process-wide cache, and the enrichment rules forum content goes through
 */
mod cache;
mod client;
mod enrich;

pub use cache::ProfileCache;
pub use client::{HttpProfileClient, ProfileLookup, ProfileSummary};
pub use enrich::{
    AuthorStamp, enrich, enrich_all, looks_like_fallback_name, needs_enrichment, resolve_author,
};

#[cfg(test)]
pub(crate) use client::tests::{dead_url, spawn_server};
