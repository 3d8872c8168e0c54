//! Author decoration for stored content.
use std::collections::HashMap;

use futures_util::future::join_all;

use crate::extractors::Principal;

use super::cache::ProfileCache;
use super::client::ProfileSummary;

/// Author fields stored with a post or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStamp {
    pub author_id: i64,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

impl AuthorStamp {
    pub fn needs_enrichment(&self) -> bool {
        needs_enrichment(self.author_name.as_deref(), self.author_avatar.as_deref())
    }
}

/// True when a stored display name looks like the creation-time fallback
/// (blank, or all-lowercase with no space, such as an email local part).
///
/// A legitimately lowercase single-word name is indistinguishable and also matches.
pub fn looks_like_fallback_name(name: Option<&str>) -> bool {
    match name {
        None => true,
        Some(n) if n.trim().is_empty() => true,
        // Untrimmed: a name with a leading or trailing space is not a fallback
        Some(n) => n == n.to_lowercase() && !n.contains(' '),
    }
}

pub fn needs_enrichment(name: Option<&str>, avatar: Option<&str>) -> bool {
    let avatar_missing = avatar.is_none_or(|a| a.trim().is_empty());
    avatar_missing || looks_like_fallback_name(name)
}

/// Refresh `stamp` from the profile service when it looks stale.
///
/// Returns true when anything changed. A failed lookup leaves the stamp untouched.
pub async fn enrich(cache: &ProfileCache, stamp: &mut AuthorStamp) -> bool {
    if !stamp.needs_enrichment() {
        return false;
    }

    match cache.get_or_fetch(stamp.author_id).await {
        Some(profile) => apply(stamp, &profile),
        None => {
            tracing::debug!(
                author_id = stamp.author_id,
                "enrichment skipped, keeping stored author"
            );
            false
        }
    }
}

/// Refresh every stale stamp in `stamps`.
///
/// Each distinct author is looked up once and all lookups run concurrently, so a
/// listing waits at most one upstream timeout however many rows share an author.
/// Returns how many stamps changed.
pub async fn enrich_all(cache: &ProfileCache, stamps: &mut [AuthorStamp]) -> usize {
    let mut author_ids: Vec<i64> = stamps
        .iter()
        .filter(|s| s.needs_enrichment())
        .map(|s| s.author_id)
        .collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    if author_ids.is_empty() {
        return 0;
    }

    let fetched = join_all(author_ids.iter().map(|id| cache.get_or_fetch(*id))).await;
    let profiles: HashMap<i64, ProfileSummary> = author_ids
        .into_iter()
        .zip(fetched)
        .filter_map(|(id, profile)| profile.map(|p| (id, p)))
        .collect();

    let mut changed = 0;
    for stamp in stamps.iter_mut().filter(|s| s.needs_enrichment()) {
        match profiles.get(&stamp.author_id) {
            Some(profile) => {
                if apply(stamp, profile) {
                    changed += 1;
                }
            }
            None => tracing::debug!(
                author_id = stamp.author_id,
                "enrichment skipped, keeping stored author"
            ),
        }
    }
    changed
}

fn apply(stamp: &mut AuthorStamp, profile: &ProfileSummary) -> bool {
    let mut changed = false;
    if stamp.author_name.as_deref() != Some(profile.display_name.as_str()) {
        stamp.author_name = Some(profile.display_name.clone());
        changed = true;
    }
    if let Some(avatar) = &profile.avatar_url {
        if stamp.author_avatar.as_deref() != Some(avatar.as_str()) {
            stamp.author_avatar = Some(avatar.clone());
            changed = true;
        }
    }
    changed
}

/// Author stamp for content the principal is creating right now.
///
/// Falls back to the email local part and no avatar when the profile is unavailable.
pub async fn resolve_author(cache: &ProfileCache, principal: &Principal) -> AuthorStamp {
    match cache.get_or_fetch(principal.user_id).await {
        Some(profile) => AuthorStamp {
            author_id: principal.user_id,
            author_name: Some(profile.display_name),
            author_avatar: profile.avatar_url,
        },
        None => AuthorStamp {
            author_id: principal.user_id,
            author_name: Some(principal.fallback_display_name()),
            author_avatar: None,
        },
    }
}
