//! Process-wide profile cache with per-key single-flight fetches.
//!
//! Only successful lookups are stored; stored entries are never replaced or evicted.
//! A failed or timed-out lookup returns `None` and leaves no entry, so the next read
//! retries the profile service.
use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::sync::Mutex;

use super::client::{ProfileLookup, ProfileSummary};

#[derive(Clone)]
pub struct ProfileCache {
    inner: Arc<Inner>,
}

struct Inner {
    lookup: Arc<dyn ProfileLookup>,
    timeout: Duration,
    entries: DashMap<i64, ProfileSummary>,
    // One gate per user id with a fetch in flight.
    in_flight: DashMap<i64, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("entries", &self.inner.entries.len())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl ProfileCache {
    pub fn new(lookup: Arc<dyn ProfileLookup>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                lookup,
                timeout,
                entries: DashMap::new(),
                in_flight: DashMap::new(),
            }),
        }
    }

    /// Cached summary without touching the network.
    pub fn peek(&self, user_id: i64) -> Option<ProfileSummary> {
        self.inner.entries.get(&user_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Cached summary, or a fresh lookup on miss.
    ///
    /// Concurrent misses for the same id share one upstream call.
    pub async fn get_or_fetch(&self, user_id: i64) -> Option<ProfileSummary> {
        if let Some(hit) = self.peek(user_id) {
            return Some(hit);
        }

        let gate = self
            .inner
            .in_flight
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        let _guard = gate.lock().await;

        // Whoever held the gate before us may have filled the entry.
        if let Some(hit) = self.peek(user_id) {
            return Some(hit);
        }

        let fetched = match tokio::time::timeout(
            self.inner.timeout,
            self.inner.lookup.fetch_profile(user_id),
        )
        .await
        {
            Ok(Ok(summary)) => Some(summary),
            Ok(Err(e)) => {
                tracing::warn!(user_id, error = %e, "profile lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    user_id,
                    timeout_ms = self.inner.timeout.as_millis() as u64,
                    "profile lookup timed out"
                );
                None
            }
        };

        let out = fetched.map(|summary| {
            self.inner
                .entries
                .entry(user_id)
                .or_insert(summary)
                .value()
                .clone()
        });

        self.inner.in_flight.remove(&user_id);
        out
    }
}
