//! Write-through cache for finished matches.
//!
//! Match records never change once a game is over, so the first stored copy
//! is kept forever and later writes for the same id are ignored. The cache is
//! strictly best-effort: every storage failure degrades to a miss on read and
//! a dropped write, never to an error for the caller.

pub mod memory;
pub mod sqlite;
pub mod store;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::MatchDto;
use futures_util::future::join_all;
use tracing::{debug, warn};

pub use memory::InMemoryMatchStore;
pub use sqlite::SqliteMatchStore;
pub use store::{CachedMatch, MatchStore};

/// Best-effort facade over a [`MatchStore`].
#[derive(Clone)]
pub struct MatchCache {
    store: Option<Arc<dyn MatchStore>>,
}

impl std::fmt::Debug for MatchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl MatchCache {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A cache that stores nothing and always misses.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Process-local cache, mostly for development and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryMatchStore::new()))
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Point lookup. Storage errors read as a miss.
    pub async fn get(&self, match_id: &str) -> Option<CachedMatch> {
        let store = self.store.as_ref()?;
        match store.get(match_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Match cache read failed for {}: {}", match_id, e);
                None
            }
        }
    }

    /// Multi lookup keyed by match id. Missing ids are absent from the map;
    /// a storage error yields an empty map.
    pub async fn get_many(&self, match_ids: &[String]) -> HashMap<String, CachedMatch> {
        let Some(store) = self.store.as_ref() else {
            return HashMap::new();
        };
        if match_ids.is_empty() {
            return HashMap::new();
        }

        let mut seen = HashSet::new();
        let unique: Vec<String> = match_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        match store.get_many(&unique).await {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| (entry.match_id.clone(), entry))
                .collect(),
            Err(e) => {
                warn!("Match cache multi-read failed ({} ids): {}", unique.len(), e);
                HashMap::new()
            }
        }
    }

    /// Insert if absent. Failures are logged and dropped.
    pub async fn put(&self, m: &MatchDto, region: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let payload = match serde_json::to_string(m) {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping cache write for {}: {}", m.match_id(), e);
                return;
            }
        };

        let entry = CachedMatch {
            match_id: m.match_id().to_string(),
            region: region.to_string(),
            payload,
        };

        match store.insert_if_absent(entry).await {
            Ok(true) => debug!("Cached match {}", m.match_id()),
            Ok(false) => debug!("Match {} already cached", m.match_id()),
            Err(e) => warn!("Match cache write failed for {}: {}", m.match_id(), e),
        }
    }

    /// Apply [`MatchCache::put`] to every match independently.
    pub async fn put_many(&self, matches: &[MatchDto], region: &str) {
        if !self.is_enabled() || matches.is_empty() {
            return;
        }
        join_all(matches.iter().map(|m| self.put(m, region))).await;
    }

    /// Decoded variant of [`MatchCache::get`]. Corrupt payloads read as a miss.
    pub async fn cached_match(&self, match_id: &str) -> Option<MatchDto> {
        let entry = self.get(match_id).await?;
        decode(&entry)
    }

    /// Decoded variant of [`MatchCache::get_many`]. Corrupt payloads are skipped.
    pub async fn cached_matches(&self, match_ids: &[String]) -> HashMap<String, MatchDto> {
        self.get_many(match_ids)
            .await
            .into_iter()
            .filter_map(|(id, entry)| decode(&entry).map(|m| (id, m)))
            .collect()
    }
}

fn decode(entry: &CachedMatch) -> Option<MatchDto> {
    match serde_json::from_str(&entry.payload) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Ignoring corrupt cache entry {}: {}", entry.match_id, e);
            None
        }
    }
}
