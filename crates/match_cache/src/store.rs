//! Storage abstraction behind the match cache.

use async_trait::async_trait;
use common::Result;

/// One stored match. The payload is opaque to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedMatch {
    pub match_id: String,
    /// Platform region the match was fetched under. Not part of the key.
    pub region: String,
    /// Serialized match record.
    pub payload: String,
}

/// Key-value persistence keyed by match id.
///
/// Implementations report their own failures; [`crate::MatchCache`] decides
/// what the caller sees.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get(&self, match_id: &str) -> Result<Option<CachedMatch>>;

    /// Entries for the ids that exist, in no particular order.
    async fn get_many(&self, match_ids: &[String]) -> Result<Vec<CachedMatch>>;

    /// Store `entry` unless its id is already present.
    ///
    /// Returns `true` when a row was written, `false` when the id existed.
    async fn insert_if_absent(&self, entry: CachedMatch) -> Result<bool>;
}
