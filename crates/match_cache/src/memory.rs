//! In-process match store.

use async_trait::async_trait;
use common::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::store::{CachedMatch, MatchStore};

#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    entries: DashMap<String, CachedMatch>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn get(&self, match_id: &str) -> Result<Option<CachedMatch>> {
        Ok(self.entries.get(match_id).map(|e| e.value().clone()))
    }

    async fn get_many(&self, match_ids: &[String]) -> Result<Vec<CachedMatch>> {
        Ok(match_ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| e.value().clone()))
            .collect())
    }

    async fn insert_if_absent(&self, entry: CachedMatch) -> Result<bool> {
        match self.entries.entry(entry.match_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(true)
            }
        }
    }
}
