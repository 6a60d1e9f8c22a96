//! SQLite-backed match store.
//!
//! rusqlite is synchronous, so every call runs on the blocking pool behind a
//! connection mutex. `INSERT OR IGNORE` gives first-writer-wins semantics
//! without a read-then-write race.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{Error, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::info;

use crate::store::{CachedMatch, MatchStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS match_cache (
    match_id   TEXT PRIMARY KEY NOT NULL,
    region     TEXT NOT NULL,
    data       TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// SQLite bound-parameter limit is 999 on older builds.
const MAX_IDS_PER_QUERY: usize = 500;

fn cache_err(e: rusqlite::Error) -> Error {
    Error::Cache(e.to_string())
}

#[derive(Debug, Clone)]
pub struct SqliteMatchStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMatchStore {
    /// Open (or create) the database at `path`. `:memory:` opens a private
    /// in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(cache_err)?;

        conn.busy_timeout(Duration::from_secs(5)).map_err(cache_err)?;
        conn.execute_batch(SCHEMA).map_err(cache_err)?;

        info!("Match cache opened at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::Cache("connection mutex poisoned".into()))?;
            f(&*guard).map_err(cache_err)
        })
        .await
        .map_err(|e| Error::Cache(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl MatchStore for SqliteMatchStore {
    async fn get(&self, match_id: &str) -> Result<Option<CachedMatch>> {
        let match_id = match_id.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT match_id, region, data FROM match_cache WHERE match_id = ?1",
                params![match_id],
                |row| {
                    Ok(CachedMatch {
                        match_id: row.get(0)?,
                        region: row.get(1)?,
                        payload: row.get(2)?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn get_many(&self, match_ids: &[String]) -> Result<Vec<CachedMatch>> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }
        let match_ids = match_ids.to_vec();
        self.with_conn(move |conn| {
            let mut found = Vec::with_capacity(match_ids.len());
            for chunk in match_ids.chunks(MAX_IDS_PER_QUERY) {
                let placeholders = vec!["?"; chunk.len()].join(",");
                let sql = format!(
                    "SELECT match_id, region, data FROM match_cache WHERE match_id IN ({placeholders})"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                    Ok(CachedMatch {
                        match_id: row.get(0)?,
                        region: row.get(1)?,
                        payload: row.get(2)?,
                    })
                })?;
                for row in rows {
                    found.push(row?);
                }
            }
            Ok(found)
        })
        .await
    }

    async fn insert_if_absent(&self, entry: CachedMatch) -> Result<bool> {
        self.with_conn(move |conn| {
            let written = conn.execute(
                "INSERT OR IGNORE INTO match_cache (match_id, region, data, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.match_id,
                    entry.region,
                    entry.payload,
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(written == 1)
        })
        .await
    }
}
