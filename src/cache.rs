use crate::error::{CollectionError, GmonthError, Result};
use crate::model::CommitEvent;
use crate::source::{CommitLog, HistorySource};
use chrono::{DateTime, FixedOffset};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::Cell;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Bumped whenever the table layout changes; 2 stores timestamps with their offset.
pub const CACHE_SCHEMA_VERSION: u32 = 2;

/// Per-commit file listings, keyed by commit id and listing mode.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    pub fn new<CP: AsRef<Path>, RP: AsRef<Path>>(cache_path: Option<CP>, repo_path: RP) -> Result<Self> {
        let cache_dir = match cache_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => repo_path.as_ref().join(".gmonth"),
        };
        std::fs::create_dir_all(&cache_dir)?;
        let db_path = cache_dir.join("cache.db");
        debug!(db = %db_path.display(), "opening cache");
        Self::from_connection(Connection::open(&db_path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS commits (
                id TEXT NOT NULL,
                listing TEXT NOT NULL,
                PRIMARY KEY (id, listing)
            );
            CREATE TABLE IF NOT EXISTS files (
                commit_id TEXT NOT NULL,
                listing TEXT NOT NULL,
                path TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                PRIMARY KEY (commit_id, listing, path),
                FOREIGN KEY (commit_id, listing) REFERENCES commits(id, listing)
            );
            CREATE INDEX IF NOT EXISTS idx_files_commit ON files(commit_id, listing);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {CACHE_SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != CACHE_SCHEMA_VERSION as i64 {
            return Err(GmonthError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                CACHE_SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// `None` when the commit has never been stored for this listing mode.
    pub fn get_events(&self, commit_id: &str, listing: &str) -> Result<Option<Vec<CommitEvent>>> {
        let known = self
            .conn
            .query_row(
                "SELECT 1 FROM commits WHERE id = ? AND listing = ?",
                params![commit_id, listing],
                |_| Ok(()),
            )
            .optional()?;
        if known.is_none() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare_cached(
            "SELECT path, timestamp FROM files WHERE commit_id = ? AND listing = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![commit_id, listing], |row| {
            let path: String = row.get(0)?;
            let timestamp: DateTime<FixedOffset> = row.get(1)?;
            Ok(CommitEvent { path, timestamp })
        })?;

        let events = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(events))
    }

    pub fn store_events(&self, commit_id: &str, listing: &str, events: &[CommitEvent]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            tx.execute(
                "INSERT OR REPLACE INTO commits (id, listing) VALUES (?, ?)",
                params![commit_id, listing],
            )?;
            tx.execute(
                "DELETE FROM files WHERE commit_id = ? AND listing = ?",
                params![commit_id, listing],
            )?;

            let mut insert_file_stmt = tx.prepare(
                "INSERT INTO files (commit_id, listing, path, timestamp) VALUES (?, ?, ?, ?)",
            )?;
            let mut seen_paths: HashSet<&str> = HashSet::new();
            for event in events {
                if seen_paths.insert(event.path.as_str()) {
                    insert_file_stmt.execute(params![
                        commit_id,
                        listing,
                        event.path,
                        event.timestamp
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Serves `files_touched` from a [`Cache`] before falling back to `inner`.
///
/// Cache failures are logged and otherwise ignored.
pub struct CachedSource<S> {
    inner: S,
    cache: Cache,
    listing: &'static str,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<S: HistorySource> CachedSource<S> {
    pub fn new(inner: S, cache: Cache, listing: &'static str) -> Self {
        Self {
            inner,
            cache,
            listing,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }
}

impl<S: HistorySource> HistorySource for CachedSource<S> {
    type CommitId = S::CommitId;

    fn resolve_head(&self) -> std::result::Result<Self::CommitId, CollectionError> {
        self.inner.resolve_head()
    }

    fn log_from(&self, head: Self::CommitId) -> std::result::Result<CommitLog<'_, Self::CommitId>, CollectionError> {
        self.inner.log_from(head)
    }

    fn files_touched(&self, commit: &Self::CommitId) -> std::result::Result<Vec<CommitEvent>, CollectionError> {
        let key = commit.to_string();
        match self.cache.get_events(&key, self.listing) {
            Ok(Some(events)) => {
                self.hits.set(self.hits.get() + 1);
                return Ok(events);
            }
            Ok(None) => {}
            Err(e) => warn!(commit = %key, error = %e, "cache read failed"),
        }

        self.misses.set(self.misses.get() + 1);
        let events = self.inner.files_touched(commit)?;
        if let Err(e) = self.cache.store_events(&key, self.listing, &events) {
            warn!(commit = %key, error = %e, "cache write failed");
        }
        Ok(events)
    }
}
