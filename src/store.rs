//! # Storage Accessor
//!
//! Read-only access to a Firefox `places.sqlite` store. The connection is
//! tuned for a single bulk read and exposes the page and visit tables as
//! [`TableRef`]s whose columns are discovered from the schema.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::StoreConfig;

pub const PAGES_TABLE: &str = "moz_places";
pub const VISITS_TABLE: &str = "moz_historyvisits";

/// Values SQLite accepts for `PRAGMA journal_mode`.
pub const JOURNAL_MODES: [&str; 6] = ["delete", "truncate", "persist", "memory", "wal", "off"];

pub fn is_known_journal_mode(mode: &str) -> bool {
    JOURNAL_MODES.iter().any(|m| m.eq_ignore_ascii_case(mode))
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {path}: {reason}")]
    Unavailable { path: String, reason: String },
    #[error("unknown journal mode: {0:?}")]
    JournalMode(String),
    #[error("store schema mismatch: {0}")]
    Schema(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A table in the store together with the columns it actually has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableRef {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fully qualified column reference, or a schema error naming what is missing.
    pub fn column(&self, column: &str) -> Result<String, StoreError> {
        if self.has_column(column) {
            Ok(format!("{}.{}", self.name, column))
        } else {
            Err(StoreError::Schema(format!(
                "table {} has no column {}",
                self.name, column
            )))
        }
    }
}

/// Open handle on the history store. Dropping it releases the file.
pub struct PlacesStore {
    conn: Connection,
    pages: TableRef,
    visits: TableRef,
}

impl std::fmt::Debug for PlacesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesStore")
            .field("pages", &self.pages)
            .field("visits", &self.visits)
            .finish()
    }
}

impl PlacesStore {
    pub fn open(path: &Path, cfg: &StoreConfig) -> Result<Self, StoreError> {
        let unavailable = |reason: String| StoreError::Unavailable {
            path: path.display().to_string(),
            reason,
        };

        if !is_known_journal_mode(&cfg.journal_mode) {
            return Err(StoreError::JournalMode(cfg.journal_mode.clone()));
        }
        if !path.is_file() {
            return Err(unavailable("no such file".to_string()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| unavailable(e.to_string()))?;

        // A read-only handle cannot always switch journal modes; the read works either way.
        match conn.query_row(
            &format!("PRAGMA journal_mode = {}", cfg.journal_mode),
            [],
            |row| row.get::<_, String>(0),
        ) {
            Ok(mode) => debug!("journal_mode={mode}"),
            Err(err) => warn!("could not set journal_mode={}: {err}", cfg.journal_mode),
        }
        conn.pragma_update(None, "cache_size", -cfg.cache_size_kib)
            .map_err(|e| unavailable(e.to_string()))?;

        let pages = load_table(&conn, PAGES_TABLE).map_err(|e| match e {
            StoreError::Sqlite(err) => unavailable(err.to_string()),
            other => other,
        })?;
        let visits = load_table(&conn, VISITS_TABLE)?;

        debug!(
            "opened store {} ({} page columns, {} visit columns)",
            path.display(),
            pages.columns.len(),
            visits.columns.len()
        );

        Ok(Self {
            conn,
            pages,
            visits,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn pages(&self) -> &TableRef {
        &self.pages
    }

    pub fn visits(&self) -> &TableRef {
        &self.visits
    }
}

fn has_table(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let mut rows = stmt.query([name])?;
    Ok(rows.next()?.is_some())
}

fn load_table(conn: &Connection, name: &str) -> Result<TableRef, StoreError> {
    if !has_table(conn, name)? {
        return Err(StoreError::Schema(format!("missing table {name}")));
    }
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([name], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TableRef {
        name: name.to_string(),
        columns,
    })
}
