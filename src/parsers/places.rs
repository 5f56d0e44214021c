//! # History Extractor
//!
//! Joins `moz_historyvisits` to `moz_places`, keeps visits at or after the
//! cutoff, and returns them newest first with transitions classified and
//! URLs normalized.

use thiserror::Error;
use tracing::debug;

use crate::parsers::visit::{AnnotatedVisit, VisitRecord};
use crate::store::{PlacesStore, StoreError};
use crate::transition::{self, UnknownTransition};
use crate::url;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("visit {id}: {source}")]
    Transition {
        id: i64,
        #[source]
        source: UnknownTransition,
    },
}

fn build_query(store: &PlacesStore) -> Result<String, StoreError> {
    let pages = store.pages();
    let visits = store.visits();
    Ok(format!(
        "SELECT {}, {}, {}, {}, {} FROM {} JOIN {} ON {} = {} WHERE {} >= ?1 ORDER BY {} DESC",
        visits.column("id")?,
        visits.column("from_visit")?,
        pages.column("url")?,
        visits.column("visit_date")?,
        visits.column("visit_type")?,
        visits.name,
        pages.name,
        visits.column("place_id")?,
        pages.column("id")?,
        visits.column("visit_date")?,
        visits.column("visit_date")?,
    ))
}

/// Reads the raw visit rows, newest first.
pub fn read_visits(
    store: &PlacesStore,
    cutoff_micros: i64,
) -> Result<Vec<VisitRecord>, ExtractError> {
    let sql = build_query(store)?;
    debug!("history query: {sql}");

    let mut stmt = store.connection().prepare(&sql)?;
    let rows = stmt.query_map([cutoff_micros], |row| {
        let id: i64 = row.get(0)?;
        let from_id: Option<i64> = row.get(1)?;
        let url: String = row.get(2)?;
        let timestamp: i64 = row.get(3)?;
        let transition_code: i64 = row.get(4)?;
        Ok(VisitRecord {
            id,
            from_id: from_id.unwrap_or(0),
            timestamp,
            transition_code,
            url,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn annotate(record: VisitRecord) -> Result<AnnotatedVisit, ExtractError> {
    let transition = transition::classify(record.transition_code).map_err(|source| {
        ExtractError::Transition {
            id: record.id,
            source,
        }
    })?;
    let url = url::normalize(&record.url);
    let video_id = url::is_video_watch(&url).map(str::to_string);
    Ok(AnnotatedVisit {
        record,
        transition,
        url,
        video_id,
    })
}

pub fn extract_visits(
    store: &PlacesStore,
    cutoff_micros: i64,
) -> Result<Vec<AnnotatedVisit>, ExtractError> {
    read_visits(store, cutoff_micros)?
        .into_iter()
        .map(annotate)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::StoreConfig;
    use crate::transition::Transition;
    use rusqlite::Connection;
    use tempfile::tempdir;

    const T: i64 = 1_600_000_000_000_000;

    fn create_store(path: &Path, visits: &[(i64, Option<i64>, i64, i64, i64)]) {
        let conn = Connection::open(path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT, title TEXT);
             CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, from_visit INTEGER, place_id INTEGER, visit_date INTEGER, visit_type INTEGER);",
        )
        .expect("schema");
        conn.execute(
            "INSERT INTO moz_places (id, url) VALUES (1, ?1), (2, ?2)",
            (
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "https://www.google.com/search?q=cats&ved=xyz",
            ),
        )
        .expect("places");
        for (id, from_visit, place_id, visit_date, visit_type) in visits {
            conn.execute(
                "INSERT INTO moz_historyvisits (id, from_visit, place_id, visit_date, visit_type) VALUES (?1, ?2, ?3, ?4, ?5)",
                (id, from_visit, place_id, visit_date, visit_type),
            )
            .expect("visit");
        }
    }

    fn open(path: &Path) -> PlacesStore {
        let cfg = StoreConfig {
            journal_mode: "wal".to_string(),
            cache_size_kib: 10_000,
        };
        PlacesStore::open(path, &cfg).expect("open")
    }

    #[test]
    fn orders_newest_first_and_applies_cutoff() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        create_store(
            &path,
            &[
                (9, Some(0), 2, T - 60_000_000, 2),
                (10, Some(9), 1, T, 1),
                (3, Some(0), 2, T - 3_600_000_000, 1),
            ],
        );

        let store = open(&path);
        let visits = extract_visits(&store, T - 60_000_000).expect("extract");
        let ids: Vec<i64> = visits.iter().map(|v| v.record.id).collect();
        assert_eq!(ids, vec![10, 9]);

        assert_eq!(visits[0].transition, Transition::Link);
        assert_eq!(visits[0].video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(visits[1].transition, Transition::Typed);
        assert_eq!(visits[1].url, "https://www.google.com/search?q=cats");
        assert_eq!(visits[1].video_id, None);
    }

    #[test]
    fn null_from_visit_reads_as_zero() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        create_store(&path, &[(5, None, 2, T, 2)]);

        let store = open(&path);
        let visits = extract_visits(&store, 0).expect("extract");
        assert_eq!(visits[0].record.from_id, 0);
        assert!(visits[0].record.ends_session());
    }

    #[test]
    fn unknown_transition_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        create_store(&path, &[(1, Some(0), 1, T, 1), (2, Some(1), 2, T + 1, 42)]);

        let store = open(&path);
        let err = extract_visits(&store, 0).expect_err("unknown code");
        assert!(matches!(
            err,
            ExtractError::Transition {
                id: 2,
                source: UnknownTransition(42)
            }
        ));
        assert_eq!(read_visits(&store, 0).expect("raw").len(), 2);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        let conn = Connection::open(&path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, place_id INTEGER, visit_date INTEGER, visit_type INTEGER);",
        )
        .expect("schema");
        drop(conn);

        let store = open(&path);
        let err = extract_visits(&store, 0).expect_err("schema");
        assert!(matches!(err, ExtractError::Store(StoreError::Schema(_))));
    }
}
