// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing history backed by SQLite.
//
// Records are append-only: a result is written once and never updated or
// deleted. Listing returns every record, newest first.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use tracing::{debug, info, instrument};

use textpress_core::error::{Result, TextpressError};
use textpress_core::types::{ProcessingResult, ResultId};

/// SQLite schema for the history table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS history (
        id TEXT PRIMARY KEY,
        original_text TEXT NOT NULL,
        processed_text TEXT NOT NULL,
        apply_grammar_correction INTEGER NOT NULL,
        apply_translation INTEGER NOT NULL,
        target_language TEXT,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS history_created_at ON history (created_at);
"#;

/// Append-only store of processing results.
///
/// Calls block; async callers should go through `spawn_blocking`.
pub trait HistoryStore: Send + Sync {
    /// Store one result. A result whose id is already present is rejected.
    fn append(&self, result: &ProcessingResult) -> Result<()>;

    /// Every stored result, newest `created_at` first.
    fn list_all(&self) -> Result<Vec<ProcessingResult>>;
}

/// History store on a single SQLite connection.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open (or create) the history database at `path`.
    ///
    /// `busy_timeout` bounds how long a write waits on a locked database.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| TextpressError::PersistenceFailure(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| TextpressError::PersistenceFailure(format!("WAL pragma: {e}")))?;

        let store = Self::init(conn, busy_timeout)?;
        info!("history database opened");
        Ok(store)
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TextpressError::PersistenceFailure(format!("open in-memory: {e}")))?;

        let store = Self::init(conn, Duration::from_secs(1))?;
        debug!("in-memory history database opened");
        Ok(store)
    }

    fn init(conn: Connection, busy_timeout: Duration) -> Result<Self> {
        conn.busy_timeout(busy_timeout)
            .map_err(|e| TextpressError::PersistenceFailure(format!("busy timeout: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| TextpressError::PersistenceFailure(format!("create table: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TextpressError::PersistenceFailure("connection lock poisoned".into()))
    }
}

/// Fixed-width UTC timestamp so that text order equals time order.
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl HistoryStore for SqliteHistoryStore {
    #[instrument(skip(self, result), fields(result_id = %result.id))]
    fn append(&self, result: &ProcessingResult) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO history (id, original_text, processed_text,
                 apply_grammar_correction, apply_translation, target_language, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    result.id.to_string(),
                    result.original_text,
                    result.processed_text,
                    result.apply_grammar_correction,
                    result.apply_translation,
                    result.target_language,
                    format_timestamp(&result.created_at),
                ],
            )
            .map_err(|e| TextpressError::PersistenceFailure(format!("insert result: {e}")))?;

        info!(result_id = %result.id, "result appended to history");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_all(&self) -> Result<Vec<ProcessingResult>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, original_text, processed_text, apply_grammar_correction,
                        apply_translation, target_language, created_at
                 FROM history ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| TextpressError::PersistenceFailure(format!("prepare list_all: {e}")))?;

        let results = stmt
            .query_map([], row_to_result)
            .map_err(|e| TextpressError::PersistenceFailure(format!("query list_all: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TextpressError::PersistenceFailure(format!("collect rows: {e}")))?;

        debug!(count = results.len(), "retrieved history");
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Map a SQLite row to a `ProcessingResult`.
///
/// Column indices must match the SELECT order in `list_all`.
fn row_to_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProcessingResult> {
    let id_str: String = row.get(0)?;
    let created_at_str: String = row.get(6)?;

    let uuid = uuid::Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ProcessingResult {
        id: ResultId(uuid),
        original_text: row.get(1)?,
        processed_text: row.get(2)?,
        apply_grammar_correction: row.get(3)?,
        apply_translation: row.get(4)?,
        target_language: row.get(5)?,
        created_at,
    })
}
