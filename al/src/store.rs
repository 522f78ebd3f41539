//! SQLite persistence for attempt rows

use chrono::{Duration, NaiveDate};
use eyre::{Context, Result};
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Aggregates over a trailing day window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    /// Sum of seconds across the window
    pub total: i64,
    /// Number of attempts in the window
    pub count: i64,
    /// Longest single attempt in the window
    pub max: i64,
    /// Integer mean of seconds, 0 when the window is empty
    pub average: i64,
}

/// One persisted attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: i64,
    pub seconds: i64,
    pub date: NaiveDate,
}

/// SQLite-backed attempt ledger
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// Open (or create) the ledger database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create ledger directory: {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger database: {}", path.display()))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                handle TEXT NOT NULL,
                seconds INTEGER NOT NULL,
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_attempts_handle_date ON attempts(handle, date);",
        )
        .context("Failed to initialize ledger schema")?;
        debug!(path = %path.display(), "Ledger opened");
        Ok(Self { conn })
    }

    /// Insert one attempt and return its row id
    pub fn append(&self, handle: &str, seconds: i64, date: NaiveDate) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO attempts (handle, seconds, date) VALUES (?1, ?2, ?3)",
                params![handle, seconds, date.format(DATE_FORMAT).to_string()],
            )
            .context("Failed to insert attempt")?;
        let id = self.conn.last_insert_rowid();
        debug!(handle, seconds, id, "append: attempt stored");
        Ok(id)
    }

    /// Delete an attempt by id, returning whether a row was removed
    pub fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM attempts WHERE id = ?1", params![id])
            .context("Failed to delete attempt")?;
        debug!(id, removed, "delete: attempt removed");
        Ok(removed > 0)
    }

    /// Aggregate stats over the trailing window ending at `today`
    ///
    /// The window covers dates on or after `today - days`, so a 7-day
    /// window reaches one day further back than the last full week.
    pub fn window_stats(&self, handle: &str, days: u32, today: NaiveDate) -> Result<WindowStats> {
        let cutoff = window_cutoff(today, days);
        let (total, count, max) = self
            .conn
            .query_row(
                "SELECT COALESCE(SUM(seconds), 0), COUNT(id), COALESCE(MAX(seconds), 0)
                 FROM attempts WHERE handle = ?1 AND date >= ?2",
                params![handle, cutoff],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .context("Failed to query window stats")?;
        let average = if count > 0 { total / count } else { 0 };
        Ok(WindowStats { total, count, max, average })
    }

    /// Attempts in the trailing window, newest first
    pub fn recent(&self, handle: &str, days: u32, today: NaiveDate) -> Result<Vec<AttemptRow>> {
        let cutoff = window_cutoff(today, days);
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, seconds, date FROM attempts
                 WHERE handle = ?1 AND date >= ?2
                 ORDER BY date DESC, id DESC",
            )
            .context("Failed to prepare attempt listing")?;
        let rows = stmt
            .query_map(params![handle, cutoff], |row| {
                let date_text: String = row.get(2)?;
                let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(AttemptRow {
                    id: row.get(0)?,
                    seconds: row.get(1)?,
                    date,
                })
            })
            .context("Failed to query attempts")?;
        let mut attempts = Vec::new();
        for row in rows {
            attempts.push(row.context("Failed to read attempt row")?);
        }
        Ok(attempts)
    }
}

fn window_cutoff(today: NaiveDate, days: u32) -> String {
    (today - Duration::days(i64::from(days)))
        .format(DATE_FORMAT)
        .to_string()
}
