//! SQLite-backed key-value store.
//!
//! The only durable state is the start timestamp of the active run,
//! kept in a single `kv` table so a relaunch mid-run can resume where
//! it left off.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{DatabaseError, Result};
use crate::services::StartTimeStore;

use super::data_dir;

const START_TIME_KEY: &str = "start_time";

/// SQLite database holding the persisted start timestamp.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pacebell/pacebell.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pacebell.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a value from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl StartTimeStore for Database {
    fn start_time(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.kv_get(START_TIME_KEY)? else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Ok(Some(ts.with_timezone(&Utc))),
            Err(e) => {
                // Corrupt value: treat as no active run rather than
                // refusing to launch.
                tracing::warn!("discarding unparseable persisted start time {raw:?}: {e}");
                Ok(None)
            }
        }
    }

    fn set_start_time(&self, started_at: DateTime<Utc>) -> Result<()> {
        self.kv_set(START_TIME_KEY, &started_at.to_rfc3339())?;
        Ok(())
    }

    fn clear_start_time(&self) -> Result<()> {
        self.kv_delete(START_TIME_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn start_time_round_trip() {
        let db = Database::open_memory().unwrap();
        assert!(db.start_time().unwrap().is_none());

        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        db.set_start_time(ts).unwrap();
        assert_eq!(db.start_time().unwrap(), Some(ts));

        db.clear_start_time().unwrap();
        assert!(db.start_time().unwrap().is_none());
    }

    #[test]
    fn corrupt_start_time_reads_as_absent() {
        let db = Database::open_memory().unwrap();
        db.kv_set(START_TIME_KEY, "not a timestamp").unwrap();
        assert!(db.start_time().unwrap().is_none());
    }
}
