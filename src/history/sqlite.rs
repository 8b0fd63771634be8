use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::TranscriptStore;
use crate::assistant::{ChatMessage, StoreError};
use crate::paths;

/// Transcript slots stored in a local `SQLite` database, one JSON array per slot,
/// plus a small `preferences` table.
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens the default database under the cache directory.
    pub fn new() -> Result<Self, StoreError> {
        let cache_dir = paths::cache_dir();
        std::fs::create_dir_all(&cache_dir)?;
        Self::open(cache_dir.join("history.db"))
    }

    /// Opens (and initializes) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.into(),
        };
        store.init_db()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS transcripts (
                slot_key TEXT PRIMARY KEY NOT NULL,
                messages TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                pref_key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.db_path)?)
    }
}

impl TranscriptStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let conn = self.connect()?;

        let stored: Option<String> = conn
            .query_row(
                "SELECT messages FROM transcripts WHERE slot_key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let json = serde_json::to_string(messages)?;
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO transcripts (slot_key, messages, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(slot_key) DO UPDATE SET
                messages = excluded.messages,
                updated_at = CURRENT_TIMESTAMP",
            [key, json.as_str()],
        )?;

        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM transcripts WHERE slot_key = ?1", [key])?;
        Ok(())
    }

    fn load_preference(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;

        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE pref_key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn save_preference(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO preferences (pref_key, value) VALUES (?1, ?2)
             ON CONFLICT(pref_key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;

        Ok(())
    }
}
