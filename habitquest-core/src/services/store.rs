// src/services/store.rs
//! Minimal single-writer key/value state store.
//!
//! - Owns a single SQLite connection (WAL) to avoid multi-writer contention.
//! - Values are whole JSON documents; every mutation rewrites the full
//!   record, never a partial diff.
//! - Missing or unparseable records decode to defaults — persistence
//!   problems degrade the session, they never fail it.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::model::{AppState, Category, Habit, UserStats, View};

/// Record keys, kept identical to the web client's localStorage keys so an
/// exported browser session can be imported verbatim.
pub const HABITS_KEY: &str = "habit_quest_habits";
pub const USER_KEY: &str = "habit_quest_user";
pub const CATEGORIES_KEY: &str = "habit_quest_categories";
pub const VIEW_KEY: &str = "habit_quest_view";

/// StateStore is the single authority for writing session state.
pub struct StateStore {
    pub(crate) db: Connection,
}

impl StateStore {
    /// Open/create the SQLite DB and ensure schema.
    pub fn open(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Connection::open(db_path)?;

        // WAL reduces writer/reader blocking; safe for our single-writer design.
        db.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS records (
              key         TEXT PRIMARY KEY,  -- record name (habit_quest_*)
              value       TEXT NOT NULL,     -- whole JSON document
              updated_at  TEXT NOT NULL      -- RFC3339 UTC
            );
            "#,
        )?;

        Ok(Self { db })
    }

    /// Fetch the raw JSON document for `key`, `None` if absent.
    pub fn load(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.db.prepare("SELECT value FROM records WHERE key=?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            return Ok(Some(value));
        }
        Ok(None)
    }

    /// Upsert the whole document for `key` and bump `updated_at`.
    pub fn save(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.db.execute(
            r#"
            INSERT INTO records(key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
              value      = excluded.value,
              updated_at = excluded.updated_at
            "#,
            (key, value, &now),
        )?;
        Ok(())
    }

    /// Decode one record, substituting `fallback` for a missing row or a
    /// document the current schema cannot read (data-shape drift beyond
    /// what per-field defaults repair).
    fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T> {
        match self.load(key)? {
            Some(text) => match serde_json::from_str::<T>(&text) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::warn!("unreadable record {key}: {err}; using defaults");
                    Ok(fallback)
                }
            },
            None => Ok(fallback),
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.save(key, &serde_json::to_string(value)?)
    }

    /// Assemble the session from the four persisted records.
    pub fn load_state(&self) -> Result<AppState> {
        Ok(AppState {
            habits: self.load_or::<Vec<Habit>>(HABITS_KEY, Vec::new())?,
            user: self.load_or::<UserStats>(USER_KEY, UserStats::default())?,
            categories: self
                .load_or::<Vec<Category>>(CATEGORIES_KEY, super::categories::defaults())?,
            view: self.load_or::<View>(VIEW_KEY, View::default())?,
        })
    }

    /// Rewrite all four records from one consistent in-memory snapshot.
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        self.save_json(HABITS_KEY, &state.habits)?;
        self.save_json(USER_KEY, &state.user)?;
        self.save_json(CATEGORIES_KEY, &state.categories)?;
        self.save_json(VIEW_KEY, &state.view)?;
        Ok(())
    }
}
