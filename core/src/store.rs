//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Hooks and the engine call store methods, never SQL directly.

use crate::{
    error::FadeResult,
    evaluator::{TileUpdate, TileUpdater},
    event::EventLogEntry,
    scene::OcclusionMode,
    settings::{SettingKey, SettingsStore, TileFlag},
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct FadeStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file or URI
}

impl FadeStore {
    pub fn open(path: &str) -> FadeResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // Shared-memory URIs accept this and stay in memory journal mode.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn, path: Some(path.to_string()) })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> FadeResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Open another connection to the same database.
    /// A private in-memory database cannot be shared, so this returns a
    /// fresh one; use a `mode=memory&cache=shared` URI to share.
    pub fn reopen(&self) -> FadeResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> FadeResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Occlusion ──────────────────────────────────────────────

    /// The last occlusion mode written to a tile, if any.
    pub fn tile_mode(&self, tile_id: &str) -> FadeResult<Option<OcclusionMode>> {
        let code: Option<i64> = self
            .conn
            .query_row(
                "SELECT mode FROM tile_occlusion WHERE tile_id = ?1",
                params![tile_id],
                |row| row.get(0),
            )
            .optional()?;
        code.map(OcclusionMode::from_code).transpose()
    }

    pub fn tile_update_count(&self, tile_id: &str) -> FadeResult<i64> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT update_count FROM tile_occlusion WHERE tile_id = ?1",
                params![tile_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    pub fn total_tile_updates(&self) -> FadeResult<i64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(update_count), 0) FROM tile_occlusion",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> FadeResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (scene_id, sequence, hook, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.scene_id,
                entry.sequence as i64,
                entry.hook,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_scene(&self, scene_id: &str) -> FadeResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scene_id, sequence, hook, event_type, payload
             FROM event_log WHERE scene_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![scene_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    scene_id:   row.get(1)?,
                    sequence:   row.get::<_, i64>(2)? as u64,
                    hook:       row.get(3)?,
                    event_type: row.get(4)?,
                    payload:    row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, scene_id: &str, event_type: &str) -> FadeResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE scene_id = ?1 AND event_type = ?2",
            params![scene_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SettingsStore for FadeStore {
    fn setting(&self, key: SettingKey) -> FadeResult<bool> {
        let value: Option<bool> = self
            .conn
            .query_row(
                "SELECT value FROM setting WHERE key = ?1",
                params![key.namespaced()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or_else(|| key.default_value()))
    }

    fn set_setting(&mut self, key: SettingKey, value: bool) -> FadeResult<()> {
        self.conn.execute(
            "INSERT INTO setting (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key.namespaced(), value],
        )?;
        Ok(())
    }

    fn tile_flag(&self, tile_id: &str, flag: TileFlag) -> FadeResult<bool> {
        let value: Option<bool> = self
            .conn
            .query_row(
                "SELECT value FROM tile_flag WHERE tile_id = ?1 AND flag = ?2",
                params![tile_id, flag.namespaced()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(false))
    }

    fn set_tile_flag(&mut self, tile_id: &str, flag: TileFlag, value: bool) -> FadeResult<()> {
        self.conn.execute(
            "INSERT INTO tile_flag (tile_id, flag, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(tile_id, flag) DO UPDATE SET value = excluded.value",
            params![tile_id, flag.namespaced(), value],
        )?;
        Ok(())
    }
}

impl TileUpdater for FadeStore {
    fn update_tile(&mut self, update: &TileUpdate) -> FadeResult<()> {
        self.conn.execute(
            "INSERT INTO tile_occlusion (tile_id, mode, update_count) VALUES (?1, ?2, 1)
             ON CONFLICT(tile_id) DO UPDATE SET
                 mode = excluded.mode,
                 update_count = update_count + 1",
            params![update.tile_id, update.mode().code()],
        )?;
        Ok(())
    }
}
