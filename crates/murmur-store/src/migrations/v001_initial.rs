//! v001 -- Initial schema creation.
//!
//! Creates the three core tables: `conversations`, `users`, and
//! `preferences`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Conversations
--
-- One row per conversation; the full message sequence lives in the
-- `document` column as a JSON array and is replaced wholesale on
-- every write.
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS conversations (
    id           TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    document     TEXT NOT NULL,               -- JSON message sequence
    last_updated TEXT NOT NULL                -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Users (profile records created at sign-up)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    email      TEXT PRIMARY KEY NOT NULL,
    id         TEXT NOT NULL,                 -- account UUID
    name       TEXT NOT NULL,
    about      TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Preferences (key/value, e.g. the UI language)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS preferences (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;

/// Apply the v001 schema.
pub fn up(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(UP_SQL)
}
