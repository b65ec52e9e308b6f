//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rusqlite::Connection;
use subseek_core::{Error, Result};

/// V1: subtitle files, dialogue lines and the FTS5 index over them.
const V1_INITIAL: &str = r#"
CREATE TABLE files (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    filename   TEXT NOT NULL UNIQUE,
    file_path  TEXT NOT NULL,
    season     INTEGER NOT NULL,
    episode    INTEGER NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE TABLE dialogues (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id        INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    dialogue_index INTEGER NOT NULL,
    start_time     TEXT NOT NULL,
    end_time       TEXT NOT NULL,
    chinese_text   TEXT NOT NULL,
    english_text   TEXT NOT NULL,
    raw_text       TEXT
);

-- External-content FTS table; populated with the 'rebuild' command.
CREATE VIRTUAL TABLE dialogues_fts USING fts5(
    file_id UNINDEXED,
    dialogue_index UNINDEXED,
    chinese_text,
    english_text,
    content='dialogues',
    content_rowid='id'
);

CREATE INDEX idx_dialogues_file_position ON dialogues(file_id, dialogue_index);
CREATE INDEX idx_files_season_episode ON files(season, episode);
"#;

/// All migrations in order. Each entry is `(version, sql)`.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        tracing::debug!(version, "Applied index schema migration");
    }

    Ok(())
}
