use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::info;

/// Schema version written to `PRAGMA user_version` once all steps ran.
pub const SCHEMA_VERSION: i64 = 2;

fn user_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// v1: users, records and the internal log.
fn create_base_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id     INTEGER PRIMARY KEY,
            user_name   TEXT NOT NULL,
            legal_name  TEXT,
            nick_name   TEXT,
            dept_id     INTEGER,
            admin       INTEGER NOT NULL DEFAULT 0,
            roles       TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS records (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL REFERENCES users(user_id),
            start_time     TEXT,
            end_time       TEXT,
            operator_id    INTEGER NOT NULL DEFAULT 0,
            operator_name  TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id, id);

        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// v2: at most one open session per user, enforced by the storage itself.
fn create_open_session_index(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_records_one_open
            ON records(user_id)
            WHERE start_time IS NOT NULL AND end_time IS NULL;
        "#,
    )
}

/// Apply every schema step newer than the stored `user_version`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let current = user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(AppError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            current, SCHEMA_VERSION
        )));
    }

    if current < 1 {
        create_base_tables(conn).map_err(|e| AppError::Migration(format!("v1: {}", e)))?;
    }
    if current < 2 {
        create_open_session_index(conn).map_err(|e| AppError::Migration(format!("v2: {}", e)))?;
    }

    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!(from = current, to = SCHEMA_VERSION, "database schema migrated");
    }
    Ok(())
}
