//! Database schema and migrations.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 && !table_exists(conn, "locations")? {
        // Fresh database
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
///
/// `recorded_at` holds Unix milliseconds and is filled in by SQLite when the
/// row is inserted.
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            battery INTEGER NOT NULL CHECK (battery BETWEEN 0 AND 100),
            recorded_at INTEGER NOT NULL
                DEFAULT (CAST(ROUND(unixepoch('subsec') * 1000) AS INTEGER))
        );
        CREATE INDEX IF NOT EXISTS idx_locations_recorded_at
            ON locations(recorded_at, id);
        "#,
    )?;

    Ok(())
}

/// Run migrations from old_version to current.
///
/// Databases older than version 1 carry an unversioned `locations` table
/// whose timestamp column is not comparable with ours. It is dropped and
/// recreated.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    if old_version < 1 {
        info!("Upgrading location database from version {}", old_version);
        conn.execute_batch(
            "DROP INDEX IF EXISTS idx_locations_recorded_at;
             DROP TABLE IF EXISTS locations;",
        )?;
        create_schema_v1(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}
