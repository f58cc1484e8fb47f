// Database schema — table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Citizen hazard reports, as imported from the app export
        CREATE TABLE IF NOT EXISTS reports (
            id TEXT PRIMARY KEY,
            hazard_type TEXT NOT NULL,         -- flood / cyclone / erosion / ...
            severity TEXT NOT NULL,            -- low / medium / high / critical
            status TEXT NOT NULL,              -- pending / verified / ...
            description TEXT,
            location TEXT,                     -- JSON object, null when unlocated
            created_date TEXT NOT NULL,        -- RFC 3339
            credibility_score INTEGER NOT NULL DEFAULT 0,
            media_urls TEXT NOT NULL DEFAULT '[]',  -- JSON array of URLs
            voice_recording_url TEXT,
            verification_notes TEXT,           -- set by verify/reject only
            upvotes INTEGER NOT NULL DEFAULT 0,
            downvotes INTEGER NOT NULL DEFAULT 0
        );

        -- Reporter profiles (credibility card data)
        CREATE TABLE IF NOT EXISTS reporters (
            id TEXT PRIMARY KEY,
            display_name TEXT,
            credibility_score INTEGER NOT NULL DEFAULT 50
        );

        -- Import state — last import time and source
        CREATE TABLE IF NOT EXISTS sync_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Index for filtering the feed by status
        CREATE INDEX IF NOT EXISTS idx_reports_status
            ON reports(status);

        -- Index for newest-first listing and timeframe windows
        CREATE INDEX IF NOT EXISTS idx_reports_created
            ON reports(created_date);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: add the reporter column to reports. The timeline and
    // stats views need to link a report back to the profile that filed it.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "ALTER TABLE reports ADD COLUMN reporter TEXT;
             CREATE INDEX IF NOT EXISTS idx_reports_reporter ON reports(reporter);",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
