// Database queries — CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust
// interfaces. Enum columns are stored as their snake_case strings and read
// back leniently: a value written by a newer app version comes back as
// `Unknown` instead of failing the whole listing.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{
    HazardType, Location, Report, ReportStatus, ReporterProfile, Severity,
};

// --- Reports ---

/// Insert or update a report by id (imports are re-runnable).
pub fn upsert_report(conn: &Connection, report: &Report) -> Result<()> {
    let location_json = report
        .location
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let media_json = serde_json::to_string(&report.media_urls)?;

    conn.execute(
        "INSERT INTO reports (id, hazard_type, severity, status, description, location,
                              created_date, credibility_score, media_urls,
                              voice_recording_url, verification_notes, upvotes, downvotes,
                              reporter)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(id) DO UPDATE SET
            hazard_type = ?2,
            severity = ?3,
            status = ?4,
            description = ?5,
            location = ?6,
            created_date = ?7,
            credibility_score = ?8,
            media_urls = ?9,
            voice_recording_url = ?10,
            verification_notes = ?11,
            upvotes = ?12,
            downvotes = ?13,
            reporter = ?14",
        params![
            report.id,
            report.hazard.as_str(),
            report.severity.as_str(),
            report.status.as_str(),
            report.description,
            location_json,
            report.created_date.to_rfc3339(),
            report.credibility_score,
            media_json,
            report.voice_recording_url,
            report.verification_notes,
            report.upvotes,
            report.downvotes,
            report.reporter,
        ],
    )?;
    Ok(())
}

const REPORT_COLUMNS: &str = "id, hazard_type, severity, status, description, location,
        created_date, credibility_score, media_urls, voice_recording_url,
        verification_notes, upvotes, downvotes, reporter";

/// List all reports, newest first — the order the feed and timeline expect.
/// The filter evaluator preserves whatever order it is given.
pub fn list_reports(conn: &Connection) -> Result<Vec<Report>> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_date DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], report_from_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Fetch a single report by id.
pub fn get_report(conn: &Connection, id: &str) -> Result<Option<Report>> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(params![id], report_from_row).optional()?;
    Ok(result)
}

/// List one reporter's reports, newest first (timeline order).
pub fn reports_by_reporter(conn: &Connection, reporter: &str) -> Result<Vec<Report>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports WHERE reporter = ?1 ORDER BY created_date DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![reporter], report_from_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

/// Apply a verification decision: set the status and notes on one report.
///
/// Only `verified` and `rejected` carry notes, so this is the single write
/// path for `verification_notes`. Returns false when no such report exists.
pub fn set_verification(
    conn: &Connection,
    id: &str,
    status: ReportStatus,
    notes: Option<&str>,
) -> Result<bool> {
    debug_assert!(matches!(
        status,
        ReportStatus::Verified | ReportStatus::Rejected
    ));
    let updated = conn.execute(
        "UPDATE reports SET status = ?2, verification_notes = ?3 WHERE id = ?1",
        params![id, status.as_str(), notes],
    )?;
    Ok(updated > 0)
}

/// Total number of stored reports.
pub fn report_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;
    Ok(count)
}

/// Number of stored reports with the given status.
pub fn count_with_status(conn: &Connection, status: ReportStatus) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reports WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    let hazard: String = row.get(1)?;
    let severity: String = row.get(2)?;
    let status: String = row.get(3)?;
    let location_json: Option<String> = row.get(5)?;
    let created: String = row.get(6)?;
    let media_json: String = row.get(8)?;

    let created_date: DateTime<Utc> = DateTime::parse_from_rfc3339(&created)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Report {
        id: row.get(0)?,
        hazard: HazardType::parse(&hazard).unwrap_or(HazardType::Unknown),
        severity: Severity::parse(&severity).unwrap_or(Severity::Unknown),
        status: ReportStatus::parse(&status).unwrap_or(ReportStatus::Unknown),
        description: row.get(4)?,
        location: location_json.and_then(|json| serde_json::from_str::<Location>(&json).ok()),
        created_date,
        credibility_score: row.get(7)?,
        media_urls: serde_json::from_str(&media_json).unwrap_or_default(),
        voice_recording_url: row.get(9)?,
        verification_notes: row.get(10)?,
        upvotes: row.get(11)?,
        downvotes: row.get(12)?,
        reporter: row.get(13)?,
    })
}

// --- Reporters ---

/// Save or update a reporter profile.
pub fn upsert_reporter(conn: &Connection, profile: &ReporterProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO reporters (id, display_name, credibility_score)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            display_name = ?2,
            credibility_score = ?3",
        params![profile.id, profile.display_name, profile.credibility_score],
    )?;
    Ok(())
}

/// Fetch a reporter profile by id.
pub fn get_reporter(conn: &Connection, id: &str) -> Result<Option<ReporterProfile>> {
    let mut stmt = conn.prepare(
        "SELECT id, display_name, credibility_score FROM reporters WHERE id = ?1",
    )?;
    let result = stmt
        .query_row(params![id], |row| {
            Ok(ReporterProfile {
                id: row.get(0)?,
                display_name: row.get(1)?,
                credibility_score: row.get(2)?,
            })
        })
        .optional()?;
    Ok(result)
}

// --- Import state ---

/// Get an import state value by key (e.g., "last_import_at").
pub fn get_sync_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM sync_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set an import state value (upsert).
pub fn set_sync_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO sync_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}
