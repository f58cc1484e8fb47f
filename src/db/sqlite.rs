// SqliteStore — rusqlite backend implementing the ReportStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return. The lock is never held across .await points — Rust enforces this
// because MutexGuard is !Send.
//
// The free functions in queries.rs remain usable against a Connection
// directly, which is how the in-module tests exercise them.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Report, ReportStatus, ReporterProfile};
use super::traits::ReportStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn upsert_report(&self, report: &Report) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_report(&conn, report)
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let conn = self.conn.lock().await;
        super::queries::list_reports(&conn)
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>> {
        let conn = self.conn.lock().await;
        super::queries::get_report(&conn, id)
    }

    async fn reports_by_reporter(&self, reporter: &str) -> Result<Vec<Report>> {
        let conn = self.conn.lock().await;
        super::queries::reports_by_reporter(&conn, reporter)
    }

    async fn verify_report(&self, id: &str, notes: Option<&str>) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::set_verification(&conn, id, ReportStatus::Verified, notes)
    }

    async fn reject_report(&self, id: &str, notes: Option<&str>) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::set_verification(&conn, id, ReportStatus::Rejected, notes)
    }

    async fn report_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::report_count(&conn)
    }

    async fn count_with_status(&self, status: ReportStatus) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_with_status(&conn, status)
    }

    async fn upsert_reporter(&self, profile: &ReporterProfile) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_reporter(&conn, profile)
    }

    async fn get_reporter(&self, id: &str) -> Result<Option<ReporterProfile>> {
        let conn = self.conn.lock().await;
        super::queries::get_reporter(&conn, id)
    }

    async fn get_sync_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_sync_state(&conn, key)
    }

    async fn set_sync_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_sync_state(&conn, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{HazardType, Location, Severity};
    use crate::db::schema::create_tables;
    use chrono::{TimeZone, Utc};

    async fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    fn sample_report(id: &str, hour: u32) -> Report {
        Report {
            id: id.to_string(),
            hazard: HazardType::Flood,
            severity: Severity::High,
            status: ReportStatus::Pending,
            description: Some("Road under water near the jetty".to_string()),
            location: Some(Location {
                latitude: 13.0827,
                longitude: 80.2707,
                address: Some("Marina Beach".to_string()),
                district: Some("Chennai".to_string()),
                state: Some("Tamil Nadu".to_string()),
            }),
            created_date: Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap(),
            credibility_score: 62,
            media_urls: vec!["https://cdn.example/1.jpg".to_string()],
            voice_recording_url: None,
            verification_notes: None,
            upvotes: 3,
            downvotes: 1,
            reporter: Some("rep-7".to_string()),
        }
    }

    #[tokio::test]
    async fn test_report_roundtrip() {
        let store = test_store().await;
        store.upsert_report(&sample_report("r-1", 8)).await.unwrap();

        let loaded = store.get_report("r-1").await.unwrap().unwrap();
        assert_eq!(loaded.hazard, HazardType::Flood);
        assert_eq!(loaded.severity, Severity::High);
        assert_eq!(loaded.media_urls.len(), 1);
        let location = loaded.location.unwrap();
        assert!((location.latitude - 13.0827).abs() < 1e-9);
        assert_eq!(location.district.as_deref(), Some("Chennai"));
        assert_eq!(loaded.reporter.as_deref(), Some("rep-7"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = test_store().await;
        store.upsert_report(&sample_report("older", 6)).await.unwrap();
        store.upsert_report(&sample_report("newest", 11)).await.unwrap();
        store.upsert_report(&sample_report("middle", 9)).await.unwrap();

        let ids: Vec<String> = store
            .list_reports()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_upsert_is_rerunnable() {
        let store = test_store().await;
        let mut report = sample_report("r-1", 8);
        store.upsert_report(&report).await.unwrap();

        report.severity = Severity::Critical;
        store.upsert_report(&report).await.unwrap();

        assert_eq!(store.report_count().await.unwrap(), 1);
        let loaded = store.get_report("r-1").await.unwrap().unwrap();
        assert_eq!(loaded.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_verify_sets_status_and_notes() {
        let store = test_store().await;
        store.upsert_report(&sample_report("r-1", 8)).await.unwrap();

        let found = store
            .verify_report("r-1", Some("Confirmed by coastal patrol"))
            .await
            .unwrap();
        assert!(found);

        let loaded = store.get_report("r-1").await.unwrap().unwrap();
        assert_eq!(loaded.status, ReportStatus::Verified);
        assert_eq!(
            loaded.verification_notes.as_deref(),
            Some("Confirmed by coastal patrol")
        );
    }

    #[tokio::test]
    async fn test_reject_missing_report_returns_false() {
        let store = test_store().await;
        let found = store.reject_report("ghost", None).await.unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_unrecognized_stored_enums_read_as_unknown() {
        let store = test_store().await;
        {
            let conn = store.conn.lock().await;
            conn.execute(
                "INSERT INTO reports (id, hazard_type, severity, status, created_date)
                 VALUES ('r-odd', 'earthquake', 'catastrophic', 'archived',
                         '2026-01-15T08:30:00Z')",
                [],
            )
            .unwrap();
        }

        let loaded = store.get_report("r-odd").await.unwrap().unwrap();
        assert_eq!(loaded.hazard, HazardType::Unknown);
        assert_eq!(loaded.severity, Severity::Unknown);
        assert_eq!(loaded.status, ReportStatus::Unknown);
    }

    #[tokio::test]
    async fn test_reports_by_reporter() {
        let store = test_store().await;
        store.upsert_report(&sample_report("mine", 8)).await.unwrap();
        let mut other = sample_report("theirs", 9);
        other.reporter = Some("rep-9".to_string());
        store.upsert_report(&other).await.unwrap();

        let mine = store.reports_by_reporter("rep-7").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "mine");
    }

    #[tokio::test]
    async fn test_status_counts() {
        let store = test_store().await;
        store.upsert_report(&sample_report("a", 8)).await.unwrap();
        store.upsert_report(&sample_report("b", 9)).await.unwrap();
        store.verify_report("a", None).await.unwrap();

        assert_eq!(store.report_count().await.unwrap(), 2);
        assert_eq!(
            store.count_with_status(ReportStatus::Verified).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_with_status(ReportStatus::Pending).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_reporter_profile_roundtrip() {
        let store = test_store().await;
        assert!(store.get_reporter("rep-7").await.unwrap().is_none());

        store
            .upsert_reporter(&ReporterProfile {
                id: "rep-7".to_string(),
                display_name: Some("Asha".to_string()),
                credibility_score: 82,
            })
            .await
            .unwrap();

        let profile = store.get_reporter("rep-7").await.unwrap().unwrap();
        assert_eq!(profile.credibility_score, 82);
    }

    #[tokio::test]
    async fn test_sync_state_roundtrip() {
        let store = test_store().await;
        assert_eq!(store.get_sync_state("last_import_at").await.unwrap(), None);
        store
            .set_sync_state("last_import_at", "2026-01-15T09:00:00Z")
            .await
            .unwrap();
        assert_eq!(
            store.get_sync_state("last_import_at").await.unwrap(),
            Some("2026-01-15T09:00:00Z".to_string())
        );
    }
}
