// Report store trait — backend-agnostic async interface for all DB
// operations.
//
// All methods are async so the synchronous rusqlite backend (behind a
// tokio Mutex) fits the same interface a native async backend would. The
// trait mirrors the queries.rs function signatures, so callers hold an
// `Arc<dyn ReportStore>` and never see a Connection.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Report, ReportStatus, ReporterProfile};

#[async_trait]
pub trait ReportStore: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Reports ---

    /// Insert or update a report by id.
    async fn upsert_report(&self, report: &Report) -> Result<()>;

    /// All reports, newest first.
    async fn list_reports(&self) -> Result<Vec<Report>>;

    /// Fetch a single report by id.
    async fn get_report(&self, id: &str) -> Result<Option<Report>>;

    /// One reporter's reports, newest first.
    async fn reports_by_reporter(&self, reporter: &str) -> Result<Vec<Report>>;

    /// Mark a report verified, with optional official notes.
    /// Returns false when no such report exists.
    async fn verify_report(&self, id: &str, notes: Option<&str>) -> Result<bool>;

    /// Mark a report rejected, with optional notes explaining why.
    /// Returns false when no such report exists.
    async fn reject_report(&self, id: &str, notes: Option<&str>) -> Result<bool>;

    /// Total number of stored reports.
    async fn report_count(&self) -> Result<i64>;

    /// Number of stored reports with the given status.
    async fn count_with_status(&self, status: ReportStatus) -> Result<i64>;

    // --- Reporters ---

    /// Save or update a reporter profile.
    async fn upsert_reporter(&self, profile: &ReporterProfile) -> Result<()>;

    /// Fetch a reporter profile by id.
    async fn get_reporter(&self, id: &str) -> Result<Option<ReporterProfile>>;

    // --- Import state ---

    /// Get an import state value by key (e.g., "last_import_at").
    async fn get_sync_state(&self, key: &str) -> Result<Option<String>>;

    /// Set an import state value (upsert).
    async fn set_sync_state(&self, key: &str, value: &str) -> Result<()>;
}
