// System status display — shows DB stats, report counts, last import time.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::models::ReportStatus;
use crate::db::traits::ReportStore;

/// Display system status to the terminal.
pub async fn show(store: &Arc<dyn ReportStore>, db_display_path: &str) -> Result<()> {
    if !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `breakwater init` to set up the database.");
        return Ok(());
    }

    // Database file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    // Report counts
    let total = store.report_count().await?;
    if total == 0 {
        println!("Reports: none imported yet");
        println!("  Run `breakwater import <file>` to load a report export");
    } else {
        let verified = store.count_with_status(ReportStatus::Verified).await?;
        let pending = store.count_with_status(ReportStatus::Pending).await?;
        let investigating = store.count_with_status(ReportStatus::Investigating).await?;
        println!(
            "Reports: {} total, {} verified, {} pending, {} investigating",
            total, verified, pending, investigating
        );
    }

    // Last import
    match store.get_sync_state("last_import_at").await? {
        Some(at) => {
            let source = store
                .get_sync_state("last_import_source")
                .await?
                .unwrap_or_else(|| "unknown source".to_string());
            println!("Last import: {} ({})", at, source);
        }
        None => {
            println!("Last import: never");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
