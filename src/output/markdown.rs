// Markdown digest generation for the `report` command.
//
// Produces a shareable snapshot of the current collection: headline
// counters and the ranked hotspot list. The digest is plain text owned by
// the caller; writing it to disk happens in main.rs.

use chrono::{DateTime, Utc};

use crate::hotspot::{Hotspot, Summary};

/// Render the digest. `clusters` must already be ranked; the digest shows
/// them all, so callers pass the truncated slice if they want a bounded one.
pub fn digest(summary: &Summary, clusters: &[Hotspot<'_>], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str("# Coastal hazard digest\n\n");
    out.push_str(&format!(
        "Generated {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Count |\n");
    out.push_str("|---|---|\n");
    out.push_str(&format!("| Total reports | {} |\n", summary.total));
    out.push_str(&format!("| Critical alerts | {} |\n", summary.critical));
    out.push_str(&format!("| Verified | {} |\n", summary.verified));
    out.push_str(&format!("| Last 24h | {} |\n", summary.recent_24h));

    out.push_str("\n## Hotspots\n\n");
    if clusters.is_empty() {
        out.push_str("No located reports.\n");
        return out;
    }

    out.push_str("| # | Coordinates | Reports | Max severity |\n");
    out.push_str("|---|---|---|---|\n");
    for (i, hotspot) in clusters.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {:.4}, {:.4} | {} | {} |\n",
            i + 1,
            hotspot.latitude,
            hotspot.longitude,
            hotspot.len(),
            hotspot.max_severity,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{HazardType, Location, Report, ReportStatus, Severity};
    use crate::hotspot;
    use chrono::TimeZone;

    fn located(id: &str, lat: f64, lon: f64) -> Report {
        Report {
            id: id.to_string(),
            hazard: HazardType::Flood,
            severity: Severity::Critical,
            status: ReportStatus::Pending,
            description: None,
            location: Some(Location {
                latitude: lat,
                longitude: lon,
                address: None,
                district: None,
                state: None,
            }),
            created_date: Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap(),
            credibility_score: 0,
            media_urls: vec![],
            voice_recording_url: None,
            verification_notes: None,
            upvotes: 0,
            downvotes: 0,
            reporter: None,
        }
    }

    #[test]
    fn digest_lists_summary_and_hotspots() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let reports = vec![located("a", 13.0827, 80.2707), located("b", 13.0829, 80.2705)];
        let summary = hotspot::summarize(&reports, now);
        let clusters = hotspot::rank(hotspot::aggregate(&reports));

        let text = digest(&summary, &clusters, now);
        assert!(text.contains("| Total reports | 2 |"));
        assert!(text.contains("| Critical alerts | 2 |"));
        assert!(text.contains("| 1 | 13.0827, 80.2707 | 2 | critical |"));
    }

    #[test]
    fn digest_handles_unlocated_collection() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let mut report = located("a", 0.0, 0.0);
        report.location = None;
        let reports = vec![report];
        let summary = hotspot::summarize(&reports, now);
        let clusters = hotspot::rank(hotspot::aggregate(&reports));

        let text = digest(&summary, &clusters, now);
        assert!(text.contains("No located reports."));
        assert!(text.contains("| Total reports | 1 |"));
    }
}
