// Hotspot aggregator — coarse spatial binning of located reports.
//
// Reports are grouped by their coordinates rounded to 2 decimal places
// (about a 1.1 km grid cell at the equator). This is deliberate binning,
// not distance-based clustering: two reports 1.5 km apart can land in
// different cells. Changing the resolution changes the product, so the
// rounding lives in exactly one place (CellKey::for_location).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::db::models::{Report, ReportStatus, Severity};

/// How many clusters the bounded "top hotspots" views show. Truncation is a
/// rendering concern; `aggregate` and `rank` always return the full list.
pub const DEFAULT_TOP: usize = 6;

/// Window for the headline "recent reports" counter.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// A cluster cell: latitude and longitude independently rounded to
/// 2 decimals, kept as integer hundredths so the key is hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    lat_e2: i32,
    lon_e2: i32,
}

impl CellKey {
    fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e2: (latitude * 100.0).round() as i32,
            lon_e2: (longitude * 100.0).round() as i32,
        }
    }
}

/// A spatial cluster of reports sharing a rounded coordinate cell.
///
/// Built fresh on every aggregation pass and never mutated afterwards. The
/// coordinates are the first member's raw position, not the cell center.
#[derive(Debug, Clone)]
pub struct Hotspot<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub reports: Vec<&'a Report>,
    pub max_severity: Severity,
}

impl Hotspot<'_> {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Group located reports into hotspot clusters.
///
/// Reports without coordinates are excluded entirely. Clusters come back in
/// creation order (order of first member seen), and each cluster's members
/// keep input order. Max severity starts at `low` and is only raised by a
/// member with a strictly higher rank; an unranked severity never raises it.
pub fn aggregate(reports: &[Report]) -> Vec<Hotspot<'_>> {
    let mut index: HashMap<CellKey, usize> = HashMap::new();
    let mut clusters: Vec<Hotspot> = Vec::new();

    for report in reports {
        let Some(location) = &report.location else {
            continue;
        };
        let key = CellKey::new(location.latitude, location.longitude);

        let slot = *index.entry(key).or_insert_with(|| {
            clusters.push(Hotspot {
                latitude: location.latitude,
                longitude: location.longitude,
                reports: Vec::new(),
                max_severity: Severity::Low,
            });
            clusters.len() - 1
        });

        let cluster = &mut clusters[slot];
        cluster.reports.push(report);
        if report.severity.rank() > cluster.max_severity.rank() {
            cluster.max_severity = report.severity;
        }
    }

    clusters
}

/// Order clusters for display: descending by member count, ties keeping
/// creation order (stable sort), so ranking twice changes nothing.
pub fn rank(mut clusters: Vec<Hotspot<'_>>) -> Vec<Hotspot<'_>> {
    clusters.sort_by(|a, b| b.reports.len().cmp(&a.reports.len()));
    clusters
}

/// Count reports created strictly within `window` of `now`.
///
/// Pure in `now`; callers read the clock once per pass and must not cache
/// the result beyond it. The summary's 24-hour tile passes
/// `Duration::hours(RECENT_WINDOW_HOURS)`.
pub fn recent_count(reports: &[Report], window: Duration, now: DateTime<Utc>) -> usize {
    let cutoff = now - window;
    reports
        .iter()
        .filter(|report| report.created_date > cutoff)
        .count()
}

/// Headline counters for the map panel. Unlike clustering, these are
/// location-independent — a report with no coordinates still counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub verified: usize,
    pub recent_24h: usize,
}

pub fn summarize(reports: &[Report], now: DateTime<Utc>) -> Summary {
    Summary {
        total: reports.len(),
        critical: reports
            .iter()
            .filter(|r| r.severity == Severity::Critical)
            .count(),
        verified: reports
            .iter()
            .filter(|r| r.status == ReportStatus::Verified)
            .count(),
        recent_24h: recent_count(reports, Duration::hours(RECENT_WINDOW_HOURS), now),
    }
}
