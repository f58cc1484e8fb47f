// Filter evaluator — reduces a report collection to the subset matching a
// four-field selection (status, type, severity, timeframe).
//
// Filtering is a pure conjunction: each field is either the sentinel "all"
// (no constraint) or one concrete value the report must equal exactly. The
// result preserves input order; nothing here re-sorts.

use chrono::{DateTime, Duration, Utc};

use crate::db::models::{HazardType, Report, ReportStatus, Severity};

/// One filter field: either no constraint, or exactly one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

// Not derived: the derive would demand T: Default for a variant that
// doesn't hold a T.
impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether a report field passes this selection. An `Unknown` report
    /// value never equals a concrete selection, so it fails closed.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Selection::All)
    }
}

/// Relative recency window applied against report creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    LastHour,
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl Timeframe {
    pub fn window(self) -> Duration {
        match self {
            Timeframe::LastHour => Duration::hours(1),
            Timeframe::Last24Hours => Duration::hours(24),
            Timeframe::Last7Days => Duration::days(7),
            Timeframe::Last30Days => Duration::days(30),
        }
    }

    /// The instant a report must be strictly newer than to pass.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::LastHour => "1h",
            Timeframe::Last24Hours => "24h",
            Timeframe::Last7Days => "7d",
            Timeframe::Last30Days => "30d",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Timeframe::LastHour),
            "24h" => Ok(Timeframe::Last24Hours),
            "7d" => Ok(Timeframe::Last7Days),
            "30d" => Ok(Timeframe::Last30Days),
            _ => Err(anyhow::anyhow!("unknown timeframe '{s}' (1h/24h/7d/30d)")),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four independent filter fields. `Default` is the all-pass selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterSelection {
    pub status: Selection<ReportStatus>,
    pub hazard: Selection<HazardType>,
    pub severity: Selection<Severity>,
    pub timeframe: Selection<Timeframe>,
}

impl FilterSelection {
    /// True iff at least one field is not "all".
    pub fn has_active_filters(&self) -> bool {
        self.status.is_active()
            || self.hazard.is_active()
            || self.severity.is_active()
            || self.timeframe.is_active()
    }

    /// Number of non-"all" fields (shown next to the filter control).
    pub fn active_count(&self) -> usize {
        [
            self.status.is_active(),
            self.hazard.is_active(),
            self.severity.is_active(),
            self.timeframe.is_active(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Reset every field to "all". Total; never fails.
    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }

    /// Whether a single report passes all four fields at the given instant.
    pub fn matches(&self, report: &Report, now: DateTime<Utc>) -> bool {
        if !self.status.admits(&report.status) {
            return false;
        }
        if !self.hazard.admits(&report.hazard) {
            return false;
        }
        if !self.severity.admits(&report.severity) {
            return false;
        }
        match self.timeframe {
            Selection::All => true,
            Selection::Only(frame) => report.created_date > frame.cutoff(now),
        }
    }
}

/// Apply a selection to a report collection.
///
/// Returns the matching reports in their original order. `now` is read once
/// by the caller and held fixed for the whole pass so a collection is
/// filtered against a single consistent instant.
pub fn apply<'a>(
    reports: &'a [Report],
    selection: &FilterSelection,
    now: DateTime<Utc>,
) -> Vec<&'a Report> {
    reports
        .iter()
        .filter(|report| selection.matches(report, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(id: &str, status: ReportStatus, hazard: HazardType, severity: Severity) -> Report {
        Report {
            id: id.to_string(),
            hazard,
            severity,
            status,
            description: None,
            location: None,
            created_date: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
            credibility_score: 0,
            media_urls: vec![],
            voice_recording_url: None,
            verification_notes: None,
            upvotes: 0,
            downvotes: 0,
            reporter: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn all_selection_is_identity() {
        let reports = vec![
            report("a", ReportStatus::Pending, HazardType::Flood, Severity::Low),
            report("b", ReportStatus::Verified, HazardType::Cyclone, Severity::High),
        ];
        let out = apply(&reports, &FilterSelection::default(), now());
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn fields_combine_as_conjunction() {
        let reports = vec![
            report("a", ReportStatus::Verified, HazardType::Flood, Severity::High),
            report("b", ReportStatus::Verified, HazardType::Flood, Severity::Low),
            report("c", ReportStatus::Pending, HazardType::Flood, Severity::High),
        ];
        let selection = FilterSelection {
            status: Selection::Only(ReportStatus::Verified),
            severity: Selection::Only(Severity::High),
            ..Default::default()
        };
        let out = apply(&reports, &selection, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn filter_preserves_input_order() {
        let reports = vec![
            report("z", ReportStatus::Pending, HazardType::Flood, Severity::Low),
            report("a", ReportStatus::Pending, HazardType::Flood, Severity::Low),
            report("m", ReportStatus::Verified, HazardType::Flood, Severity::Low),
            report("b", ReportStatus::Pending, HazardType::Flood, Severity::Low),
        ];
        let selection = FilterSelection {
            status: Selection::Only(ReportStatus::Pending),
            ..Default::default()
        };
        let ids: Vec<&str> = apply(&reports, &selection, now())
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["z", "a", "b"]);
    }

    #[test]
    fn timeframe_cutoff_is_strict() {
        let now = now();
        let mut on_cutoff = report("edge", ReportStatus::Pending, HazardType::Flood, Severity::Low);
        on_cutoff.created_date = now - Duration::hours(24);
        let mut inside = report("in", ReportStatus::Pending, HazardType::Flood, Severity::Low);
        inside.created_date = now - Duration::hours(23);
        let reports = vec![on_cutoff, inside];

        let selection = FilterSelection {
            timeframe: Selection::Only(Timeframe::Last24Hours),
            ..Default::default()
        };
        let out = apply(&reports, &selection, now);
        // Exactly on the cutoff instant does not pass
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "in");
    }

    #[test]
    fn unknown_severity_fails_closed() {
        let reports = vec![report(
            "u",
            ReportStatus::Pending,
            HazardType::Flood,
            Severity::Unknown,
        )];
        let selection = FilterSelection {
            severity: Selection::Only(Severity::Critical),
            ..Default::default()
        };
        assert!(apply(&reports, &selection, now()).is_empty());

        // But it still passes the all-pass selection
        assert_eq!(apply(&reports, &FilterSelection::default(), now()).len(), 1);
    }

    #[test]
    fn missing_location_is_irrelevant_to_filtering() {
        let reports = vec![report(
            "no-loc",
            ReportStatus::Verified,
            HazardType::Erosion,
            Severity::Medium,
        )];
        let selection = FilterSelection {
            status: Selection::Only(ReportStatus::Verified),
            hazard: Selection::Only(HazardType::Erosion),
            severity: Selection::Only(Severity::Medium),
            ..Default::default()
        };
        assert_eq!(apply(&reports, &selection, now()).len(), 1);
    }

    #[test]
    fn active_filters_and_clear() {
        let mut selection = FilterSelection {
            status: Selection::Only(ReportStatus::Pending),
            timeframe: Selection::Only(Timeframe::Last7Days),
            ..Default::default()
        };
        assert!(selection.has_active_filters());
        assert_eq!(selection.active_count(), 2);

        selection.clear();
        assert!(!selection.has_active_filters());
        assert_eq!(selection.active_count(), 0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = apply(&[], &FilterSelection::default(), now());
        assert!(out.is_empty());
    }
}
