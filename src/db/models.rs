// Data models — Rust structs that map to database rows and the import format.
//
// These are the types that flow through the application. They're separate
// from the database queries so the aggregation components can use them
// without depending on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed severity order, lowest to highest. All severity comparisons go
/// through ranks in this array — never through string comparison.
pub const SEVERITY_ORDER: [Severity; 4] = [
    Severity::Low,
    Severity::Medium,
    Severity::High,
    Severity::Critical,
];

/// Report severity. `Unknown` absorbs unrecognized values from imports or
/// old database rows; it has no rank and never matches a concrete filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Position in the fixed severity order. `None` for `Unknown`, which
    /// therefore never raises a cluster's max severity.
    pub fn rank(self) -> Option<usize> {
        SEVERITY_ORDER.iter().position(|s| *s == self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    /// Strict parse — `None` for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::parse(s)
            .ok_or_else(|| anyhow::anyhow!("unknown severity '{s}' (low/medium/high/critical)"))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hazard category of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    Flood,
    Cyclone,
    Erosion,
    Pollution,
    Tsunami,
    StormSurge,
    Other,
    #[serde(other)]
    Unknown,
}

impl HazardType {
    pub fn as_str(self) -> &'static str {
        match self {
            HazardType::Flood => "flood",
            HazardType::Cyclone => "cyclone",
            HazardType::Erosion => "erosion",
            HazardType::Pollution => "pollution",
            HazardType::Tsunami => "tsunami",
            HazardType::StormSurge => "storm_surge",
            HazardType::Other => "other",
            HazardType::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flood" => Some(HazardType::Flood),
            "cyclone" => Some(HazardType::Cyclone),
            "erosion" => Some(HazardType::Erosion),
            "pollution" => Some(HazardType::Pollution),
            "tsunami" => Some(HazardType::Tsunami),
            "storm_surge" => Some(HazardType::StormSurge),
            "other" => Some(HazardType::Other),
            _ => None,
        }
    }
}

impl std::str::FromStr for HazardType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HazardType::parse(s).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown hazard type '{s}' \
                 (flood/cyclone/erosion/pollution/tsunami/storm_surge/other)"
            )
        })
    }
}

impl std::fmt::Display for HazardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Verified,
    Investigating,
    Resolved,
    FalseReport,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verified => "verified",
            ReportStatus::Investigating => "investigating",
            ReportStatus::Resolved => "resolved",
            ReportStatus::FalseReport => "false_report",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "verified" => Some(ReportStatus::Verified),
            "investigating" => Some(ReportStatus::Investigating),
            "resolved" => Some(ReportStatus::Resolved),
            "false_report" => Some(ReportStatus::FalseReport),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::parse(s).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown status '{s}' \
                 (pending/verified/investigating/resolved/false_report/rejected)"
            )
        })
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a hazard was reported. Coordinates are required when a location is
/// present at all; the address fields are free text from the reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

/// A citizen hazard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub hazard: HazardType,
    pub severity: Severity,
    pub status: ReportStatus,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub created_date: DateTime<Utc>,
    /// Report-level confidence score (0-100).
    #[serde(default)]
    pub credibility_score: u32,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub voice_recording_url: Option<String>,
    /// Set only when the report has been verified or rejected.
    pub verification_notes: Option<String>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    /// Identifier of the reporter who submitted this report.
    pub reporter: Option<String>,
}

impl Report {
    /// Whether this report can participate in hotspot clustering.
    pub fn has_coordinates(&self) -> bool {
        self.location.is_some()
    }
}

/// A reporter's stored profile — the identity behind the credibility card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterProfile {
    pub id: String,
    pub display_name: Option<String>,
    /// Reputation score (0-100); tiers cap at 100.
    pub credibility_score: u32,
}
