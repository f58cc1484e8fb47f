// Colored terminal output for the feed, hotspot panel, and reporter stats.
//
// This module handles all terminal-specific formatting: colors, tables,
// progress bars. The main.rs display functions delegate here. Severity and
// status colors follow the app palette: critical red, high orange-ish,
// medium yellow, low green.

use colored::Colorize;

use crate::credibility::{self, TierProgress};
use crate::db::models::{Report, ReportStatus, Severity};
use crate::filter::FilterSelection;
use crate::hotspot::{Hotspot, Summary};

/// Display the filtered report feed.
pub fn display_feed(reports: &[&Report], selection: &FilterSelection) {
    if reports.is_empty() {
        if selection.has_active_filters() {
            println!("No reports match the current filters.");
        } else {
            println!("No reports yet. Run `breakwater import <file>` first.");
        }
        return;
    }

    let noun = if reports.len() == 1 { "report" } else { "reports" };
    let mut header = format!("=== Hazard Feed ({} {}) ===", reports.len(), noun);
    if selection.has_active_filters() {
        header.push_str(&format!(" [{} filters active]", selection.active_count()));
    }
    println!("\n{}", header.bold());
    println!();

    for report in reports {
        let place = report
            .location
            .as_ref()
            .and_then(|l| l.address.as_deref().or(l.district.as_deref()))
            .unwrap_or("Location not specified");

        println!(
            "  {:<10} {:<12} {:<14} {}  {}",
            colorize_severity(report.severity),
            report.hazard.as_str(),
            colorize_status(report.status),
            report.created_date.format("%b %d %H:%M"),
            place.dimmed(),
        );

        if let Some(description) = &report.description {
            println!("      {}", super::truncate_chars(description, 120).dimmed());
        }

        let mut extras: Vec<String> = Vec::new();
        if !report.media_urls.is_empty() {
            extras.push(format!("{} media", report.media_urls.len()));
        }
        if report.voice_recording_url.is_some() {
            extras.push("voice note".to_string());
        }
        if report.credibility_score > 0 {
            extras.push(format!("{}% credible", report.credibility_score));
        }
        if !extras.is_empty() {
            println!("      {}", extras.join("  |  ").dimmed());
        }
    }

    println!();

    // Summary
    let critical = reports
        .iter()
        .filter(|r| r.severity == Severity::Critical)
        .count();
    let high = reports
        .iter()
        .filter(|r| r.severity == Severity::High)
        .count();
    if critical > 0 {
        println!("  {} {} critical", "!!".red().bold(), critical);
    }
    if high > 0 {
        println!("  {} {} high risk", "!".bright_red(), high);
    }
}

/// Display the hotspot panel: headline counters, then ranked clusters.
///
/// `clusters` must already be ranked; callers truncate to the top slice for
/// the bounded view before handing them over.
pub fn display_hotspots(clusters: &[Hotspot<'_>], summary: &Summary, total_clusters: usize) {
    println!("\n{}", "=== Coastal Hazard Map ===".bold());
    println!();
    println!("  Total reports:   {}", summary.total);
    println!(
        "  Critical alerts: {}",
        summary.critical.to_string().red().bold()
    );
    println!("  Verified:        {}", summary.verified.to_string().green());
    println!("  Last 24h:        {}", summary.recent_24h);

    if clusters.is_empty() {
        println!("\nNo hotspots — no located reports in the collection.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Identified Hotspots ({total_clusters}) ===").bold()
    );
    println!();

    for (i, hotspot) in clusters.iter().enumerate() {
        let noun = if hotspot.len() == 1 { "report" } else { "reports" };
        println!(
            "  {:>2}. {:>9.4}, {:>9.4}  {:>3} {}  max severity: {}",
            i + 1,
            hotspot.latitude,
            hotspot.longitude,
            hotspot.len(),
            noun,
            colorize_severity(hotspot.max_severity),
        );
    }

    if clusters.len() < total_clusters {
        println!(
            "\n  {}",
            format!(
                "Showing top {} of {} hotspots (use --all for the full list)",
                clusters.len(),
                total_clusters
            )
            .dimmed()
        );
    }
}

/// Display a reporter's credibility card and submission statistics.
pub fn display_reporter_stats(
    name: &str,
    score: u32,
    progress: &TierProgress,
    total: usize,
    verified: usize,
    pending: usize,
    accuracy: Option<f64>,
) {
    println!("\n{}", format!("=== Credibility: {} ===", name).bold());
    println!();
    println!(
        "  Score: {}  {}",
        score.to_string().bold(),
        colorize_tier(progress.tier),
    );
    println!(
        "  Progress to {}: {} {:.0}%",
        progress.next_target,
        progress_bar(progress.progress_percent, 20),
        progress.progress_percent,
    );
    match credibility::points_to_next(score) {
        Some(points) => println!("  {} points to next level", points),
        None => println!("  {}", "Maximum level achieved!".green().bold()),
    }

    println!();
    println!("  Total reports: {}", total);
    println!("  Verified:      {}", verified.to_string().green());
    println!("  Under review:  {}", pending.to_string().yellow());

    // Accuracy is omitted entirely with no submissions — not shown as zero
    if let Some(rate) = accuracy {
        println!("  Accuracy rate: {}%", format!("{:.0}", rate.round()).bold());
    }
}

/// Display a reporter's submission history, newest first.
pub fn display_timeline(reports: &[Report]) {
    if reports.is_empty() {
        println!("No reports yet. The timeline will appear once reports are submitted.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Report Timeline ({} reports) ===", reports.len()).bold()
    );
    println!();

    for report in reports {
        println!(
            "  {} {}  {:<12} {}",
            status_glyph(report.status),
            report.created_date.format("%Y-%m-%d %H:%M"),
            report.hazard.as_str(),
            colorize_status(report.status),
        );
        if let Some(description) = &report.description {
            println!("      {}", super::truncate_chars(description, 100).dimmed());
        }
        if let Some(notes) = &report.verification_notes {
            println!("      Official response: {}", notes);
        }
    }
}

/// Colorize a severity label.
pub fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.bright_red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.green(),
        Severity::Unknown => label.dimmed(),
    }
}

/// Colorize a status label.
pub fn colorize_status(status: ReportStatus) -> colored::ColoredString {
    let label = status.as_str();
    match status {
        ReportStatus::Verified => label.green(),
        ReportStatus::Investigating => label.blue(),
        ReportStatus::Pending => label.yellow(),
        ReportStatus::Resolved => label.normal(),
        ReportStatus::FalseReport | ReportStatus::Rejected => label.red(),
        ReportStatus::Unknown => label.dimmed(),
    }
}

/// Colorize a credibility tier name.
fn colorize_tier(tier: crate::credibility::CredibilityTier) -> colored::ColoredString {
    use crate::credibility::CredibilityTier::*;
    let label = tier.as_str();
    match tier {
        LegendaryGuardian => label.magenta().bold(),
        CoastalChampion => label.green(),
        ReliableReporter => label.blue(),
        NewGuardian => label.normal(),
    }
}

fn status_glyph(status: ReportStatus) -> colored::ColoredString {
    match status {
        ReportStatus::Verified => "✓".green(),
        ReportStatus::Rejected | ReportStatus::FalseReport => "✗".red(),
        ReportStatus::Investigating => "!".blue(),
        _ => "·".yellow(),
    }
}

/// Fixed-width text progress bar, e.g. `[########------------]`.
fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
