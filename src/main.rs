use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use breakwater::config::Config;
use breakwater::credibility;
use breakwater::db;
use breakwater::db::models::{Report, ReportStatus, ReporterProfile};
use breakwater::db::sqlite::SqliteStore;
use breakwater::db::traits::ReportStore;
use breakwater::filter::{FilterSelection, Selection};
use breakwater::hotspot;
use breakwater::output;

/// Breakwater: hazard report aggregation for coastal citizen reporting.
///
/// Imports a report export, then renders the filtered feed, spatial
/// hotspots, and reporter credibility from the stored collection.
#[derive(Parser)]
#[command(name = "breakwater", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import reports (and optionally reporter profiles) from JSON exports
    Import {
        /// Path to a JSON array of reports
        file: PathBuf,

        /// Path to a JSON array of reporter profiles
        #[arg(long)]
        reporters: Option<PathBuf>,
    },

    /// Show the report feed, filtered by status/type/severity/timeframe
    Feed {
        /// Filter by status (pending/verified/investigating/resolved/false_report/rejected)
        #[arg(long)]
        status: Option<String>,

        /// Filter by hazard type (flood/cyclone/erosion/pollution/tsunami/storm_surge/other)
        #[arg(long = "type")]
        hazard: Option<String>,

        /// Filter by severity (low/medium/high/critical)
        #[arg(long)]
        severity: Option<String>,

        /// Filter by recency window (1h/24h/7d/30d)
        #[arg(long)]
        timeframe: Option<String>,

        /// Show at most this many reports
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show hotspot clusters and headline counters
    Hotspots {
        /// Show the full cluster list instead of the top 6
        #[arg(long)]
        all: bool,
    },

    /// Show a reporter's credibility card and submission statistics
    Stats {
        /// Reporter id (defaults to BREAKWATER_REPORTER)
        reporter: Option<String>,
    },

    /// Show a reporter's submission history, newest first
    Timeline {
        /// Reporter id (defaults to BREAKWATER_REPORTER)
        reporter: Option<String>,
    },

    /// Mark a report verified
    Verify {
        /// The report id
        id: String,

        /// Official notes, e.g. "Confirmed by local authorities"
        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a report rejected
    Reject {
        /// The report id
        id: String,

        /// Reason, e.g. "Duplicate report, insufficient evidence"
        #[arg(long)]
        notes: Option<String>,
    },

    /// Write a markdown digest of the current collection
    Report {
        /// Output path for the digest
        #[arg(long, short, default_value = "hazard-digest.md")]
        output: PathBuf,
    },

    /// Show system status (DB stats, report counts, last import)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("breakwater=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            info!("Initializing breakwater database...");
            let conn = db::initialize(&config.db_path)?;
            let table_count = db::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: import a report export");
            println!("  breakwater import reports.json --reporters reporters.json");
        }

        Commands::Import { file, reporters } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let reports: Vec<Report> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of reports", file.display()))?;

            println!("Importing {} reports from {}...", reports.len(), file.display());
            let bar = ProgressBar::new(reports.len() as u64);
            bar.set_style(ProgressStyle::with_template(
                "  {bar:40.cyan/blue} {pos}/{len} reports",
            )?);
            for report in &reports {
                store.upsert_report(report).await?;
                bar.inc(1);
            }
            bar.finish_and_clear();
            info!(count = reports.len(), "Imported reports");

            if let Some(reporters_file) = reporters {
                let raw = std::fs::read_to_string(&reporters_file)
                    .with_context(|| format!("Failed to read {}", reporters_file.display()))?;
                let profiles: Vec<ReporterProfile> = serde_json::from_str(&raw).with_context(|| {
                    format!(
                        "{} is not a JSON array of reporter profiles",
                        reporters_file.display()
                    )
                })?;
                for profile in &profiles {
                    store.upsert_reporter(profile).await?;
                }
                println!("Imported {} reporter profiles.", profiles.len());
            }

            store
                .set_sync_state("last_import_at", &Utc::now().to_rfc3339())
                .await?;
            store
                .set_sync_state("last_import_source", &file.display().to_string())
                .await?;

            println!("{}", "Import complete.".bold());
            println!("  Reports in store: {}", store.report_count().await?);
        }

        Commands::Feed {
            status,
            hazard,
            severity,
            timeframe,
            limit,
        } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            let selection = FilterSelection {
                status: parse_selection(status.as_deref())?,
                hazard: parse_selection(hazard.as_deref())?,
                severity: parse_selection(severity.as_deref())?,
                timeframe: parse_selection(timeframe.as_deref())?,
            };

            let reports = store.list_reports().await?;
            // One clock read for the whole filtering pass
            let now = Utc::now();
            let mut filtered = breakwater::filter::apply(&reports, &selection, now);
            if let Some(limit) = limit {
                filtered.truncate(limit);
            }

            output::terminal::display_feed(&filtered, &selection);
        }

        Commands::Hotspots { all } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            let reports = store.list_reports().await?;
            let now = Utc::now();
            let summary = hotspot::summarize(&reports, now);
            let ranked = hotspot::rank(hotspot::aggregate(&reports));

            let total_clusters = ranked.len();
            let visible: &[_] = if all {
                &ranked
            } else {
                &ranked[..ranked.len().min(hotspot::DEFAULT_TOP)]
            };
            output::terminal::display_hotspots(visible, &summary, total_clusters);
        }

        Commands::Stats { reporter } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;
            let reporter_id = resolve_reporter(reporter, &config)?;

            let profile = store.get_reporter(&reporter_id).await?;
            let score = profile
                .as_ref()
                .map(|p| p.credibility_score)
                .unwrap_or(credibility::DEFAULT_SCORE);
            let name = profile
                .as_ref()
                .and_then(|p| p.display_name.clone())
                .unwrap_or_else(|| reporter_id.clone());

            let reports = store.reports_by_reporter(&reporter_id).await?;
            let total = reports.len();
            let verified = reports
                .iter()
                .filter(|r| r.status == ReportStatus::Verified)
                .count();
            let pending = reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count();

            let progress = credibility::tier_for(score);
            let accuracy = credibility::accuracy_rate(verified as u32, total as u32);

            output::terminal::display_reporter_stats(
                &name, score, &progress, total, verified, pending, accuracy,
            );
        }

        Commands::Timeline { reporter } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;
            let reporter_id = resolve_reporter(reporter, &config)?;

            let reports = store.reports_by_reporter(&reporter_id).await?;
            output::terminal::display_timeline(&reports);
        }

        Commands::Verify { id, notes } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            if !store.verify_report(&id, notes.as_deref()).await? {
                anyhow::bail!("No report with id '{id}'");
            }
            info!(id = %id, "Report verified");
            println!("{} report {id} marked verified", "✓".green());
        }

        Commands::Reject { id, notes } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            if !store.reject_report(&id, notes.as_deref()).await? {
                anyhow::bail!("No report with id '{id}'");
            }
            info!(id = %id, "Report rejected");
            println!("{} report {id} marked rejected", "✗".red());
        }

        Commands::Report { output: path } => {
            let config = Config::load()?;
            let store = open_store(&config).await?;

            let reports = store.list_reports().await?;
            let now = Utc::now();
            let summary = hotspot::summarize(&reports, now);
            let ranked = hotspot::rank(hotspot::aggregate(&reports));
            let top = &ranked[..ranked.len().min(hotspot::DEFAULT_TOP)];

            let digest = output::markdown::digest(&summary, top, now);
            std::fs::write(&path, digest)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Digest written to {}", path.display());
        }

        Commands::Status => {
            let config = Config::load()?;
            let store = open_store(&config).await?;
            breakwater::status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Open the report store over the configured database.
async fn open_store(config: &Config) -> Result<Arc<dyn ReportStore>> {
    let conn = db::open(&config.db_path)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Parse one filter flag: absent or "all" means no constraint.
fn parse_selection<T>(value: Option<&str>) -> Result<Selection<T>>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    match value {
        None | Some("all") => Ok(Selection::All),
        Some(concrete) => Ok(Selection::Only(concrete.parse()?)),
    }
}

/// The reporter to show: the explicit argument, or the configured default.
fn resolve_reporter(arg: Option<String>, config: &Config) -> Result<String> {
    match arg {
        Some(reporter) => Ok(reporter),
        None => {
            config.require_reporter()?;
            Ok(config.reporter.clone())
        }
    }
}
