use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Everything
/// has a sensible default except the reporter identity, which is only
/// required by the commands that show a personal view (stats, timeline).
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Reporter identity used when stats/timeline get no explicit argument.
    pub reporter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let db_path = env::var("BREAKWATER_DB_PATH").unwrap_or_else(|_| default_db_path());

        Ok(Self {
            db_path,
            reporter: env::var("BREAKWATER_REPORTER").unwrap_or_default(),
        })
    }

    /// Check that a reporter identity is configured.
    /// Call this before any command that renders a personal view without an
    /// explicit reporter argument.
    pub fn require_reporter(&self) -> Result<()> {
        if self.reporter.is_empty() {
            anyhow::bail!(
                "BREAKWATER_REPORTER not set and no reporter given. Add it to your .env file\n\
                 or pass a reporter id explicitly. See .env.example for the variables."
            );
        }
        Ok(())
    }
}

/// Default database location: the platform data directory, falling back to
/// the working directory when none exists (e.g. stripped-down containers).
fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("breakwater").join("reports.db"))
        .unwrap_or_else(|| PathBuf::from("./breakwater.db"))
        .to_string_lossy()
        .into_owned()
}
