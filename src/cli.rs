//! Command-line interface definitions for Courtside News.
//!
//! All options can be provided via command-line flags or, where marked,
//! environment variables. Defaults match the hub's politeness expectations:
//! one request per second, five articles per run.

use clap::Parser;

/// Command-line arguments for the harvest run.
///
/// # Examples
///
/// ```sh
/// # Default run against the AP NBA hub
/// courtside_news
///
/// # First run against a fresh database
/// courtside_news --cold-start
///
/// # Selector debugging without touching the store
/// courtside_news --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Hub page to harvest article links from
    #[arg(long, env = "NEWS_HUB_URL", default_value = "https://apnews.com/hub/nba")]
    pub hub_url: String,

    /// SQLite database URL holding `games` and `latest_news`
    #[arg(short, long, env = "STATS_DB", default_value = "sqlite:courtside.db")]
    pub database: String,

    /// Maximum number of articles to harvest per run
    #[arg(short = 'n', long, default_value_t = 5)]
    pub cap: usize,

    /// Minimum interval between any two outbound requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub min_interval_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 20)]
    pub request_timeout_secs: u64,

    /// Number of article fetches in flight at once (the pacing interval
    /// still applies globally)
    #[arg(long, default_value_t = 2)]
    pub concurrency: usize,

    /// Treat a missing watermark record as "harvest everything" instead of
    /// aborting; for populating a fresh database
    #[arg(long, default_value_t = false)]
    pub cold_start: bool,

    /// Harvest and log, but skip the store write
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["courtside_news"]);
        assert_eq!(cli.hub_url, "https://apnews.com/hub/nba");
        assert_eq!(cli.cap, 5);
        assert_eq!(cli.min_interval_ms, 1000);
        assert_eq!(cli.concurrency, 2);
        assert!(!cli.cold_start);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "courtside_news",
            "-n",
            "3",
            "--database",
            "sqlite:/tmp/test.db",
            "--cold-start",
            "--dry-run",
        ]);
        assert_eq!(cli.cap, 3);
        assert_eq!(cli.database, "sqlite:/tmp/test.db");
        assert!(cli.cold_start);
        assert!(cli.dry_run);
    }
}
