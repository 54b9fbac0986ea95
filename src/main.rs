//! # Courtside News
//!
//! An incremental news harvester for the stats site: scrapes the AP News
//! NBA hub, fetches the full text of the most recent stories, drops
//! anything published at or before the date of the last recorded game, and
//! atomically replaces the database's `latest_news` collection with the
//! surviving set.
//!
//! ## Usage
//!
//! ```sh
//! courtside_news --database sqlite:courtside.db
//! ```
//!
//! ## Architecture
//!
//! The run is a linear pipeline:
//! 1. **Watermark**: read the most recent game date from the store
//! 2. **Indexing**: fetch the hub page and extract the story listing
//! 3. **Filtering**: keep only items strictly newer than the watermark
//! 4. **Fetching**: download and parse the top N surviving articles
//!    (bounded fan-out behind a shared request pacer)
//! 5. **Sync**: replace `latest_news` in a single transaction
//!
//! Failed article fetches and malformed cards are skipped, never fatal; a
//! hub transport failure or a missing watermark (without `--cold-start`)
//! ends the run before the store is touched.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod errors;
mod fetch;
mod harvest;
mod models;
mod recency;
mod scrapers;
mod store;

use cli::Cli;
use errors::StoreError;
use fetch::PacedClient;
use store::Store;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("courtside_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let hub_url = Url::parse(&args.hub_url)?;

    // ---- Store + watermark ----
    let store = Store::connect(&args.database).await?;
    let watermark = match store.latest_game_date().await {
        Ok(date) => {
            info!(%date, "Using last game date as recency watermark");
            Some(date)
        }
        Err(StoreError::MissingWatermark) if args.cold_start => {
            warn!("No game record found; --cold-start set, harvesting everything");
            None
        }
        Err(e) => return Err(e.into()),
    };

    // ---- Index the hub listing ----
    let fetcher = PacedClient::new(
        Duration::from_millis(args.min_interval_ms),
        Duration::from_secs(args.request_timeout_secs),
    )?;
    let listing = harvest::index_top_news(&fetcher, &hub_url).await?;
    let indexed = listing.items.len();
    let skipped_cards = listing.skipped;

    // ---- Recency filter (strictly newer than the watermark) ----
    let fresh = match watermark {
        Some(date) => recency::newer_than(listing.items, date),
        None => listing.items,
    };
    info!(indexed, fresh = fresh.len(), "Filtered listing against watermark");

    // ---- Fetch the top articles ----
    let harvested =
        harvest::fetch_top_articles(&fetcher, fresh, args.cap, args.concurrency).await;

    // ---- Sync ----
    if args.dry_run {
        for h in &harvested {
            info!(
                title = %h.item.title,
                headline = %h.article.headline,
                link = %h.item.link,
                published_at = %h.item.published_at,
                bytes = h.article.body.len(),
                "Dry run: would store article"
            );
        }
        info!(count = harvested.len(), "Dry run complete; store untouched");
    } else {
        store.replace_latest_news(&harvested).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        indexed,
        skipped_cards,
        harvested = harvested.len(),
        "Harvest complete"
    );

    Ok(())
}
