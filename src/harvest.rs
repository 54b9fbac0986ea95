//! The harvest orchestrator.
//!
//! Two phases, mirroring the indexing/fetching split used by every scraper
//! in this codebase:
//!
//! 1. [`index_top_news`]: fetch the hub page, gate on status, extract the
//!    listing. A non-200 hub response soft-fails to an empty listing and no
//!    article fetch is ever attempted; only a transport failure ends the
//!    run.
//! 2. [`fetch_top_articles`]: take the first `cap` surviving items, fetch
//!    and parse each article over a bounded ordered fan-out, skip failures.
//!
//! The recency filter runs between the two phases, in the top-level run
//! flow, so this module never needs to know where the watermark comes from.

use crate::errors::FetchError;
use crate::fetch::Fetch;
use crate::models::{HarvestedArticle, Listing, ListingItem};
use crate::scrapers::apnews;
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Fetch the hub page and extract its listing.
///
/// Returns an empty listing when the hub responds with anything other than
/// 200. A transport failure is propagated; there is nothing sensible to
/// sync when the hub was never reached.
#[instrument(level = "info", skip(fetcher), fields(%hub_url))]
pub async fn index_top_news<F: Fetch>(fetcher: &F, hub_url: &Url) -> Result<Listing, FetchError> {
    let page = fetcher.fetch(hub_url).await?;
    if page.status != StatusCode::OK {
        warn!(status = %page.status, "Hub page returned non-200; treating as empty listing");
        return Ok(Listing::default());
    }

    let listing = apnews::parse_listing(&page.body, hub_url);
    info!(
        count = listing.items.len(),
        skipped = listing.skipped,
        "Indexed hub listing"
    );
    if listing.skipped > 0 {
        warn!(skipped = listing.skipped, "Some promo cards were malformed");
    }
    Ok(listing)
}

/// Fetch and parse the first `cap` items, preserving listing order.
///
/// Fan-out is bounded by `concurrency`; the shared pacer inside the fetcher
/// keeps the global inter-request interval honest regardless of width.
/// Failed fetches and unparsable articles are logged and skipped without
/// failing the batch.
#[instrument(level = "info", skip(fetcher, items))]
pub async fn fetch_top_articles<F: Fetch>(
    fetcher: &F,
    items: Vec<ListingItem>,
    cap: usize,
    concurrency: usize,
) -> Vec<HarvestedArticle> {
    let results: Vec<Option<HarvestedArticle>> = stream::iter(items.into_iter().take(cap))
        .map(|item| harvest_one(fetcher, item))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let harvested: Vec<HarvestedArticle> = results.into_iter().flatten().collect();
    info!(count = harvested.len(), "Fetched article contents");
    harvested
}

async fn harvest_one<F: Fetch>(fetcher: &F, item: ListingItem) -> Option<HarvestedArticle> {
    let url = item.link.clone();
    let page = match fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, %url, "Article fetch failed; skipping");
            return None;
        }
    };
    if page.status != StatusCode::OK {
        warn!(status = %page.status, %url, "Article returned non-200; skipping");
        return None;
    }
    match apnews::parse_article(&page.body) {
        Ok(article) => {
            debug!(%url, headline = %article.headline, "Harvested article");
            Some(HarvestedArticle { item, article })
        }
        Err(e) => {
            warn!(error = %e, %url, "Article extraction failed; skipping");
            None
        }
    }
}
