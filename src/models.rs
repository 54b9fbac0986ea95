//! Data models for harvested news items.
//!
//! This module defines the core data structures flowing through the pipeline:
//! - [`ListingItem`]: a summary record extracted from a hub-page card
//! - [`Listing`]: the full extraction result, including the malformed-card count
//! - [`Article`]: the parsed full text of a single article page
//! - [`HarvestedArticle`]: a listing item paired with its fetched article
//!
//! All of these are transient: created per run, handed to the store, and
//! discarded. Nothing is cached across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A news-item summary extracted from one promotional card on the hub page.
///
/// Items preserve document order, which on the AP hub is most-recent-first.
/// The `link` is always absolute: relative hrefs are resolved against the
/// hub origin at extraction time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListingItem {
    /// The headline text, trimmed of surrounding whitespace.
    pub title: String,
    /// Publication instant, millisecond precision, from the card's
    /// epoch-millis timestamp attribute.
    pub published_at: DateTime<Utc>,
    /// Absolute URL of the article page.
    pub link: Url,
    /// Promotional image, when the card carries one.
    pub image_url: Option<Url>,
}

/// Result of extracting a hub page: the well-formed items plus a count of
/// cards that were skipped for missing a required field.
#[derive(Debug, Default)]
pub struct Listing {
    pub items: Vec<ListingItem>,
    /// Cards dropped because a heading, timestamp, or link was absent or
    /// unparsable. Surfaced so the caller can log extraction drift.
    pub skipped: usize,
}

/// The parsed content of a single article page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// The page's top-level headline.
    pub headline: String,
    /// Text content of the story body container.
    pub body: String,
}

/// A successfully harvested article, paired with the listing item it came
/// from so the link, timestamp, and image survive into the store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarvestedArticle {
    pub item: ListingItem,
    pub article: Article,
}
