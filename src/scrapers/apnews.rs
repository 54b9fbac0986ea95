//! AP News hub and article page extraction.
//!
//! The hub page lists stories as `div.PagePromo` promotional cards. A
//! well-formed card carries an `h3` heading, a `bsp-timestamp` element with
//! an epoch-millis `data-timestamp` attribute, and an anchor link; a
//! promotional image is optional. Article pages carry their headline in the
//! single top-level `h1` and the full text in a `div.RichTextStoryBody`
//! container.
//!
//! Card hrefs are sometimes relative, so every link is resolved against the
//! hub's base URL before it leaves this module.

use crate::errors::ExtractError;
use crate::models::{Article, Listing, ListingItem};
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.PagePromo").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static TIMESTAMP: Lazy<Selector> =
    Lazy::new(|| Selector::parse("bsp-timestamp[data-timestamp]").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static STORY_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.RichTextStoryBody").unwrap());

/// Parse a hub page body into listing items, document order preserved.
///
/// Cards missing a required field (heading, timestamp, link) or carrying an
/// unparsable timestamp are skipped, not fatal; the skip count is reported
/// in the returned [`Listing`] so callers can log markup drift.
pub fn parse_listing(html: &str, base: &Url) -> Listing {
    let document = Html::parse_document(html);
    let mut listing = Listing::default();
    for card in document.select(&CARD) {
        match parse_card(card, base) {
            Some(item) => listing.items.push(item),
            None => {
                listing.skipped += 1;
                warn!("Skipping malformed promo card");
            }
        }
    }
    listing
}

fn parse_card(card: ElementRef<'_>, base: &Url) -> Option<ListingItem> {
    let title = card
        .select(&HEADING)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())?;

    let millis: i64 = card
        .select(&TIMESTAMP)
        .next()
        .and_then(|el| el.value().attr("data-timestamp"))?
        .trim()
        .parse()
        .ok()?;
    let published_at = Utc.timestamp_millis_opt(millis).single()?;

    let link = card
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok())?;

    let image_url = card
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| base.join(src).ok());

    Some(ListingItem {
        title,
        published_at,
        link,
        image_url,
    })
}

/// Parse an article page into its headline and story body text.
///
/// Text nodes inside the story body container are trimmed and joined with
/// newlines. Either element being absent is a typed error; body text
/// cannot be synthesized from anything else on the page.
pub fn parse_article(html: &str) -> Result<Article, ExtractError> {
    let document = Html::parse_document(html);

    let headline = document
        .select(&HEADLINE)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::MissingHeadline)?;

    let body_el = document
        .select(&STORY_BODY)
        .next()
        .ok_or(ExtractError::MissingStoryBody)?;
    let body = body_el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Article { headline, body })
}
