//! Error taxonomy for the harvesting pipeline.
//!
//! Three families, one per external boundary:
//! - [`FetchError`]: the HTTP transport failed outright. A non-2xx response
//!   is *not* a `FetchError`; the fetcher hands back whatever status the
//!   server produced and callers gate on it.
//! - [`ExtractError`]: a required element was missing from an article page.
//!   Malformed listing cards are not errors either; they are skipped and
//!   counted by the listing extractor.
//! - [`StoreError`]: database failures, plus the watermark conditions the
//!   run flow must distinguish from ordinary query errors.

use thiserror::Error;

/// Transport-level fetch failure (connection, TLS, timeout).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A required element was absent from an article page.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page has no top-level `h1` headline.
    #[error("article page has no headline")]
    MissingHeadline,

    /// The page has no rich story body container; the body text
    /// cannot be synthesized from anything else.
    #[error("article page has no story body container")]
    MissingStoryBody,
}

/// Store failures, including the two watermark conditions the caller
/// must branch on explicitly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No game record exists to derive a watermark from.
    #[error("no game record found; cannot derive a recency watermark")]
    MissingWatermark,

    /// The stored game date did not parse as `YYYY-MM-DD`.
    #[error("unparsable game date in store: {0:?}")]
    BadWatermark(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
