//! Politely paced HTTP fetching.
//!
//! A fetch does exactly one outbound GET and reports whatever the transport
//! yields: the fetcher never raises on a non-2xx status, callers branch on
//! it. Politeness is enforced by a [`Pacer`] shared across every fetch in a
//! run: a global minimum interval between requests, honored even when
//! article fetches fan out concurrently. The first request of a run goes
//! out immediately.
//!
//! The [`Fetch`] trait exists so the orchestrator can be exercised against
//! a canned fetcher in tests; [`PacedClient`] is the real implementation.

use crate::errors::FetchError;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, instrument};
use url::Url;

/// A raw HTTP response: status plus body text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: String,
}

/// One paced GET. Transport failures (connect, TLS, timeout) are errors;
/// any response that made it back, whatever its status, is `Ok`.
pub trait Fetch {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Minimum-interval scheduler shared across concurrent fetches.
///
/// Each caller claims the next free send slot under the lock, then sleeps
/// outside it until the slot arrives. Slots are spaced `min_interval`
/// apart, so N concurrent callers serialize into one request per interval
/// rather than stampeding after a shared sleep.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller's send slot arrives. The first caller is not
    /// delayed at all.
    pub async fn wait_turn(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };
        sleep_until(slot).await;
    }
}

/// The production fetcher: a timeout-bounded `reqwest` client behind a
/// shared [`Pacer`].
#[derive(Debug)]
pub struct PacedClient {
    client: reqwest::Client,
    pacer: Pacer,
}

impl PacedClient {
    /// Build a client enforcing `min_interval` between requests and
    /// `timeout` per request.
    pub fn new(min_interval: Duration, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            pacer: Pacer::new(min_interval),
        })
    }
}

impl Fetch for PacedClient {
    #[instrument(level = "debug", skip(self), fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.pacer.wait_turn().await;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        debug!(%status, bytes = body.len(), "Fetched page");
        Ok(FetchedPage { status, body })
    }
}
