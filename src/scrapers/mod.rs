//! Markup extraction for the harvested news source.
//!
//! Each source module exposes pure parsing functions over fetched page
//! bodies: given bytes, return structured items. Fetching and status
//! gating live in the orchestrator, so everything here is directly
//! testable against canned HTML.
//!
//! # Extraction contract
//!
//! - `parse_listing(html, base)`: hub page → ordered listing items plus a
//!   count of malformed cards that were skipped
//! - `parse_article(html)`: article page → headline and story body, or a
//!   typed extraction error

pub mod apnews;
