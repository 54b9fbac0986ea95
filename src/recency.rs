//! Recency watermark filtering.
//!
//! The watermark is a date-only value owned by the store (the most recent
//! recorded game date). Listing timestamps are full UTC instants, so the
//! watermark is anchored at UTC midnight of its day before comparing.
//! Strictly-newer wins: an item published exactly at the watermark instant
//! counts as already seen.

use crate::models::ListingItem;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Anchor a date-only watermark at UTC midnight.
pub fn watermark_instant(watermark: NaiveDate) -> DateTime<Utc> {
    watermark.and_time(NaiveTime::MIN).and_utc()
}

/// Keep only items published strictly after the watermark.
///
/// Pure and order-preserving: the output is a subsequence of the input,
/// nothing is reordered or fabricated.
pub fn newer_than(items: Vec<ListingItem>, watermark: NaiveDate) -> Vec<ListingItem> {
    let cutoff = watermark_instant(watermark);
    items
        .into_iter()
        .filter(|item| item.published_at > cutoff)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use url::Url;

    fn item(title: &str, millis: i64) -> ListingItem {
        ListingItem {
            title: title.to_string(),
            published_at: Utc.timestamp_millis_opt(millis).unwrap(),
            link: Url::parse("https://apnews.com/article/x").unwrap(),
            image_url: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // 2024-01-09 / 10 / 12 at 00:00:00 UTC, in epoch millis.
    const JAN_09: i64 = 1_704_758_400_000;
    const JAN_10: i64 = 1_704_844_800_000;
    const JAN_12: i64 = 1_705_017_600_000;

    #[test]
    fn test_tie_at_watermark_is_excluded() {
        let items = vec![item("older", JAN_10), item("newest", JAN_12), item("oldest", JAN_09)];
        let kept = newer_than(items, date("2024-01-10"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "newest");
    }

    #[test]
    fn test_output_is_an_order_preserving_subsequence() {
        let items = vec![
            item("a", JAN_12),
            item("b", JAN_09),
            item("c", JAN_12 + 5_000),
            item("d", JAN_10),
        ];
        let kept = newer_than(items, date("2024-01-10"));
        let titles: Vec<_> = kept.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["a", "c"]);
    }

    #[test]
    fn test_one_millisecond_past_midnight_survives() {
        let kept = newer_than(vec![item("barely", JAN_10 + 1)], date("2024-01-10"));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(newer_than(Vec::new(), date("2024-01-10")).is_empty());
    }

    #[test]
    fn test_watermark_anchors_at_utc_midnight() {
        let instant = watermark_instant(date("2024-01-10"));
        assert_eq!(instant.timestamp_millis(), JAN_10);
    }
}
