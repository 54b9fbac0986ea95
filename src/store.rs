//! SQLite persistence for the harvest run.
//!
//! The store owns two concerns at the pipeline boundary:
//!
//! - the recency watermark, read from the externally owned `games` table
//!   (most recent `game_date`, a `YYYY-MM-DD` string); this module never
//!   writes to `games`
//! - the `latest_news` destination collection, replaced wholesale on every
//!   successful run
//!
//! The replace is delete-then-insert inside a single transaction, so a
//! failed insert rolls the delete back and readers never observe a
//! half-written set.

use crate::errors::StoreError;
use crate::models::HarvestedArticle;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, instrument};

/// Handle to the stats database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `url`, e.g.
    /// `sqlite:courtside.db` or `sqlite::memory:`.
    ///
    /// The pool is capped at one connection: every write in this pipeline
    /// is serialized anyway, and a single connection keeps in-memory
    /// databases coherent.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Database)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `latest_news` table if it does not exist. The `games`
    /// table belongs to the stats ingest jobs and is never created here.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS latest_news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                headline TEXT NOT NULL,
                published_at TEXT NOT NULL,
                link TEXT NOT NULL,
                image_url TEXT,
                body TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The recency watermark: the date of the most recent recorded game.
    ///
    /// A missing record and an unparsable date are distinct errors; the
    /// run flow decides whether either is fatal.
    #[instrument(level = "debug", skip(self))]
    pub async fn latest_game_date(&self) -> Result<NaiveDate, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT game_date FROM games ORDER BY game_date DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;
        let raw = row.ok_or(StoreError::MissingWatermark)?.0;
        NaiveDate::from_str(&raw).map_err(|_| StoreError::BadWatermark(raw))
    }

    /// Replace the `latest_news` collection with `articles`, atomically.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn replace_latest_news(
        &self,
        articles: &[HarvestedArticle],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM latest_news").execute(&mut *tx).await?;
        for h in articles {
            sqlx::query(
                "INSERT INTO latest_news (title, headline, published_at, link, image_url, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&h.item.title)
            .bind(&h.article.headline)
            .bind(h.item.published_at.to_rfc3339())
            .bind(h.item.link.as_str())
            .bind(h.item.image_url.as_ref().map(|u| u.as_str()))
            .bind(&h.article.body)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        info!(count = articles.len(), "Replaced latest_news");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, ListingItem};
    use chrono::{TimeZone, Utc};
    use url::Url;

    async fn memory_store() -> Store {
        Store::connect("sqlite::memory:").await.unwrap()
    }

    async fn seed_games(store: &Store, dates: &[&str]) {
        sqlx::query("CREATE TABLE IF NOT EXISTS games (id INTEGER PRIMARY KEY, game_date TEXT)")
            .execute(&store.pool)
            .await
            .unwrap();
        for d in dates {
            sqlx::query("INSERT INTO games (game_date) VALUES (?1)")
                .bind(d)
                .execute(&store.pool)
                .await
                .unwrap();
        }
    }

    fn harvested(title: &str) -> HarvestedArticle {
        HarvestedArticle {
            item: ListingItem {
                title: title.to_string(),
                published_at: Utc.timestamp_millis_opt(1_705_017_600_000).unwrap(),
                link: Url::parse("https://apnews.com/article/x").unwrap(),
                image_url: None,
            },
            article: Article {
                headline: format!("{title} headline"),
                body: "body".to_string(),
            },
        }
    }

    async fn count_news(store: &Store) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM latest_news")
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_watermark_is_most_recent_game_date() {
        let store = memory_store().await;
        seed_games(&store, &["2024-01-08", "2024-01-12", "2024-01-10"]).await;
        let date = store.latest_game_date().await.unwrap();
        assert_eq!(date, "2024-01-12".parse::<NaiveDate>().unwrap());
    }

    #[tokio::test]
    async fn test_missing_game_record_is_a_distinct_error() {
        let store = memory_store().await;
        seed_games(&store, &[]).await;
        assert!(matches!(
            store.latest_game_date().await,
            Err(StoreError::MissingWatermark)
        ));
    }

    #[tokio::test]
    async fn test_unparsable_game_date_is_surfaced() {
        let store = memory_store().await;
        seed_games(&store, &["01/12/2024"]).await;
        match store.latest_game_date().await {
            Err(StoreError::BadWatermark(raw)) => assert_eq!(raw, "01/12/2024"),
            other => panic!("expected BadWatermark, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_replace_clears_previous_set() {
        let store = memory_store().await;
        store
            .replace_latest_news(&[harvested("a"), harvested("b"), harvested("c")])
            .await
            .unwrap();
        assert_eq!(count_news(&store).await, 3);

        store.replace_latest_news(&[harvested("d")]).await.unwrap();
        assert_eq!(count_news(&store).await, 1);
        let title: String = sqlx::query_scalar("SELECT title FROM latest_news")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(title, "d");
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_empties_the_table() {
        let store = memory_store().await;
        store.replace_latest_news(&[harvested("a")]).await.unwrap();
        store.replace_latest_news(&[]).await.unwrap();
        assert_eq!(count_news(&store).await, 0);
    }

    #[tokio::test]
    async fn test_stored_row_preserves_pairing() {
        let store = memory_store().await;
        store.replace_latest_news(&[harvested("pair")]).await.unwrap();
        let (title, headline, link): (String, String, String) = sqlx::query_as(
            "SELECT title, headline, link FROM latest_news",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(title, "pair");
        assert_eq!(headline, "pair headline");
        assert_eq!(link, "https://apnews.com/article/x");
    }
}
