//! SQLite implementation of [`InventoryStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are embedded at compile
//! time from `./migrations` (relative to `CARGO_MANIFEST_DIR`) and run by
//! [`SqliteStore::connect`].
//!
//! Name and category matching folds both sides with
//! [`normalize`](crate::normalize::normalize), which SQLite's ASCII-only
//! `lower()`/`LIKE` cannot do, so those scans filter rows in Rust and stop at
//! the first hit.

use std::str::FromStr;

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{InventoryStore, ItemDetail, StockRecord, StoreError};
use crate::normalize::normalize;

type StockRow = (String, Option<String>, String);
type DetailRow = (String, String, String, String);

/// Pooled SQLite inventory store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `url`, creating the pool and running pending
    /// migrations.
    ///
    /// `url` is a sqlx SQLite URL, e.g. `"sqlite://stockchat.db?mode=rwc"` or
    /// `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(Self { pool })
    }

    /// Underlying pool, for maintenance tasks and test fixtures.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection; pending queries finish first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_record((id, stock_code, item_name): StockRow) -> StockRecord {
    StockRecord {
        id,
        stock_code,
        item_name,
    }
}

fn to_detail((stock_code, item_name, category, alternatives): DetailRow) -> ItemDetail {
    let alternatives = serde_json::from_str::<Vec<String>>(&alternatives).unwrap_or_else(|e| {
        tracing::warn!(stock_code = %stock_code, raw = %alternatives, error = %e, "failed to parse alternatives; using none");
        Vec::new()
    });
    ItemDetail {
        stock_code,
        item_name,
        category,
        alternatives,
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn find_stock_by_name(
        &self,
        normalized: &str,
    ) -> Result<Option<StockRecord>, StoreError> {
        let mut rows = sqlx::query_as::<_, StockRow>(
            "SELECT id, stock_code, item_name FROM stock_codes ORDER BY rowid",
        )
        .fetch(&self.pool);

        while let Some(row) = rows.try_next().await? {
            if normalize(&row.2).contains(normalized) {
                return Ok(Some(to_record(row)));
            }
        }
        Ok(None)
    }

    async fn find_stock_by_code(&self, code: &str) -> Result<Option<StockRecord>, StoreError> {
        let row: Option<StockRow> = sqlx::query_as(
            "SELECT id, stock_code, item_name FROM stock_codes \
             WHERE lower(coalesce(stock_code, id)) = lower(?1) \
             ORDER BY rowid LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(to_record))
    }

    async fn find_item_detail(&self, code: &str) -> Result<Option<ItemDetail>, StoreError> {
        if code.is_empty() {
            return Ok(None);
        }
        let row: Option<DetailRow> = sqlx::query_as(
            "SELECT stock_code, item_name, category, alternatives FROM item_details \
             WHERE substr(lower(stock_code), 1, length(?1)) = lower(?1) \
             ORDER BY rowid LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(to_detail))
    }

    async fn items_in_category(&self, normalized: &str) -> Result<Vec<ItemDetail>, StoreError> {
        let rows: Vec<DetailRow> = sqlx::query_as(
            "SELECT stock_code, item_name, category, alternatives FROM item_details ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .filter(|row| normalize(&row.2).contains(normalized))
            .map(to_detail)
            .collect())
    }
}

#[cfg(test)]
pub mod fixtures {
    //! Seed helpers shared by store and router tests.

    use super::*;

    pub async fn insert_stock(
        store: &SqliteStore,
        id: &str,
        stock_code: Option<&str>,
        item_name: &str,
    ) {
        sqlx::query("INSERT INTO stock_codes (id, stock_code, item_name) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(stock_code)
            .bind(item_name)
            .execute(store.pool())
            .await
            .unwrap();
    }

    pub async fn insert_detail(
        store: &SqliteStore,
        stock_code: &str,
        item_name: &str,
        category: &str,
        alternatives: &[&str],
    ) {
        sqlx::query(
            "INSERT INTO item_details (stock_code, item_name, category, alternatives) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(stock_code)
        .bind(item_name)
        .bind(category)
        .bind(serde_json::to_string(alternatives).unwrap())
        .execute(store.pool())
        .await
        .unwrap();
    }

    /// In-memory store with a small fish catalogue.
    pub async fn seeded_store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
        insert_stock(&store, "FISH001", Some("FISH001"), "Somon Fileto").await;
        insert_stock(&store, "FISH002", None, "Levrek").await;
        insert_stock(&store, "FISH003", Some("FISH003"), "Çipura").await;
        insert_stock(&store, "SEA001", Some("SEA001"), "Karides").await;
        insert_detail(&store, "FISH001", "Somon Fileto", "Balık", &["Alabalık", "Levrek"]).await;
        insert_detail(&store, "FISH002", "Levrek", "Balık", &["Çipura"]).await;
        insert_detail(&store, "SEA001", "Karides", "Deniz Ürünleri", &["Kalamar"]).await;
        store
    }
}
