//! Inventory store abstraction.
//!
//! [`InventoryStore`] is the only way query logic reaches stored stock data.
//! The production implementation is [`sqlite::SqliteStore`]; handlers see an
//! `Arc<dyn InventoryStore>` from [`crate::state::AppState`], so a different
//! backend only has to implement this trait.
//!
//! Stored rows are written by external tooling and are read-only here.

pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

/// A row of `stock_codes`: identifies an item by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub id: String,
    /// Explicit stock code; older rows only carry it as `id`.
    pub stock_code: Option<String>,
    pub item_name: String,
}

impl StockRecord {
    /// The code used to find this record's [`ItemDetail`].
    pub fn code(&self) -> &str {
        self.stock_code.as_deref().unwrap_or(&self.id)
    }
}

/// A row of `item_details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub stock_code: String,
    pub item_name: String,
    pub category: String,
    /// Alternative item names, in stored order.
    pub alternatives: Vec<String>,
}

impl ItemDetail {
    /// `"<itemName> (Kod: <stockCode>) - Alternatifler: <a>, <b>"`
    pub fn summary(&self) -> String {
        format!(
            "{} (Kod: {}) - Alternatifler: {}",
            self.item_name,
            self.stock_code,
            self.alternatives.join(", ")
        )
    }
}

/// The store could not answer. Distinct from a lookup that found nothing,
/// which is `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only inventory queries.
///
/// Every lookup returns the *first* matching row in storage order; there is
/// no ranking.
#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    /// First record whose normalized item name contains `normalized`.
    ///
    /// `normalized` must already be folded with [`crate::normalize::normalize`];
    /// stored names are folded the same way before comparison.
    async fn find_stock_by_name(&self, normalized: &str)
    -> Result<Option<StockRecord>, StoreError>;

    /// Record whose stock code (or id, when no code is stored) equals `code`,
    /// ignoring ASCII case.
    async fn find_stock_by_code(&self, code: &str) -> Result<Option<StockRecord>, StoreError>;

    /// First detail row whose stock code starts with `code`, ignoring ASCII case.
    async fn find_item_detail(&self, code: &str) -> Result<Option<ItemDetail>, StoreError>;

    /// All detail rows whose normalized category contains `normalized`.
    async fn items_in_category(&self, normalized: &str) -> Result<Vec<ItemDetail>, StoreError>;
}

#[cfg(test)]
pub mod testing {
    //! Store doubles for handler tests.

    use super::*;

    /// Every call fails as if the database were down.
    pub struct UnreachableStore;

    fn outage() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl InventoryStore for UnreachableStore {
        async fn find_stock_by_name(&self, _: &str) -> Result<Option<StockRecord>, StoreError> {
            Err(outage())
        }

        async fn find_stock_by_code(&self, _: &str) -> Result<Option<StockRecord>, StoreError> {
            Err(outage())
        }

        async fn find_item_detail(&self, _: &str) -> Result<Option<ItemDetail>, StoreError> {
            Err(outage())
        }

        async fn items_in_category(&self, _: &str) -> Result<Vec<ItemDetail>, StoreError> {
            Err(outage())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn summary_joins_alternatives() {
        let detail = ItemDetail {
            stock_code: "FISH001".into(),
            item_name: "Somon Fileto".into(),
            category: "Balık".into(),
            alternatives: vec!["Alabalık".into(), "Levrek".into()],
        };
        assert_eq!(
            detail.summary(),
            "Somon Fileto (Kod: FISH001) - Alternatifler: Alabalık, Levrek"
        );
    }

    #[test]
    fn record_code_falls_back_to_id() {
        let mut record = StockRecord {
            id: "FISH002".into(),
            stock_code: None,
            item_name: "Levrek".into(),
        };
        assert_eq!(record.code(), "FISH002");
        record.stock_code = Some("FISH009".into());
        assert_eq!(record.code(), "FISH009");
    }
}
