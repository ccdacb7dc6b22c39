//! Answers inventory questions with a single Turkish sentence.

use tracing::debug;

use super::intent::StockCodePattern;
use crate::db::{InventoryStore, StockRecord, StoreError};
use crate::normalize::normalize;

/// Compose the reply for an inventory query keyed by `token`.
///
/// - record and details found: `ItemDetail::summary()`
/// - record found, no details: `"<token> için detay bulunamadı."`
/// - nothing found: `"<token> adında bir stok bulunamadı. Başka bir şey sorabilir misiniz?"`
///
/// Store failures propagate; they are never reported as "not found".
pub async fn answer(
    store: &dyn InventoryStore,
    codes: &StockCodePattern,
    token: &str,
) -> Result<String, StoreError> {
    let Some(record) = find_record(store, codes, token).await? else {
        debug!(%token, "no stock record");
        return Ok(not_found(token));
    };

    match store.find_item_detail(record.code()).await? {
        Some(detail) => {
            debug!(%token, stock_code = %detail.stock_code, "stock record with details");
            Ok(detail.summary())
        }
        None => {
            debug!(%token, stock_code = %record.code(), "stock record without details");
            Ok(format!("{token} için detay bulunamadı."))
        }
    }
}

pub fn not_found(token: &str) -> String {
    format!("{token} adında bir stok bulunamadı. Başka bir şey sorabilir misiniz?")
}

/// Code-shaped tokens try an exact code match before the name search.
async fn find_record(
    store: &dyn InventoryStore,
    codes: &StockCodePattern,
    token: &str,
) -> Result<Option<StockRecord>, StoreError> {
    if codes.is_match(token) {
        if let Some(record) = store.find_stock_by_code(token).await? {
            return Ok(Some(record));
        }
    }
    store.find_stock_by_name(&normalize(token)).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::sqlite::fixtures::*;
    use crate::db::testing::UnreachableStore;

    fn codes() -> StockCodePattern {
        StockCodePattern::new("FISH").unwrap()
    }

    #[tokio::test]
    async fn found_item_lists_alternatives() {
        let store = seeded_store().await;
        let text = answer(&store, &codes(), "somon").await.unwrap();
        assert_eq!(
            text,
            "Somon Fileto (Kod: FISH001) - Alternatifler: Alabalık, Levrek"
        );
    }

    #[tokio::test]
    async fn code_token_takes_priority_over_name() {
        let store = seeded_store().await;
        // A name search for "fish002" would hit this label first.
        insert_stock(&store, "X9", None, "fish002 etiketli kutu").await;
        let text = answer(&store, &codes(), "FISH002").await.unwrap();
        assert_eq!(text, "Levrek (Kod: FISH002) - Alternatifler: Çipura");
    }

    #[tokio::test]
    async fn record_without_details_names_the_token() {
        let store = seeded_store().await;
        let text = answer(&store, &codes(), "Çipura").await.unwrap();
        assert_eq!(text, "Çipura için detay bulunamadı.");
    }

    #[tokio::test]
    async fn unknown_item_asks_for_something_else() {
        let store = seeded_store().await;
        let text = answer(&store, &codes(), "merhaba").await.unwrap();
        assert_eq!(
            text,
            "merhaba adında bir stok bulunamadı. Başka bir şey sorabilir misiniz?"
        );
    }

    #[tokio::test]
    async fn outage_is_an_error_not_a_miss() {
        let err = answer(&UnreachableStore, &codes(), "somon").await;
        assert!(matches!(err, Err(StoreError::Database(_))));
    }
}
