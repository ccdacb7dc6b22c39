use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::ItemDetail;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailResponse {
    pub stock_code: String,
    pub item_name: String,
    pub category: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub category: String,
    pub items: Vec<ItemDetailResponse>,
    /// One summary line per item, newline-terminated.
    pub text: String,
}

impl ItemDetail {
    pub fn to_response(&self) -> ItemDetailResponse {
        ItemDetailResponse {
            stock_code: self.stock_code.clone(),
            item_name: self.item_name.clone(),
            category: self.category.clone(),
            alternatives: self.alternatives.clone(),
        }
    }
}
