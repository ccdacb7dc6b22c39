//! Read-only inventory lookups outside the chat flow.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use stockchat_types::ErrorBody;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::normalize::normalize;
use crate::schemas::stock::{CategoryResponse, ItemDetailResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_category, get_item),
    components(schemas(CategoryResponse, ItemDetailResponse))
)]
pub struct StockApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stock/categories/{category}", get(get_category))
        .route("/stock/items/{code}", get(get_item))
}

/// Every item whose category contains `category` (accent- and case-insensitive).
#[utoipa::path(
    get,
    path = "/api/stock/categories/{category}",
    tag = "stock",
    params(("category" = String, Path, description = "Category name or fragment")),
    responses(
        (status = 200, description = "Matching items, possibly none", body = CategoryResponse),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let items = state.store.items_in_category(&normalize(&category)).await?;
    let text: String = items.iter().map(|d| d.summary() + "\n").collect();
    Ok(Json(CategoryResponse {
        category,
        items: items.iter().map(|d| d.to_response()).collect(),
        text,
    }))
}

/// Item detail for the first stock code starting with `code`.
#[utoipa::path(
    get,
    path = "/api/stock/items/{code}",
    tag = "stock",
    params(("code" = String, Path, description = "Stock code or prefix")),
    responses(
        (status = 200, description = "Item found", body = ItemDetailResponse),
        (status = 404, description = "No such item", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ItemDetailResponse>, ServerError> {
    state
        .store
        .find_item_detail(&code)
        .await?
        .map(|d| Json(d.to_response()))
        .ok_or_else(|| ServerError::NotFound(format!("{code} kodlu ürün bulunamadı")))
}
