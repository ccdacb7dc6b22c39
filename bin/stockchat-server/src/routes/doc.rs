use utoipa::OpenApi;

use super::{chat::ChatApi, health::HealthApi, stock::StockApi};

/// Document root; each route module contributes its own paths.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "stockchat",
        description = "Inventory-aware chat assistant. Replies stream as Server-Sent Events."
    ),
    tags(
        (name = "chat", description = "Chat replies as text/event-stream"),
        (name = "stock", description = "Direct inventory lookups"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    [HealthApi::openapi(), ChatApi::openapi(), StockApi::openapi()]
        .into_iter()
        .fold(ApiDoc::openapi(), |mut doc, part| {
            doc.merge(part);
            doc
        })
}
