//! Route definitions for collections, pinned items, and results.
//!
//! ```text
//! GET    /                              list_collections
//! POST   /                              create_collection
//! GET    /{id}                          get_collection
//! PUT    /{id}                          update_collection
//! DELETE /{id}                          delete_collection
//! GET    /{id}/items                    list_items
//! POST   /{id}/items                    add_item
//! GET    /{id}/items/{item_id}          get_item
//! PUT    /{id}/items/{item_id}          update_item
//! DELETE /{id}/items/{item_id}          delete_item
//! GET    /{id}/results                  build_collection_results
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::collections;
use crate::state::AppState;

/// Collection routes — mounted at `/collections`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/{id}",
            get(collections::get_collection)
                .put(collections::update_collection)
                .delete(collections::delete_collection),
        )
        .route(
            "/{id}/items",
            get(collections::list_items).post(collections::add_item),
        )
        .route(
            "/{id}/items/{item_id}",
            get(collections::get_item)
                .put(collections::update_item)
                .delete(collections::delete_item),
        )
        .route("/{id}/results", get(collections::build_collection_results))
}
