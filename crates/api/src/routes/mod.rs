pub mod collections;
pub mod health;
pub mod layouts;
pub mod rules;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /layouts                                   list, create
/// /layouts/{id}                              get, update, delete
///
/// /rules                                     list, create
/// /rules/resolve                             resolve a request context (POST)
/// /rules/{id}                                get, update, delete
/// /rules/{id}/targets                        add target (POST)
/// /rules/{id}/targets/{target_id}            delete target
/// /rules/{id}/conditions                     add condition (POST)
/// /rules/{id}/conditions/{condition_id}      delete condition
///
/// /collections                               list, create
/// /collections/{id}                          get, update, delete
/// /collections/{id}/items                    list, add
/// /collections/{id}/items/{item_id}          get, update, delete
/// /collections/{id}/results                  build results (?offset, ?limit)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Layout definitions referenced by rules.
        .nest("/layouts", layouts::router())
        // Rules, their targets/conditions, and context resolution.
        .nest("/rules", rules::router())
        // Collections, pinned items, and result building.
        .nest("/collections", collections::router())
}
