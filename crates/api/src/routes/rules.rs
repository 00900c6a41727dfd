//! Route definitions for rules, their bindings, and resolution.
//!
//! ```text
//! GET    /                                  list_rules
//! POST   /                                  create_rule
//! POST   /resolve                           resolve
//! GET    /{id}                              get_rule
//! PUT    /{id}                              update_rule
//! DELETE /{id}                              delete_rule
//! POST   /{id}/targets                      add_target
//! DELETE /{id}/targets/{target_id}          delete_target
//! POST   /{id}/conditions                   add_condition
//! DELETE /{id}/conditions/{condition_id}    delete_condition
//! ```
//!
//! `/resolve` is registered before `/{id}` so the literal segment wins.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

/// Rule routes — mounted at `/rules`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rules::list_rules).post(rules::create_rule))
        .route("/resolve", post(rules::resolve))
        .route(
            "/{id}",
            get(rules::get_rule)
                .put(rules::update_rule)
                .delete(rules::delete_rule),
        )
        .route("/{id}/targets", post(rules::add_target))
        .route("/{id}/targets/{target_id}", delete(rules::delete_target))
        .route("/{id}/conditions", post(rules::add_condition))
        .route(
            "/{id}/conditions/{condition_id}",
            delete(rules::delete_condition),
        )
}
