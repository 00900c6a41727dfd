//! Route definitions for layout management.
//!
//! ```text
//! GET    /          list_layouts
//! POST   /          create_layout
//! GET    /{id}      get_layout
//! PUT    /{id}      update_layout
//! DELETE /{id}      delete_layout
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::layouts;
use crate::state::AppState;

/// Layout routes — mounted at `/layouts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(layouts::list_layouts).post(layouts::create_layout))
        .route(
            "/{id}",
            get(layouts::get_layout)
                .put(layouts::update_layout)
                .delete(layouts::delete_layout),
        )
}
