use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mosaic_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External content repository (loaders, converters, query runner).
    pub content: Arc<mosaic_content::ContentService>,
}
