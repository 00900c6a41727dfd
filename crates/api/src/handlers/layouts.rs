//! Handlers for layout management.
//!
//! A layout's `config` payload is validated against the HTTP-cache config
//! handler before it is stored, and defaults are filled in so consumers
//! always see a fully populated object.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mosaic_core::error::CoreError;
use mosaic_core::parameters::{apply_defaults, validate_config, ConfigHandler, HttpCacheConfigHandler};
use mosaic_core::types::DbId;
use mosaic_db::models::layout::{CreateLayout, UpdateLayout};
use mosaic_db::repositories::LayoutRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate a layout config payload and fill in defaults.
fn prepare_config(config: Option<serde_json::Value>) -> AppResult<serde_json::Value> {
    let mut config = match config {
        None => serde_json::Map::new(),
        Some(serde_json::Value::Object(map)) => map,
        Some(_) => {
            return Err(AppError::BadRequest(
                "config must be a JSON object".to_string(),
            ))
        }
    };

    let definitions = HttpCacheConfigHandler.definitions();
    validate_config(&definitions, &config)?;
    apply_defaults(&definitions, &mut config);
    Ok(serde_json::Value::Object(config))
}

// ---------------------------------------------------------------------------
// GET /layouts
// ---------------------------------------------------------------------------

/// List all layouts.
pub async fn list_layouts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = LayoutRepo::list_all(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed layouts");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /layouts
// ---------------------------------------------------------------------------

/// Create a new layout.
pub async fn create_layout(
    State(state): State<AppState>,
    Json(input): Json<CreateLayout>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let config = prepare_config(input.config.clone())?;

    let created = LayoutRepo::create(&state.pool, &input, &config).await?;
    tracing::info!(id = created.id, name = %created.name, "Layout created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /layouts/{id}
// ---------------------------------------------------------------------------

/// Get a single layout by ID.
pub async fn get_layout(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let layout = LayoutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Layout",
            id,
        })?;
    Ok(Json(DataResponse { data: layout }))
}

// ---------------------------------------------------------------------------
// PUT /layouts/{id}
// ---------------------------------------------------------------------------

/// Update a layout. A given `config` replaces the stored one wholesale.
pub async fn update_layout(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLayout>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let config = match &input.config {
        Some(value) => Some(prepare_config(Some(value.clone()))?),
        None => None,
    };

    let updated = LayoutRepo::update(&state.pool, id, &input, config.as_ref())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Layout",
            id,
        })?;
    tracing::info!(id = updated.id, "Layout updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /layouts/{id}
// ---------------------------------------------------------------------------

/// Delete a layout. Rules referencing it fall back to no layout.
pub async fn delete_layout(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !LayoutRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Layout",
            id,
        }
        .into());
    }
    tracing::info!(id, "Layout deleted");
    Ok(StatusCode::NO_CONTENT)
}
