//! Handlers for collections, their pinned items, and result building.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use mosaic_core::collection::{build_results, ManualItem, ResultEntry};
use mosaic_core::error::CoreError;
use mosaic_core::items::CmsItem;
use mosaic_core::types::DbId;
use mosaic_db::models::collection::{
    Collection, CollectionItem, CreateCollection, CreateCollectionItem, UpdateCollection,
    UpdateCollectionItem,
};
use mosaic_db::repositories::{CollectionRepo, ItemRepo};

use crate::error::{AppError, AppResult};
use crate::query::ResultPagingParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a collection exists, returning the full row.
async fn ensure_collection_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Collection> {
    CollectionRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        })
    })
}

/// A contextual query without a query type cannot be executed.
fn check_query_consistency(
    query_type: Option<&str>,
    is_contextual: Option<bool>,
) -> AppResult<()> {
    if is_contextual == Some(true) && query_type.is_none() {
        return Err(AppError::BadRequest(
            "is_contextual requires a query_type".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /collections
// ---------------------------------------------------------------------------

/// List all collections.
pub async fn list_collections(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = CollectionRepo::list_all(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed collections");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /collections
// ---------------------------------------------------------------------------

/// Create a new collection.
pub async fn create_collection(
    State(state): State<AppState>,
    Json(input): Json<CreateCollection>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    check_query_consistency(input.query_type.as_deref(), input.is_contextual)?;

    let created = CollectionRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Collection created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /collections/{id}
// ---------------------------------------------------------------------------

/// Get a single collection by ID.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let collection = ensure_collection_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: collection }))
}

// ---------------------------------------------------------------------------
// PUT /collections/{id}
// ---------------------------------------------------------------------------

/// Update a collection.
pub async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollection>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = ensure_collection_exists(&state.pool, id).await?;
    let effective_query_type = input
        .query_type
        .clone()
        .or_else(|| existing.query_type.clone());
    check_query_consistency(
        effective_query_type.as_deref(),
        input.is_contextual.or(Some(existing.is_contextual)),
    )?;

    let updated = CollectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collection",
            id,
        })?;
    tracing::info!(id = updated.id, "Collection updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /collections/{id}
// ---------------------------------------------------------------------------

/// Delete a collection and its items.
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CollectionRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Collection",
            id,
        }
        .into());
    }
    tracing::info!(id, "Collection deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /collections/{id}/items
// ---------------------------------------------------------------------------

/// List a collection's pinned items in position order.
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_collection_exists(&state.pool, id).await?;
    let items = ItemRepo::list_for_collection(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /collections/{id}/items
// ---------------------------------------------------------------------------

/// Pin an item into a collection.
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCollectionItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_collection_exists(&state.pool, id).await?;

    let created = ItemRepo::create(&state.pool, id, &input).await?;
    tracing::info!(
        collection_id = id,
        item_id = created.id,
        position = created.position,
        "Item pinned"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /collections/{id}/items/{item_id}
// ---------------------------------------------------------------------------

/// A pinned item together with its resolved CMS value and public URL.
#[derive(Debug, Serialize)]
pub struct ResolvedItem {
    #[serde(flatten)]
    pub item: CollectionItem,
    pub cms_item: CmsItem,
    pub url: String,
}

/// Get a pinned item with its backing CMS value resolved through the
/// loader, converter, and URL generator for its value type.
pub async fn get_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_by_id(&state.pool, id, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;

    let cms_item = state.content.load_item(&item.value_type, item.value_id).await?;
    let url = state.content.item_url(&cms_item)?;

    Ok(Json(DataResponse {
        data: ResolvedItem {
            item,
            cms_item,
            url,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /collections/{id}/items/{item_id}
// ---------------------------------------------------------------------------

/// Update a pinned item's position or visibility.
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCollectionItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let updated = ItemRepo::update(&state.pool, id, item_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    tracing::info!(collection_id = id, item_id, "Item updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /collections/{id}/items/{item_id}
// ---------------------------------------------------------------------------

/// Unpin an item from a collection.
pub async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !ItemRepo::delete(&state.pool, id, item_id).await? {
        return Err(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }
        .into());
    }
    tracing::info!(collection_id = id, item_id, "Item removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /collections/{id}/results
// ---------------------------------------------------------------------------

/// Build the ordered result set for a collection.
///
/// Runs the dynamic query (if any) through the content service, resolves
/// pinned items to their CMS values, and merges both through the core
/// builder. Query failures propagate; there is no retry.
pub async fn build_collection_results(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(paging): Query<ResultPagingParams>,
) -> AppResult<impl IntoResponse> {
    paging.validate()?;
    let collection = ensure_collection_exists(&state.pool, id).await?;
    let stored_items = ItemRepo::list_for_collection(&state.pool, id).await?;

    let offset = paging.offset.unwrap_or(collection.start_offset);
    let limit = paging.limit.or(collection.item_limit);

    let mut manual = Vec::with_capacity(stored_items.len());
    for stored in &stored_items {
        if !stored.visible {
            continue;
        }
        let item = state
            .content
            .load_item(&stored.value_type, stored.value_id)
            .await?;
        manual.push(ManualItem {
            position: stored.position,
            visible: stored.visible,
            item,
        });
    }

    let query_values = match &collection.query_type {
        Some(query_type) => {
            state
                .content
                .run_query(query_type, &collection.query_params, offset, limit)
                .await?
        }
        None => Vec::new(),
    };

    let contextual = collection.is_contextual && collection.query_type.is_some();
    let results: Vec<ResultEntry> = build_results(&manual, &query_values, contextual, limit);
    tracing::debug!(collection_id = id, count = results.len(), "Built collection results");

    Ok(Json(DataResponse { data: results }))
}
