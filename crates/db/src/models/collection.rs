//! Collection and collection item entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mosaic_core::types::{DbId, Timestamp};

/// A row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    /// Offset into the dynamic query results.
    pub start_offset: i32,
    /// Maximum number of result slots; unlimited when absent.
    pub item_limit: Option<i32>,
    /// Dynamic query identifier; `None` for purely manual collections.
    pub query_type: Option<String>,
    pub query_params: serde_json::Value,
    /// Whether the query depends on the current request context.
    pub is_contextual: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `collection_items` table: a manually pinned reference to
/// an external content value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectionItem {
    pub id: DbId,
    pub collection_id: DbId,
    pub position: i32,
    pub value_id: DbId,
    pub value_type: String,
    pub visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new collection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollection {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0))]
    pub start_offset: Option<i32>,
    #[validate(range(min = 1))]
    pub item_limit: Option<i32>,
    pub query_type: Option<String>,
    pub query_params: Option<serde_json::Value>,
    pub is_contextual: Option<bool>,
}

/// DTO for updating a collection. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCollection {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub start_offset: Option<i32>,
    #[validate(range(min = 1))]
    pub item_limit: Option<i32>,
    pub query_type: Option<String>,
    pub query_params: Option<serde_json::Value>,
    pub is_contextual: Option<bool>,
}

/// DTO for adding an item to a collection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollectionItem {
    #[validate(range(min = 0))]
    pub position: i32,
    pub value_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub value_type: String,
    pub visible: Option<bool>,
}

/// DTO for updating a collection item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCollectionItem {
    #[validate(range(min = 0))]
    pub position: Option<i32>,
    pub visible: Option<bool>,
}
