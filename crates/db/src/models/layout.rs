//! Layout entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mosaic_core::types::{DbId, Timestamp};

/// A row from the `layouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Layout {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub shared: bool,
    /// Validated against the HTTP-cache config handler at the API boundary.
    pub config: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new layout.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLayout {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub shared: Option<bool>,
    pub config: Option<serde_json::Value>,
}

/// DTO for updating a layout. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLayout {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub shared: Option<bool>,
    pub config: Option<serde_json::Value>,
}
