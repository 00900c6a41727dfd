//! In-memory item shape shared by collections and the content layer.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Name used for slot placeholders and values the CMS cannot resolve.
pub const UNKNOWN_ITEM_NAME: &str = "(UNKNOWN ITEM)";

/// A resolved content value in the shape collection results are rendered
/// from. Produced by value converters and query runners; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsItem {
    /// External value id (0 for placeholders).
    pub value: DbId,
    /// Value type the item was loaded through, e.g. `remote`.
    pub value_type: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the value is visible in the CMS.
    pub visible: bool,
}

impl CmsItem {
    /// Placeholder item substituted when a contextual query yields nothing,
    /// so downstream rendering always has a stable shape.
    pub fn slot() -> Self {
        Self {
            value: 0,
            value_type: "null".to_string(),
            name: UNKNOWN_ITEM_NAME.to_string(),
            visible: true,
        }
    }
}
