//! Shared query parameter types for API handlers.

use serde::Deserialize;
use validator::Validate;

/// Paging overrides for the collection results endpoint (`?offset=&limit=`).
///
/// When absent, the collection's stored `start_offset` / `item_limit` apply.
/// Validated with the same range rules as the stored DTO fields.
#[derive(Debug, Deserialize, Validate)]
pub struct ResultPagingParams {
    #[validate(range(min = 0))]
    pub offset: Option<i32>,
    #[validate(range(min = 1))]
    pub limit: Option<i32>,
}
