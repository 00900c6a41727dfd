//! High-level facade over the registry and query runner.

use std::sync::Arc;

use serde_json::Value;

use mosaic_core::items::CmsItem;
use mosaic_core::types::DbId;

use crate::error::ContentError;
use crate::registry::{ContentRegistry, QueryRunner};

/// Everything the API layer needs to talk to the external CMS: value
/// loading/conversion, URL generation, and dynamic query execution.
pub struct ContentService {
    registry: ContentRegistry,
    runner: Arc<dyn QueryRunner>,
}

impl ContentService {
    pub fn new(registry: ContentRegistry, runner: Arc<dyn QueryRunner>) -> Self {
        Self { registry, runner }
    }

    /// Load an external value and convert it into item shape.
    pub async fn load_item(&self, value_type: &str, value_id: DbId) -> Result<CmsItem, ContentError> {
        let loader = self.registry.loader(value_type)?;
        let converter = self.registry.converter(value_type)?;
        let raw = loader.load(value_id).await?;
        converter.convert(&raw)
    }

    /// Generate the public URL of a resolved item.
    pub fn item_url(&self, item: &CmsItem) -> Result<String, ContentError> {
        let generator = self.registry.url_generator(&item.value_type)?;
        Ok(generator.generate(item))
    }

    /// Value types this deployment can load, for diagnostics.
    pub fn value_types(&self) -> Vec<String> {
        self.registry.value_types()
    }

    /// Run one page of a collection's dynamic query.
    ///
    /// Errors propagate to the caller unchanged; the service adds no retry
    /// or caching layer.
    pub async fn run_query(
        &self,
        query_type: &str,
        params: &Value,
        offset: i32,
        limit: Option<i32>,
    ) -> Result<Vec<CmsItem>, ContentError> {
        self.runner.run(query_type, params, offset, limit).await
    }
}
