//! Value-type registries and the traits they dispatch to.
//!
//! Each value type (e.g. `remote`) registers a loader, a converter, and a
//! URL generator. Lookups for unregistered value types fail with the
//! corresponding [`CoreError`] so a misconfigured deployment surfaces loudly
//! instead of silently dropping items.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use mosaic_core::error::CoreError;
use mosaic_core::items::CmsItem;
use mosaic_core::types::DbId;

use crate::error::ContentError;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Loads the raw payload of an external value by id.
#[async_trait]
pub trait ValueLoader: Send + Sync {
    async fn load(&self, value_id: DbId) -> Result<Value, ContentError>;
}

/// Converts a raw value payload into the item shape collections render from.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, raw: &Value) -> Result<CmsItem, ContentError>;
}

/// Generates the public URL of a resolved item.
pub trait ValueUrlGenerator: Send + Sync {
    fn generate(&self, item: &CmsItem) -> String;
}

/// Executes a collection's dynamic query and returns one page of items.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(
        &self,
        query_type: &str,
        params: &Value,
        offset: i32,
        limit: Option<i32>,
    ) -> Result<Vec<CmsItem>, ContentError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Per value-type registry of loaders, converters, and URL generators.
#[derive(Default)]
pub struct ContentRegistry {
    loaders: HashMap<String, Arc<dyn ValueLoader>>,
    converters: HashMap<String, Arc<dyn ValueConverter>>,
    url_generators: HashMap<String, Arc<dyn ValueUrlGenerator>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_loader(&mut self, value_type: &str, loader: Arc<dyn ValueLoader>) {
        self.loaders.insert(value_type.to_string(), loader);
    }

    pub fn register_converter(&mut self, value_type: &str, converter: Arc<dyn ValueConverter>) {
        self.converters.insert(value_type.to_string(), converter);
    }

    pub fn register_url_generator(
        &mut self,
        value_type: &str,
        generator: Arc<dyn ValueUrlGenerator>,
    ) {
        self.url_generators.insert(value_type.to_string(), generator);
    }

    pub fn loader(&self, value_type: &str) -> Result<&Arc<dyn ValueLoader>, CoreError> {
        self.loaders
            .get(value_type)
            .ok_or_else(|| CoreError::ValueLoaderNotFound(value_type.to_string()))
    }

    pub fn converter(&self, value_type: &str) -> Result<&Arc<dyn ValueConverter>, CoreError> {
        self.converters
            .get(value_type)
            .ok_or_else(|| CoreError::ValueConverterNotFound(value_type.to_string()))
    }

    pub fn url_generator(
        &self,
        value_type: &str,
    ) -> Result<&Arc<dyn ValueUrlGenerator>, CoreError> {
        self.url_generators
            .get(value_type)
            .ok_or_else(|| CoreError::ValueUrlGeneratorNotFound(value_type.to_string()))
    }

    /// Value types with a registered loader, sorted for stable output.
    pub fn value_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.loaders.keys().cloned().collect();
        types.sort();
        types
    }
}
