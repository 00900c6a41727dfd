//! Reqwest-backed client for a remote CMS REST API.
//!
//! Registered under the `remote` value type. The remote API is expected to
//! expose:
//!
//! ```text
//! GET  {base}/values/{id}            raw value payload
//! POST {base}/search                 { query_type, params, offset, limit }
//! ```
//!
//! Failures surface as [`ContentError::Upstream`] with no retries — the
//! caller decides what a failed query means for the page being rendered.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use mosaic_core::items::CmsItem;
use mosaic_core::types::DbId;

use crate::error::ContentError;
use crate::registry::{
    ContentRegistry, QueryRunner, ValueConverter, ValueLoader, ValueUrlGenerator,
};

/// Value type identifier for items backed by the remote CMS.
pub const VALUE_TYPE_REMOTE: &str = "remote";

/// HTTP client for the remote CMS.
#[derive(Clone)]
pub struct RemoteContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ValueLoader for RemoteContentClient {
    async fn load(&self, value_id: DbId) -> Result<Value, ContentError> {
        let url = format!("{}/values/{value_id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ContentError::Upstream(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query_type: &'a str,
    params: &'a Value,
    offset: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i32>,
}

#[async_trait]
impl QueryRunner for RemoteContentClient {
    async fn run(
        &self,
        query_type: &str,
        params: &Value,
        offset: i32,
        limit: Option<i32>,
    ) -> Result<Vec<CmsItem>, ContentError> {
        let url = format!("{}/search", self.base_url);
        let request = SearchRequest {
            query_type,
            params,
            offset,
            limit,
        };
        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(ContentError::Upstream(format!(
                "POST {url} returned {}",
                response.status()
            )));
        }
        let raw: Vec<Value> = response.json().await?;
        tracing::debug!(query_type, count = raw.len(), "Remote query executed");
        raw.iter().map(|v| RemoteValueConverter.convert(v)).collect()
    }
}

/// Converts raw remote payloads (`{"id": ..., "name": ..., "visible": ...}`)
/// into item shape.
pub struct RemoteValueConverter;

impl ValueConverter for RemoteValueConverter {
    fn convert(&self, raw: &Value) -> Result<CmsItem, ContentError> {
        let value = raw.get("id").and_then(|v| v.as_i64()).ok_or_else(|| {
            ContentError::InvalidPayload {
                value_type: VALUE_TYPE_REMOTE.to_string(),
                message: "missing numeric 'id'".to_string(),
            }
        })?;
        let name = raw
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(mosaic_core::items::UNKNOWN_ITEM_NAME)
            .to_string();
        let visible = raw.get("visible").and_then(|v| v.as_bool()).unwrap_or(true);

        Ok(CmsItem {
            value,
            value_type: VALUE_TYPE_REMOTE.to_string(),
            name,
            visible,
        })
    }
}

/// Generates public view URLs on the remote CMS.
pub struct RemoteUrlGenerator {
    base_url: String,
}

impl RemoteUrlGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ValueUrlGenerator for RemoteUrlGenerator {
    fn generate(&self, item: &CmsItem) -> String {
        format!("{}/view/{}", self.base_url, item.value)
    }
}

/// Build a registry with the remote value type fully wired.
pub fn remote_registry(client: RemoteContentClient, public_base_url: &str) -> ContentRegistry {
    let mut registry = ContentRegistry::new();
    registry.register_loader(VALUE_TYPE_REMOTE, std::sync::Arc::new(client));
    registry.register_converter(VALUE_TYPE_REMOTE, std::sync::Arc::new(RemoteValueConverter));
    registry.register_url_generator(
        VALUE_TYPE_REMOTE,
        std::sync::Arc::new(RemoteUrlGenerator::new(public_base_url)),
    );
    registry
}
