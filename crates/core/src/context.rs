//! Request context — the narrow view of an incoming request that target and
//! condition matchers operate on.
//!
//! The HTTP layer (or a test) builds one of these per request; matchers never
//! touch the framework request object directly, which keeps the rule-matching
//! core independently testable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request attributes extracted by the host before matching runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Request path info, e.g. `/articles/2024/march`.
    #[serde(default)]
    pub path_info: String,
    /// Resolved route name, e.g. `cms_article_view`.
    #[serde(default)]
    pub route: String,
    /// Parameters bound by the route, e.g. `{"id": "42"}`.
    #[serde(default)]
    pub route_params: HashMap<String, String>,
    /// Arbitrary request attributes set by upstream middleware.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Free-form tags attached to the request (e.g. by an edge cache).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Semantic class groups of the content the request resolves to.
    #[serde(default)]
    pub class_groups: Vec<String>,
}

impl RequestContext {
    /// Context for a plain path-based request with no routing metadata.
    pub fn for_path(path_info: impl Into<String>) -> Self {
        Self {
            path_info: path_info.into(),
            ..Self::default()
        }
    }
}
