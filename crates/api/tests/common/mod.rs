//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a `#[sqlx::test]` pool, with the external CMS replaced by an
//! in-process stub so no network access is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use mosaic_api::config::ServerConfig;
use mosaic_api::router::build_app_router;
use mosaic_api::state::AppState;
use mosaic_content::remote::{RemoteUrlGenerator, RemoteValueConverter};
use mosaic_content::{ContentError, ContentRegistry, ContentService, QueryRunner, ValueLoader};
use mosaic_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        content_api_url: "http://cms.test".to_string(),
        content_public_url: "http://cms.test".to_string(),
    }
}

/// In-process stand-in for the remote CMS.
///
/// Loads any value id below 1000 as `Value {id}`; higher ids fail upstream.
/// Query types: `latest` returns three values (ids 1-3), `empty` returns
/// nothing, anything else fails upstream.
pub struct StubCms;

#[async_trait]
impl ValueLoader for StubCms {
    async fn load(&self, value_id: DbId) -> Result<Value, ContentError> {
        if value_id >= 1000 {
            return Err(ContentError::Upstream(format!(
                "value {value_id} not found upstream"
            )));
        }
        Ok(json!({
            "id": value_id,
            "name": format!("Value {value_id}"),
            "visible": true,
        }))
    }
}

#[async_trait]
impl QueryRunner for StubCms {
    async fn run(
        &self,
        query_type: &str,
        _params: &Value,
        offset: i32,
        limit: Option<i32>,
    ) -> Result<Vec<mosaic_core::items::CmsItem>, ContentError> {
        let ids: Vec<DbId> = match query_type {
            "latest" => (1..=3).collect(),
            "empty" => Vec::new(),
            other => {
                return Err(ContentError::Upstream(format!(
                    "unknown query type {other}"
                )))
            }
        };
        let page: Vec<_> = ids
            .into_iter()
            .skip(offset as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .map(|id| mosaic_core::items::CmsItem {
                value: id,
                value_type: "remote".to_string(),
                name: format!("Value {id}"),
                visible: true,
            })
            .collect();
        Ok(page)
    }
}

/// Build a content service backed by [`StubCms`] under the `remote` value
/// type. The production converter and URL generator are reused so payload
/// handling matches the real wiring.
pub fn stub_content_service() -> ContentService {
    let mut registry = ContentRegistry::new();
    registry.register_loader("remote", Arc::new(StubCms));
    registry.register_converter("remote", Arc::new(RemoteValueConverter));
    registry.register_url_generator("remote", Arc::new(RemoteUrlGenerator::new("http://cms.test")));
    ContentService::new(registry, Arc::new(StubCms))
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        content: Arc::new(stub_content_service()),
    };
    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request to the app.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status code and return the parsed body.
#[allow(dead_code)]
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
