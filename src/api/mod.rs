pub mod catalog;
pub mod page;
pub mod server;

use axum::{routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            code: 503,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Application routes / 应用路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/static/*path", get(page::asset))
        .route("/api/health", get(server::health_check))
        .route("/api/render", get(catalog::render))
        .route("/api/search", get(catalog::search))
        .route("/api/catalog/status", get(catalog::status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use catalog_search::catalog::parse_catalog;
    use catalog_search::config::AppConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    const CATALOG: &str = r#"{
        "TG_MEAN": {"title": "Mean Temperature", "abstract": "Mean of daily mean temperature.", "vars": {"tas": {}}, "realm": "atmos", "name": "tg_mean"},
        "PRCPTOT": {"title": "Total precipitation", "abstract": "Total accumulated <b>precipitation</b>.", "vars": {"pr": {}}, "realm": "atmos", "name": "prcptot"}
    }"#;

    fn loading_state() -> Arc<AppState> {
        Arc::new(AppState::new(AppConfig::default()))
    }

    fn ready_state() -> Arc<AppState> {
        let state = loading_state();
        state.service.install(parse_catalog(CATALOG).unwrap()).unwrap();
        state
    }

    async fn fetch(state: Arc<AppState>, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let catalog_state = response
            .headers()
            .get(catalog::CATALOG_STATE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, catalog_state, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_render_endpoint() {
        let state = ready_state();

        let (status, catalog_state, body) = fetch(state.clone(), "/api/render?q=temperature").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(catalog_state.as_deref(), Some("ready"));
        assert_eq!(body.matches("<article").count(), 1);
        assert!(body.contains("id=\"tg_mean\""));
        assert_eq!(state.service.container().content(), body);

        let (_, _, body) = fetch(state.clone(), "/api/render").await;
        assert_eq!(body.matches("<article").count(), 2);
        assert!(body.contains("&lt;b&gt;precipitation&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn test_render_while_loading() {
        let (status, catalog_state, body) = fetch(loading_state(), "/api/render?q=tas").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(catalog_state.as_deref(), Some("loading"));
        assert!(body.contains("catalog-loading"));
    }

    #[tokio::test]
    async fn test_render_after_failure() {
        let state = loading_state();
        state.service.fail("network down".to_string());
        let (status, catalog_state, body) = fetch(state, "/api/render").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(catalog_state.as_deref(), Some("failed"));
        assert!(body.contains("network down"));
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, _, body) = fetch(ready_state(), "/api/search?q=precip").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["results"][0]["id"], "prcptot");
        assert!(json["data"]["results"][0]["score"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_search_while_loading() {
        let (status, _, body) = fetch(loading_state(), "/api/search?q=tas").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], 503);
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (_, _, body) = fetch(loading_state(), "/api/catalog/status").await;
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["status"], "loading");

        let (_, _, body) = fetch(ready_state(), "/api/catalog/status").await;
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["status"], "ready");
        assert_eq!(json["data"]["report"]["records"], 2);
        assert_eq!(json["data"]["index"]["document_count"], 2);
        assert_eq!(json["data"]["container_id"], "indicators");
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, _, body) = fetch(ready_state(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id=\"queryInput\""));
        assert!(body.contains("<div id=\"indicators\"><article"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn test_index_page_shows_full_catalog_after_queries() {
        let state = ready_state();
        let (_, _, body) = fetch(state.clone(), "/api/render?q=precip").await;
        assert_eq!(body.matches("<article").count(), 1);

        let (status, _, body) = fetch(state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("<article").count(), 2);
    }

    #[tokio::test]
    async fn test_static_assets() {
        let (status, _, body) = fetch(loading_state(), "/static/widget.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/api/render"));

        let (status, _, _) = fetch(loading_state(), "/static/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = fetch(loading_state(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }
}
