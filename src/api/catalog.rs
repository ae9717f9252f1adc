use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use catalog_search::catalog::LoadReport;
use catalog_search::render::{render_loading, render_unavailable};
use catalog_search::search::IndexStats;
use catalog_search::{CatalogError, CatalogState};

use crate::api::ApiResponse;
use crate::state::AppState;

/// Tells the widget script whether to wait for the catalog or give up
pub const CATALOG_STATE_HEADER: &str = "x-catalog-state";

/// Query string of the render/search endpoints
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
}

/// 搜索结果项
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub realm: String,
    pub name: String,
    pub score: Option<f32>,
}

/// 搜索响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub total: usize,
}

/// 目录状态
#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub status: String,
    pub container_id: String,
    pub loaded_at: Option<String>,
    pub report: Option<LoadReport>,
    pub index: Option<IndexStats>,
    pub error_message: Option<String>,
}

fn not_ready_markup(err: &CatalogError) -> String {
    match err {
        CatalogError::Loading => render_loading(),
        other => render_unavailable(&other.to_string()),
    }
}

/// GET /api/render?q= - rendered fragments for the query / 渲染查询结果
pub async fn render(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Response {
    match state.service.render_for_query(&params.q) {
        Ok(markup) => ([(CATALOG_STATE_HEADER, "ready")], Html(markup)).into_response(),
        Err(e) => {
            tracing::warn!("Render request rejected: {}", e);
            let state_name = if matches!(e, CatalogError::Loading) { "loading" } else { "failed" };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(CATALOG_STATE_HEADER, state_name)],
                Html(not_ready_markup(&e)),
            )
                .into_response()
        }
    }
}

/// GET /api/search?q= - ranked results as JSON / 搜索
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> (StatusCode, Json<ApiResponse<SearchResponse>>) {
    let catalog = match state.service.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(&e.to_string())),
            )
        }
    };

    let results: Vec<SearchResultItem> = catalog
        .query(&params.q)
        .into_iter()
        .map(|ranked| SearchResultItem {
            id: ranked.record.id.clone(),
            title: ranked.record.title.clone(),
            realm: ranked.record.realm.clone(),
            name: ranked.record.name.clone(),
            score: ranked.score,
        })
        .collect();

    tracing::debug!("搜索：query={:?}, {} results", params.q, results.len());

    let total = results.len();
    (
        StatusCode::OK,
        Json(ApiResponse::success(SearchResponse {
            query: params.q,
            results,
            total,
        })),
    )
}

/// GET /api/catalog/status - load state and index statistics / 目录状态
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CatalogStatus>> {
    let service_state = state.service.state();
    let mut status = CatalogStatus {
        status: service_state.name().to_string(),
        container_id: state.service.container().id().to_string(),
        loaded_at: None,
        report: None,
        index: None,
        error_message: None,
    };

    match service_state {
        CatalogState::Ready(catalog) => {
            status.loaded_at = chrono::DateTime::from_timestamp(catalog.loaded_at(), 0).map(|dt| dt.to_rfc3339());
            status.report = Some(catalog.report().clone());
            status.index = Some(catalog.index_stats());
        }
        CatalogState::Failed(reason) => status.error_message = Some(reason),
        CatalogState::Loading => {}
    }

    Json(ApiResponse::success(status))
}
