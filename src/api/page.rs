use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;
use std::sync::Arc;

use catalog_search::render::escape_html;

use crate::state::AppState;

/// Embedded host page, widget script and stylesheet / 嵌入的页面与脚本
#[derive(RustEmbed)]
#[folder = "static"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct StaticAssets;

/// GET / - host page pre-filled with the unfiltered catalog / 宿主页面
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let Some(template) = StaticAssets::get("index.html") else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "index.html missing from build").into_response();
    };
    let template = String::from_utf8_lossy(&template.data);

    // Container content goes in last so record text cannot carry placeholders
    let page = template
        .replace("{{input_id}}", &escape_html(&state.config.render.input_id))
        .replace("{{container_id}}", &escape_html(state.service.container().id()))
        .replace("{{content}}", &state.service.initial_markup());

    Html(page).into_response()
}

/// GET /static/*path - embedded assets / 处理嵌入的静态文件请求
pub async fn asset(Path(path): Path<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                Body::from(content.data.into_owned()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
