//! Knowledge base HTTP server.
//!
//! Exposes search, stats and rendered documents as a JSON API, plus a plain
//! HTML page per document for browsers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/search?q=` | Normalized search results |
//! | `GET`  | `/api/stats` | Capped article count |
//! | `GET`  | `/api/documents/{id}?theme=&active=` | Rendered document as JSON |
//! | `GET`  | `/documents/{id}?theme=&active=` | Rendered document as an HTML page |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser front end
//! on another origin can call the API.

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::get::{build_view, DocumentView};
use crate::knowledge::KnowledgeBase;
use crate::render::{RenderContext, Theme};
use crate::search::SearchResponse;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    kb: Arc<KnowledgeBase>,
}

/// Starts the server on `[server].bind` using the Notion-backed knowledge base.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_config(config).context("Failed to create Notion client")?;
    run_server_with_knowledge_base(&config.server.bind, Arc::new(kb)).await
}

/// Starts the server with an already constructed knowledge base, e.g. one
/// backed by a custom [`DocumentStore`](crate::traits::DocumentStore).
pub async fn run_server_with_knowledge_base(bind: &str, kb: Arc<KnowledgeBase>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!(bind, store = kb.store_name(), "knowledge base server listening");
    println!("Knowledge base server listening on http://{}", bind);

    axum::serve(listener, router(kb)).await?;
    Ok(())
}

/// Build the application router.
pub fn router(kb: Arc<KnowledgeBase>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/search", get(handle_search))
        .route("/api/stats", get(handle_stats))
        .route("/api/documents/{id}", get(handle_document))
        .route("/documents/{id}", get(handle_document_page))
        .layer(cors)
        .with_state(AppState { kb })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let results = state.kb.query(&query).await;
    Ok(Json(SearchResponse::new(&query, results)))
}

// ============ GET /api/stats ============

#[derive(Serialize)]
struct StatsResponse {
    count: usize,
}

async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        count: state.kb.article_count().await,
    })
}

// ============ GET /api/documents/{id} ============

#[derive(Deserialize)]
struct DocumentParams {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    active: Option<String>,
}

impl DocumentParams {
    fn context(&self) -> Result<RenderContext, AppError> {
        let theme = match self.theme.as_deref() {
            Some(raw) if !raw.is_empty() => raw.parse::<Theme>().map_err(bad_request)?,
            _ => Theme::default(),
        };
        let active = self.active.clone().filter(|a| !a.is_empty());
        Ok(RenderContext::new(theme).with_active_heading(active))
    }
}

async fn handle_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DocumentParams>,
) -> Result<Json<DocumentView>, AppError> {
    let ctx = params.context()?;
    let doc = state
        .kb
        .load_document(&id)
        .await
        .ok_or_else(|| not_found(format!("document not found: {}", id)))?;

    Ok(Json(build_view(&state.kb, doc, &ctx).await))
}

// ============ GET /documents/{id} ============

async fn handle_document_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DocumentParams>,
) -> Result<Html<String>, AppError> {
    let ctx = params.context()?;
    let doc = state
        .kb
        .load_document(&id)
        .await
        .ok_or_else(|| not_found(format!("document not found: {}", id)))?;

    Ok(Html(state.kb.render_page(&doc, &ctx).await))
}
