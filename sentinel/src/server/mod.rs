// sentinel/src/server/mod.rs
//
// HTTP surface: two HTML dashboards, their refresh controls and JSON mirrors.

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;
use tower_http::set_header::response::SetResponseHeaderLayer;

use sentinel_core::application::{DashboardService, PageKind, RefreshController};
use sentinel_core::presentation::PageRenderer;

pub mod handlers;

// ---------- shared state ----------

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub renderer: Arc<PageRenderer>,
    pub quality: Arc<RefreshController>,
    pub risk: Arc<RefreshController>,
    pub interval_secs: u64,
}

impl AppState {
    pub fn controller(&self, page: PageKind) -> &Arc<RefreshController> {
        match page {
            PageKind::Quality => &self.quality,
            PageKind::Risk => &self.risk,
        }
    }
}

// ---------- error type ----------

/// A JSON error response: `{"error": "..."}` with an HTTP status.
#[derive(Debug)]
pub struct ApiErr(StatusCode, String);

impl ApiErr {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(StatusCode::NOT_FOUND, msg.into())
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.1 });
        (self.0, Json(body)).into_response()
    }
}

// ---------- router ----------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        .route("/quality", get(handlers::quality_page))
        .route("/risk", get(handlers::risk_page))
        .route("/{page}/refresh", post(handlers::refresh))
        .route("/{page}/auto-refresh", post(handlers::auto_refresh))
        .route("/api/quality", get(handlers::quality_json))
        .route("/api/risk", get(handlers::risk_json))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        // Pages are rebuilt from the cache on every request
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

/// The served application. Path normalization wraps the router because a
/// `Router::layer` only runs after a route has already matched.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(router(state))
}
