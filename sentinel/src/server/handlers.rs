// sentinel/src/server/handlers.rs

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Json, Redirect},
};
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;

use sentinel_core::application::{
    PageKind, QualityDashboard, RefreshStatus, RefreshTrigger, RiskDashboard,
};
use sentinel_core::domain::quality::{CheckType, QualityFilter, QualityStatus};
use sentinel_core::presentation::PageOptions;

use super::{ApiErr, AppState};

// ---------- request types ----------

/// Filter form values. Empty strings mean "all".
#[derive(Debug, Default, Deserialize)]
pub struct QualityQuery {
    pub table: Option<String>,
    pub check_type: Option<String>,
    pub status: Option<String>,
}

impl QualityQuery {
    pub fn into_filter(self) -> Result<QualityFilter, ApiErr> {
        let check_type = non_empty(self.check_type)
            .map(|raw| CheckType::from_str(&raw))
            .transpose()
            .map_err(|e| ApiErr::bad_request(e.to_string()))?;
        let status = non_empty(self.status)
            .map(|raw| QualityStatus::from_str(&raw))
            .transpose()
            .map_err(|e| ApiErr::bad_request(e.to_string()))?;

        Ok(QualityFilter {
            table: non_empty(self.table),
            check_type,
            status,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct AutoRefreshForm {
    pub enabled: bool,
}

fn parse_page(raw: &str) -> Result<PageKind, ApiErr> {
    PageKind::from_str(raw).map_err(|e| ApiErr::not_found(e.to_string()))
}

fn page_options(state: &AppState, page: PageKind) -> PageOptions {
    let controller = state.controller(page);
    PageOptions {
        interactive: true,
        auto_refresh: controller.auto_refresh(),
        interval_secs: state.interval_secs,
        refresh: Some(controller.status()),
    }
}

// ---------- GET /health ----------

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "cached_queries": state.service.cached_queries(),
    }))
}

// ---------- GET / ----------

pub async fn index() -> Redirect {
    Redirect::to("/quality")
}

// ---------- GET /quality ----------

pub async fn quality_page(
    State(state): State<AppState>,
    Query(query): Query<QualityQuery>,
) -> Result<Html<String>, ApiErr> {
    let page = state.service.quality_page(query.into_filter()?).await;
    let html = state
        .renderer
        .quality(&page, &page_options(&state, PageKind::Quality))
        .map_err(ApiErr::internal)?;
    Ok(Html(html))
}

// ---------- GET /risk ----------

pub async fn risk_page(State(state): State<AppState>) -> Result<Html<String>, ApiErr> {
    let page = state.service.risk_page().await;
    let html = state
        .renderer
        .risk(&page, &page_options(&state, PageKind::Risk))
        .map_err(ApiErr::internal)?;
    Ok(Html(html))
}

// ---------- POST /{page}/refresh ----------

pub async fn refresh(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Redirect, ApiErr> {
    let page = parse_page(&page)?;
    let status: RefreshStatus = state.controller(page).refresh(RefreshTrigger::Manual).await;
    info!(%page, cycles = status.cycles, "🔄 Manual refresh");
    Ok(Redirect::to(&format!("/{}", page)))
}

// ---------- POST /{page}/auto-refresh ----------

pub async fn auto_refresh(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Form(form): Form<AutoRefreshForm>,
) -> Result<Redirect, ApiErr> {
    let page = parse_page(&page)?;
    state.controller(page).set_auto_refresh(form.enabled);
    info!(%page, enabled = form.enabled, "⏱️ Auto-refresh toggled");
    Ok(Redirect::to(&format!("/{}", page)))
}

// ---------- GET /api/quality, /api/risk ----------

pub async fn quality_json(
    State(state): State<AppState>,
    Query(query): Query<QualityQuery>,
) -> Result<Json<QualityDashboard>, ApiErr> {
    Ok(Json(state.service.quality_page(query.into_filter()?).await))
}

pub async fn risk_json(State(state): State<AppState>) -> Json<RiskDashboard> {
    Json(state.service.risk_page().await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::server::app;
    use tower_http::normalize_path::NormalizePath;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use chrono::{TimeZone, Utc};
    use sentinel_core::application::{DashboardService, RefreshController};
    use sentinel_core::domain::configuration::SentinelConfig;
    use sentinel_core::infrastructure::DuckDBWarehouse;
    use sentinel_core::infrastructure::seed::seed_demo;
    use sentinel_core::ports::clock::ManualClock;
    use sentinel_core::presentation::PageRenderer;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_state() -> AppState {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let config = SentinelConfig::default();
        let warehouse = DuckDBWarehouse::in_memory().unwrap();
        seed_demo(&warehouse, &config, now, 12).unwrap();

        let service = Arc::new(
            DashboardService::new(&config, Arc::new(warehouse), Arc::new(ManualClock::new(now)))
                .unwrap(),
        );
        AppState {
            quality: Arc::new(RefreshController::new(PageKind::Quality, service.clone(), true)),
            risk: Arc::new(RefreshController::new(PageKind::Risk, service.clone(), false)),
            renderer: Arc::new(PageRenderer::new().unwrap()),
            service,
            interval_secs: 30,
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(svc: NormalizePath<Router>, req: Request<Body>) -> (StatusCode, String) {
        let res = svc.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = body_text(app(make_state()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn index_redirects_to_quality() {
        let res = app(make_state()).oneshot(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/quality");
    }

    #[tokio::test]
    async fn quality_page_renders_with_headers() {
        let res = app(make_state()).oneshot(get("/quality")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(
            res.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Data Quality Monitoring"));
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"30\">"));
        assert!(html.contains("action=\"/quality/refresh\""));
    }

    #[tokio::test]
    async fn trailing_slash_reaches_the_page() {
        let (status, html) = body_text(app(make_state()), get("/quality/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Data Quality Monitoring"));

        let (status, _) = body_text(app(make_state()), get("/risk/")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn quality_filter_from_form_values() {
        let (status, _) = body_text(
            app(make_state()),
            get("/quality?table=CLAIMS_RAW&check_type=&status=needs_attention"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = body_text(app(make_state()), get("/quality?status=BROKEN")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("error"));
    }

    #[tokio::test]
    async fn risk_page_has_no_auto_reload_by_default() {
        let (status, html) = body_text(app(make_state()), get("/risk")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Risk Analytics"));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[tokio::test]
    async fn manual_refresh_runs_a_cycle() {
        let state = make_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/risk/refresh")
            .body(Body::empty())
            .unwrap();
        let res = app(state.clone()).oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/risk");
        assert_eq!(state.risk.status().cycles, 1);
        assert_eq!(state.quality.status().cycles, 0);
    }

    #[tokio::test]
    async fn auto_refresh_toggle() {
        let state = make_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/quality/auto-refresh")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("enabled=false"))
            .unwrap();
        let res = app(state.clone()).oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(!state.quality.auto_refresh());
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/claims/refresh")
            .body(Body::empty())
            .unwrap();
        let res = app(make_state()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_risk_returns_sections() {
        let (status, body) = body_text(app(make_state()), get("/api/risk")).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["overview"]["state"], "ready");
        assert_eq!(json["overview"]["data"]["total_customers"], 60);
        assert_eq!(json["role_view"]["data"]["role_name"], "BROKER_ROLE");
    }
}
