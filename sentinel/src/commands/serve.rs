// sentinel/src/commands/serve.rs
//
// USE CASE: Serve both dashboards, each with its own refresh timer.

use anyhow::Context;
use axum::ServiceExt;
use axum::extract::Request;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use sentinel_core::application::{PageKind, RefreshController, RefreshScheduler};
use sentinel_core::presentation::PageRenderer;

use crate::server::{AppState, app};

pub async fn execute(config_dir: &Path, bind: Option<String>) -> anyhow::Result<()> {
    let (config, service) = super::bootstrap(config_dir)?;
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let interval = config.refresh.interval();

    let quality = Arc::new(RefreshController::new(
        PageKind::Quality,
        service.clone(),
        config.refresh.quality_auto,
    ));
    let risk = Arc::new(RefreshController::new(
        PageKind::Risk,
        service.clone(),
        config.refresh.risk_auto,
    ));

    let timers = [
        RefreshScheduler::spawn(quality.clone(), interval),
        RefreshScheduler::spawn(risk.clone(), interval),
    ];

    let state = AppState {
        service,
        renderer: Arc::new(PageRenderer::new()?),
        quality,
        risk,
        interval_secs: config.refresh.interval_secs,
    };

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(%bind, interval_secs = config.refresh.interval_secs, "🌐 Dashboards listening");
    println!("🌐 Dashboards on http://{}/quality and http://{}/risk", bind, bind);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app(state)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("🛑 Shutting down refresh timers");
    for timer in timers {
        timer.shutdown().await;
    }
    Ok(())
}
