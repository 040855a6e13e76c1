// sentinel/src/commands/mod.rs

pub mod render;
pub mod seed;
pub mod serve;
pub mod status;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

use sentinel_core::application::DashboardService;
use sentinel_core::domain::configuration::SentinelConfig;
use sentinel_core::infrastructure::DuckDBWarehouse;
use sentinel_core::infrastructure::config::resolve_config;
use sentinel_core::ports::clock::SystemClock;

/// Config + warehouse + service, shared by every command that reads the warehouse.
pub fn bootstrap(config_dir: &Path) -> anyhow::Result<(SentinelConfig, Arc<DashboardService>)> {
    let config = resolve_config(config_dir).with_context(|| {
        format!("Failed to load dashboard configuration from {:?}", config_dir)
    })?;

    // Opened lazily: an unreachable warehouse shows up in the page, not here
    let warehouse = DuckDBWarehouse::new(&config.warehouse.path, config.warehouse.read_only);
    let service = DashboardService::new(&config, Arc::new(warehouse), Arc::new(SystemClock))
        .context("Failed to compile the dashboard queries")?;

    Ok((config, Arc::new(service)))
}
