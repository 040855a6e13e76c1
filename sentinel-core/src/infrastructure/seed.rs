// sentinel-core/src/infrastructure/seed.rs

// Demo warehouse loader. This is the only write path in the crate and it
// goes through `execute_batch`, never through the read-only query catalog.

use chrono::{DateTime, Utc};
use minijinja::context;
use tracing::{info, instrument};

use crate::domain::configuration::SentinelConfig;
use crate::infrastructure::adapters::duckdb::DuckDBWarehouse;
use crate::infrastructure::compiler::SqlRenderer;
use crate::infrastructure::error::InfrastructureError;

const DEMO_SEED: &str = include_str!("../../sql/demo_seed.sql");

/// Minutes between the latest claims load and seeding time by default.
pub const DEFAULT_LAST_LOAD_MINUTES: i64 = 12;

#[instrument(skip(warehouse, config), fields(path = warehouse.path()))]
pub fn seed_demo(
    warehouse: &DuckDBWarehouse,
    config: &SentinelConfig,
    now: DateTime<Utc>,
    last_load_minutes: i64,
) -> Result<(), InfrastructureError> {
    let sql = SqlRenderer::new().with_anchor(now).render(
        DEMO_SEED,
        context! {
            sources => &config.sources,
            last_load_minutes => last_load_minutes,
        },
    )?;
    warehouse.execute_batch(&sql)?;
    info!(last_load_minutes, "🌱 Demo warehouse seeded");
    Ok(())
}
