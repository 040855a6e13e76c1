// sentinel/src/commands/seed.rs
//
// USE CASE: Create (or refresh) the demo warehouse.

use anyhow::Context;
use chrono::Utc;
use std::path::Path;

use sentinel_core::infrastructure::DuckDBWarehouse;
use sentinel_core::infrastructure::config::resolve_config;
use sentinel_core::infrastructure::seed::seed_demo;

pub fn execute(config_dir: &Path, db_path: Option<String>, last_load_minutes: i64) -> anyhow::Result<()> {
    let config = resolve_config(config_dir)?;
    let db_path = db_path.unwrap_or_else(|| config.warehouse.path.clone());

    println!("🌱 Seeding demo warehouse at {}...", db_path);
    // Writes need a read-write session whatever the dashboard config says
    let warehouse = DuckDBWarehouse::open(&db_path, false)
        .with_context(|| format!("Failed to open DuckDB at {}", db_path))?;
    seed_demo(&warehouse, &config, Utc::now(), last_load_minutes)?;

    println!(
        "✨ Demo data loaded (last claims load {} min ago).",
        last_load_minutes
    );
    Ok(())
}
