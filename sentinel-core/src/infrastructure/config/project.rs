// sentinel-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::configuration::SentinelConfig;
use crate::infrastructure::config::connection::load_secrets;
use crate::infrastructure::error::InfrastructureError;

pub const ENV_WAREHOUSE_PATH: &str = "SENTINEL_WAREHOUSE_PATH";
pub const ENV_ROLE: &str = "SENTINEL_ROLE";
pub const ENV_BIND: &str = "SENTINEL_BIND";

// --- LOADER ---

#[instrument(skip(config_dir))]
pub fn load_sentinel_config(config_dir: &Path) -> Result<SentinelConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(config_dir)?;
    info!(path = ?config_path, "Loading dashboard config");

    // 2. Chargement YAML Base
    let content = fs::read_to_string(&config_path)?;
    let config: SentinelConfig = serde_yaml::from_str(&content)?;

    finish(config, config_dir, |key| std::env::var(key).ok())
}

/// Like [`load_sentinel_config`] but falls back to the defaults when no
/// main config file exists. Secrets and environment still apply.
#[instrument(skip(config_dir))]
pub fn resolve_config(config_dir: &Path) -> Result<SentinelConfig, InfrastructureError> {
    match load_sentinel_config(config_dir) {
        Err(InfrastructureError::ConfigNotFound(msg)) => {
            warn!("{msg}; using built-in defaults");
            finish(SentinelConfig::default(), config_dir, |key| {
                std::env::var(key).ok()
            })
        }
        other => other,
    }
}

fn finish(
    mut config: SentinelConfig,
    config_dir: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SentinelConfig, InfrastructureError> {
    // 3. Hydratation des secrets (Fail-Secure)
    if let Some(secrets) = load_secrets(config_dir)? {
        secrets.apply(&mut config.warehouse);
    }

    // 4. Override via Variables d'Environnement
    apply_env_overrides(&mut config, lookup);

    config.validate()?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["sentinel.yaml", "sentinel.yml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

/// Environment takes precedence over both files. `lookup` is injected so the
/// layering can be tested without touching the process environment.
pub fn apply_env_overrides(config: &mut SentinelConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(ENV_WAREHOUSE_PATH) {
        info!(old = ?config.warehouse.path, new = ?val, "Overriding warehouse path via ENV");
        config.warehouse.path = val;
    }
    if let Some(val) = lookup(ENV_ROLE) {
        info!(old = ?config.warehouse.role, new = ?val, "Overriding role via ENV");
        config.warehouse.role = val;
    }
    if let Some(val) = lookup(ENV_BIND) {
        info!(old = ?config.server.bind, new = ?val, "Overriding bind address via ENV");
        config.server.bind = val;
    }
}
