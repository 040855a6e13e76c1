// sentinel-core/src/infrastructure/config/connection.rs

// Connection secrets live next to the main config but outside version control.
// Every field is optional: whatever is absent keeps the value from sentinel.yaml.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::configuration::WarehouseConfig;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct WarehouseSecrets {
    pub path: Option<String>,
    pub role: Option<String>,
    pub read_only: Option<bool>,
}

impl WarehouseSecrets {
    pub fn apply(&self, warehouse: &mut WarehouseConfig) {
        if let Some(path) = &self.path {
            warehouse.path = path.clone();
        }
        if let Some(role) = &self.role {
            warehouse.role = role.clone();
        }
        if let Some(read_only) = self.read_only {
            warehouse.read_only = read_only;
        }
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    warehouse: WarehouseSecrets,
}

/// Reads `secrets.yaml` (or `.yml`) from `config_dir`, if there is one.
pub fn load_secrets(config_dir: &Path) -> Result<Option<WarehouseSecrets>, InfrastructureError> {
    let paths = [
        config_dir.join("secrets.yaml"),
        config_dir.join("secrets.yml"),
    ];
    let Some(secrets_path) = paths.iter().find(|p| p.exists()) else {
        return Ok(None);
    };

    let content = fs::read_to_string(secrets_path)?;
    let file: SecretsFile = serde_yaml::from_str(&content)?;
    info!(path = ?secrets_path, "  🔑 Warehouse secrets loaded");
    Ok(Some(file.warehouse))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_secrets_is_not_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(load_secrets(dir.path())?, None);
        Ok(())
    }

    #[test]
    fn test_partial_secrets_only_override_present_fields() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("secrets.yml"),
            "warehouse:\n  role: ANALYST_ROLE\n",
        )?;

        let secrets = load_secrets(dir.path())?.unwrap();
        let mut warehouse = WarehouseConfig::default();
        secrets.apply(&mut warehouse);

        assert_eq!(warehouse.role, "ANALYST_ROLE");
        assert_eq!(warehouse.path, "warehouse.duckdb");
        assert!(warehouse.read_only);
        Ok(())
    }

    #[test]
    fn test_corrupt_secrets_fail() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("secrets.yaml"), "warehouse: [unclosed")?;
        assert!(load_secrets(dir.path()).is_err());
        Ok(())
    }
}
