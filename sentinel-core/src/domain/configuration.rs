// sentinel-core/src/domain/configuration.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct SentinelConfig {
    #[validate(length(min = 1, message = "Dashboard name cannot be empty"))]
    pub name: String,

    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[validate(nested)]
    #[serde(default)]
    pub sources: SourcesConfig,

    #[validate(nested)]
    #[serde(default)]
    pub cache: CacheConfig,

    #[validate(nested)]
    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            warehouse: WarehouseConfig::default(),
            sources: SourcesConfig::default(),
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Connection parameters. Normally supplied by `secrets.yaml` or the
/// environment rather than the main config file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WarehouseConfig {
    #[serde(default = "default_warehouse_path")]
    pub path: String,
    /// Identity the dashboards query as; governance views filter on it.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_true")]
    pub read_only: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
            role: default_role(),
            read_only: true,
        }
    }
}

/// Static constants interpolated into the query templates.
#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_raw_schema")]
    pub raw_schema: String,
    #[serde(default = "default_analytics_schema")]
    pub analytics_schema: String,
    #[serde(default = "default_monitoring_schema")]
    pub monitoring_schema: String,
    #[validate(length(min = 1, message = "At least one monitored table is required"))]
    #[serde(default = "default_monitored_tables")]
    pub monitored_tables: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            raw_schema: default_raw_schema(),
            analytics_schema: default_analytics_schema(),
            monitoring_schema: default_monitoring_schema(),
            monitored_tables: default_monitored_tables(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct CacheConfig {
    /// TTL for pipeline-monitoring queries.
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_fast_ttl")]
    pub fast_ttl_secs: u64,
    /// TTL for slower-moving queries (function list, governance).
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_slow_ttl")]
    pub slow_ttl_secs: u64,
}

impl CacheConfig {
    pub fn fast_ttl(&self) -> Duration {
        Duration::from_secs(self.fast_ttl_secs)
    }

    pub fn slow_ttl(&self) -> Duration {
        Duration::from_secs(self.slow_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fast_ttl_secs: default_fast_ttl(),
            slow_ttl_secs: default_slow_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct RefreshConfig {
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_true")]
    pub quality_auto: bool,
    #[serde(default)]
    pub risk_auto: bool,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            quality_auto: true,
            risk_auto: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_name() -> String {
    "MountainPeak Insurance".to_string()
}
fn default_warehouse_path() -> String {
    "warehouse.duckdb".to_string()
}
fn default_role() -> String {
    "BROKER_ROLE".to_string()
}
fn default_true() -> bool {
    true
}
fn default_database() -> String {
    "MOUNTAINPEAK_INSURANCE_PIPELINE_DB".to_string()
}
fn default_raw_schema() -> String {
    "raw_data".to_string()
}
fn default_analytics_schema() -> String {
    "analytics".to_string()
}
fn default_monitoring_schema() -> String {
    "monitoring".to_string()
}
fn default_monitored_tables() -> Vec<String> {
    vec!["CLAIMS_RAW".to_string(), "CUSTOMER_RAW".to_string()]
}
fn default_fast_ttl() -> u64 {
    30
}
fn default_slow_ttl() -> u64 {
    60
}
fn default_interval() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}
