pub mod connection;
pub mod project;

pub use crate::domain::configuration::SentinelConfig;
pub use connection::{WarehouseSecrets, load_secrets};
pub use project::{apply_env_overrides, load_sentinel_config, resolve_config};
