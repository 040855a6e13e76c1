pub mod alerts;
pub mod configuration;
pub mod error;
pub mod freshness;
pub mod governance;
pub mod pipeline;
pub mod quality;
pub mod risk;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use configuration::SentinelConfig;
pub use error::DomainError;
