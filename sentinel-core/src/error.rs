// sentinel-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentinelError {
    // --- ERREURS DU DOMAINE (Rows that don't match the expected shape) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (Warehouse, IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unknown query '{0}' in catalog")]
    UnknownQuery(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for SentinelError {
    fn from(err: std::io::Error) -> Self {
        SentinelError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for SentinelError {
    fn from(err: duckdb::Error) -> Self {
        SentinelError::Infrastructure(err.into())
    }
}
