// sentinel-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::database::duckdb),
        help("An error occurred inside the warehouse engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Warehouse session unavailable: {0}")]
    #[diagnostic(
        code(sentinel::infra::database::session),
        help("Check the warehouse path and credentials in secrets.yaml.")
    )]
    Session(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(sentinel::infra::config))]
    ConfigError(String),

    #[error("Configuration not found at '{0}'")]
    #[diagnostic(code(sentinel::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(sentinel::infra::config_invalid),
        help("TTLs and the refresh interval must be between 1 and 3600 seconds.")
    )]
    Validation(#[from] validator::ValidationErrors),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::template),
        help("Check your Jinja syntax ({{ ... }}) inside the template.")
    )]
    TemplateError(#[from] minijinja::Error),

    // --- SQL GUARD ---
    #[error("SQL Parsing Error in '{query}': {source}")]
    #[diagnostic(code(sentinel::infra::sql_parse))]
    SqlParse {
        query: String,
        #[source]
        source: sqlparser::parser::ParserError,
    },

    #[error("Query '{0}' is not a single read-only SELECT")]
    #[diagnostic(
        code(sentinel::infra::read_only),
        help("Dashboards only read from the warehouse; DDL/DML is rejected.")
    )]
    NotReadOnly(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
