// sentinel-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Column '{column}' missing from result set")]
    #[diagnostic(
        code(sentinel::domain::missing_column),
        help("The warehouse query must alias this column explicitly (AS {column}).")
    )]
    MissingColumn { column: String },

    #[error("Column '{column}' holds {found}, expected {expected}")]
    #[diagnostic(code(sentinel::domain::type_mismatch))]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("Unknown quality status '{0}'")]
    #[diagnostic(code(sentinel::domain::status))]
    UnknownStatus(String),

    #[error("Unknown check type '{0}'")]
    #[diagnostic(code(sentinel::domain::check_type))]
    UnknownCheckType(String),
}
