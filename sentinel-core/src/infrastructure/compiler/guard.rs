// sentinel-core/src/infrastructure/compiler/guard.rs

use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

use crate::infrastructure::error::InfrastructureError;

/// Rejects anything that is not exactly one query statement.
/// Runs once per template at startup, not per fetch.
pub struct ReadOnlyGuard;

impl ReadOnlyGuard {
    pub fn check(name: &str, sql: &str) -> Result<(), InfrastructureError> {
        let statements = Parser::parse_sql(&DuckDbDialect {}, sql).map_err(|source| {
            InfrastructureError::SqlParse {
                query: name.to_string(),
                source,
            }
        })?;

        match statements.as_slice() {
            [Statement::Query(_)] => Ok(()),
            _ => Err(InfrastructureError::NotReadOnly(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_passes() {
        let sql = "WITH t AS (SELECT 1 AS a) SELECT CAST(SUM(a) AS BIGINT) FROM t WHERE a IN ('x', 'y')";
        assert!(ReadOnlyGuard::check("q", sql).is_ok());
    }

    #[test]
    fn test_write_is_rejected() {
        let err = ReadOnlyGuard::check("q", "DELETE FROM claims").unwrap_err();
        assert!(matches!(err, InfrastructureError::NotReadOnly(_)));
    }

    #[test]
    fn test_stacked_statements_are_rejected() {
        let err = ReadOnlyGuard::check("q", "SELECT 1; DROP TABLE claims").unwrap_err();
        assert!(matches!(err, InfrastructureError::NotReadOnly(_)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = ReadOnlyGuard::check("q", "SELEC FROM").unwrap_err();
        assert!(matches!(err, InfrastructureError::SqlParse { .. }));
    }
}
