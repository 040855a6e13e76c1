// sentinel-core/src/infrastructure/compiler/jinja.rs

// Turns the query templates (with {{ sources.database }}, |sql_literal, ...)
// into plain SQL the warehouse can run. Values come from the validated
// config, never from request input.

use chrono::{DateTime, Duration, Utc};
use minijinja::{Environment, Error, ErrorKind};
use serde::Serialize;

use crate::infrastructure::error::InfrastructureError;

pub struct SqlRenderer {
    env: Environment<'static>,
}

impl SqlRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_filter("upper", |value: &str| value.to_uppercase());
        env.add_filter("lower", |value: &str| value.to_lowercase());

        // 'O''Brien' : quotes simples doublées
        env.add_filter("sql_literal", |value: &str| quote(value));

        // ['A', 'B'] -> 'A', 'B'  (contenu d'un IN (...))
        env.add_filter("sql_list", |values: Vec<String>| {
            values
                .iter()
                .map(|v| quote(v))
                .collect::<Vec<_>>()
                .join(", ")
        });

        Self { env }
    }

    /// Adds `minutes_ago(n)` which yields a UTC `TIMESTAMP` literal `n`
    /// minutes before `now`. Only the demo seed template needs it.
    pub fn with_anchor(mut self, now: DateTime<Utc>) -> Self {
        self.env.add_function("minutes_ago", move |minutes: i64| -> Result<String, Error> {
            let at = Duration::try_minutes(minutes)
                .and_then(|offset| now.checked_sub_signed(offset))
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidOperation,
                        format!("minutes_ago({minutes}) is outside the supported date range"),
                    )
                })?;
            Ok(format!("TIMESTAMP '{}'", at.format("%Y-%m-%d %H:%M:%S")))
        });
        self
    }

    pub fn render<S: Serialize>(&self, template: &str, context: S) -> Result<String, InfrastructureError> {
        Ok(self.env.render_str(template, context)?)
    }
}

impl Default for SqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;
    use minijinja::context;

    #[test]
    fn test_render_qualified_literal() -> Result<()> {
        let renderer = SqlRenderer::new();
        let sql = renderer.render(
            "WHERE upper(table_name) = {{ (db ~ '.' ~ schema ~ '.' ~ table) | upper | sql_literal }}",
            context! { db => "pipeline_db", schema => "raw_data", table => "claims_raw" },
        )?;
        assert_eq!(sql, "WHERE upper(table_name) = 'PIPELINE_DB.RAW_DATA.CLAIMS_RAW'");
        Ok(())
    }

    #[test]
    fn test_literal_escapes_quotes() -> Result<()> {
        let renderer = SqlRenderer::new();
        let sql = renderer.render("{{ name | sql_literal }}", context! { name => "O'Brien" })?;
        assert_eq!(sql, "'O''Brien'");
        Ok(())
    }

    #[test]
    fn test_sql_list() -> Result<()> {
        let renderer = SqlRenderer::new();
        let sql = renderer.render(
            "IN ({{ tables | sql_list }})",
            context! { tables => vec!["CLAIMS_RAW", "CUSTOMER_RAW"] },
        )?;
        assert_eq!(sql, "IN ('CLAIMS_RAW', 'CUSTOMER_RAW')");
        Ok(())
    }

    #[test]
    fn test_minutes_ago() -> Result<()> {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let renderer = SqlRenderer::new().with_anchor(now);
        let sql = renderer.render("{{ minutes_ago(90) }}", ())?;
        assert_eq!(sql, "TIMESTAMP '2024-03-01 10:30:00'");
        Ok(())
    }

    #[test]
    fn test_minutes_ago_out_of_range_is_an_error() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let renderer = SqlRenderer::new().with_anchor(now);
        let result = renderer.render("{{ minutes_ago(n) }}", context! { n => i64::MAX });
        assert!(matches!(result, Err(InfrastructureError::TemplateError(_))));
        let result = renderer.render("{{ minutes_ago(n) }}", context! { n => -i64::MAX });
        assert!(matches!(result, Err(InfrastructureError::TemplateError(_))));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let renderer = SqlRenderer::new();
        let result = renderer.render("SELECT {{ oops", ());
        assert!(matches!(result, Err(InfrastructureError::TemplateError(_))));
    }
}
