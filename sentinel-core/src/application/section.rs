// sentinel-core/src/application/section.rs

use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::domain::error::DomainError;
use crate::ports::warehouse::{Record, ResultSet};

/// Outcome of one page section. A failing section never takes the page
/// down: connection and query errors become `Failed`, zero rows `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> Section<T> {
    pub fn failed(section: &str, err: impl fmt::Display) -> Self {
        warn!(section, "⚠️ Section failed: {}", err);
        Section::Failed(err.to_string())
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Section::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Section::Ready(value) => Section::Ready(f(value)),
            Section::Empty => Section::Empty,
            Section::Failed(msg) => Section::Failed(msg),
        }
    }
}

impl<T> Section<Vec<T>> {
    /// Every row through `parse`; no rows is `Empty`.
    pub fn from_rows<E: fmt::Display>(
        section: &str,
        rows: Result<&ResultSet, E>,
        parse: impl Fn(Record<'_>) -> Result<T, DomainError>,
    ) -> Self {
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => return Self::failed(section, e),
        };
        match rows.records().map(parse).collect::<Result<Vec<_>, _>>() {
            Ok(items) if items.is_empty() => Section::Empty,
            Ok(items) => Section::Ready(items),
            Err(e) => Self::failed(section, e),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Section::Ready(items) => items,
            _ => &[],
        }
    }
}

impl<T> Section<T> {
    /// Single-row queries (aggregates): the first row through `parse`.
    pub fn from_first<E: fmt::Display>(
        section: &str,
        rows: Result<&ResultSet, E>,
        parse: impl FnOnce(Record<'_>) -> Result<T, DomainError>,
    ) -> Self {
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => return Self::failed(section, e),
        };
        match rows.first().map(parse) {
            None => Section::Empty,
            Some(Ok(value)) => Section::Ready(value),
            Some(Err(e)) => Self::failed(section, e),
        }
    }
}
