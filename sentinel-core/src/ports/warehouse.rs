// sentinel-core/src/ports/warehouse.rs

// The dashboards only ever *read* from the warehouse: send literal SQL, get a
// table of named columns back. Everything else (sessions, dialect, credentials)
// stays behind this trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::error::DomainError;
use crate::error::SentinelError;

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn query(&self, sql: &str) -> Result<ResultSet, SentinelError>;

    fn engine_name(&self) -> &str;
}

/// A single value as returned by the warehouse, independent of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "NULL",
            Cell::Bool(_) => "BOOLEAN",
            Cell::Int(_) => "INTEGER",
            Cell::Float(_) => "DOUBLE",
            Cell::Text(_) => "VARCHAR",
            Cell::Timestamp(_) => "TIMESTAMP",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            Cell::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Cell::Bool(b) => Some(i64::from(*b)),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, ""),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Tabular query result. Column lookup is case-insensitive because the
/// warehouse may fold unquoted identifiers either way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |row| Record { set: self, row })
    }

    pub fn first(&self) -> Option<Record<'_>> {
        self.records().next()
    }
}

/// Borrowed view over one row with typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    set: &'a ResultSet,
    row: &'a [Cell],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Result<&'a Cell, DomainError> {
        self.set
            .column_index(column)
            .and_then(|idx| self.row.get(idx))
            .ok_or_else(|| DomainError::MissingColumn {
                column: column.to_string(),
            })
    }

    pub fn text(&self, column: &str) -> Result<Option<String>, DomainError> {
        Ok(match self.get(column)? {
            Cell::Null => None,
            cell => Some(cell.to_string()),
        })
    }

    /// Like `text` but NULL becomes an empty string.
    pub fn label(&self, column: &str) -> Result<String, DomainError> {
        Ok(self.text(column)?.unwrap_or_default())
    }

    pub fn f64(&self, column: &str) -> Result<Option<f64>, DomainError> {
        self.typed(column, "DOUBLE", Cell::as_f64)
    }

    pub fn i64(&self, column: &str) -> Result<Option<i64>, DomainError> {
        self.typed(column, "INTEGER", Cell::as_i64)
    }

    /// Counts come back NULL from aggregates over empty tables; treat as zero.
    pub fn count(&self, column: &str) -> Result<i64, DomainError> {
        Ok(self.i64(column)?.unwrap_or(0))
    }

    pub fn timestamp(&self, column: &str) -> Result<Option<DateTime<Utc>>, DomainError> {
        self.typed(column, "TIMESTAMP", Cell::as_timestamp)
    }

    fn typed<T>(
        &self,
        column: &str,
        expected: &'static str,
        convert: impl Fn(&Cell) -> Option<T>,
    ) -> Result<Option<T>, DomainError> {
        let cell = self.get(column)?;
        if cell.is_null() {
            return Ok(None);
        }
        convert(cell)
            .map(Some)
            .ok_or_else(|| DomainError::TypeMismatch {
                column: column.to_string(),
                expected,
                found: cell.kind().to_string(),
            })
    }
}
