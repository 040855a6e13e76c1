// sentinel-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::{TimeUnit, Value};
use duckdb::{AccessMode, Config, Connection};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

// Imports Hexagonaux
use crate::error::SentinelError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::warehouse::{Cell, ResultSet, Warehouse};

pub const IN_MEMORY: &str = ":memory:";

/// Warehouse adapter on DuckDB.
///
/// The database is opened lazily on the first fetch, so an unreachable
/// warehouse surfaces as a failed section rather than a startup crash. Each
/// query then runs on its own cloned session which is closed as soon as the
/// rows are read.
pub struct DuckDBWarehouse {
    path: String,
    read_only: bool,
    root: Mutex<Option<Connection>>,
}

impl DuckDBWarehouse {
    pub fn new(path: impl Into<String>, read_only: bool) -> Self {
        Self {
            path: path.into(),
            read_only,
            root: Mutex::new(None),
        }
    }

    /// Opens right away; used where failing early is wanted (seeding, tests).
    pub fn open(path: impl Into<String>, read_only: bool) -> Result<Self, InfrastructureError> {
        let warehouse = Self::new(path, read_only);
        drop(warehouse.session()?);
        Ok(warehouse)
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::open(IN_MEMORY, false)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs DDL/DML. Only for loading demo data; dashboards never write.
    pub fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        let session = self.session()?;
        session.execute_batch(sql)?;
        Ok(())
    }

    fn connect(&self) -> Result<Connection, InfrastructureError> {
        if self.path == IN_MEMORY {
            // Read-only makes no sense for an in-memory database.
            return Ok(Connection::open_in_memory_with_flags(Config::default())?);
        }
        let config = if self.read_only {
            Config::default().access_mode(AccessMode::ReadOnly)?
        } else {
            Config::default()
        };
        info!(path = %self.path, read_only = self.read_only, "Opening DuckDB warehouse");
        Ok(Connection::open_with_flags(&self.path, config)?)
    }

    fn session(&self) -> Result<Connection, InfrastructureError> {
        let mut root = self.root.lock().unwrap_or_else(PoisonError::into_inner);
        if root.is_none() {
            *root = Some(self.connect()?);
        }
        match root.as_ref() {
            Some(conn) => Ok(conn.try_clone()?),
            None => Err(DatabaseError::Session(format!("could not open {}", self.path)).into()),
        }
    }

    fn run(&self, sql: &str) -> Result<ResultSet, InfrastructureError> {
        let session = self.session()?;
        debug!("🔌 Session opened");

        let mut stmt = session.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(to_cell(row.get::<_, Value>(idx)?));
            }
            data.push(cells);
        }

        drop(rows);
        drop(stmt);
        drop(session);
        debug!("🔌 Session closed");

        Ok(ResultSet::new(columns, data))
    }
}

#[async_trait]
impl Warehouse for DuckDBWarehouse {
    async fn query(&self, sql: &str) -> Result<ResultSet, SentinelError> {
        let start = Instant::now();
        let result = self.run(sql).map_err(SentinelError::from)?;
        debug!(rows = result.len(), "DuckDB query done in {:.2?}", start.elapsed());
        Ok(result)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Boolean(b) => Cell::Bool(b),
        Value::TinyInt(v) => Cell::Int(v.into()),
        Value::SmallInt(v) => Cell::Int(v.into()),
        Value::Int(v) => Cell::Int(v.into()),
        Value::BigInt(v) => Cell::Int(v),
        // SUM() over integers widens to HUGEINT
        Value::HugeInt(v) => i64::try_from(v)
            .map(Cell::Int)
            .unwrap_or(Cell::Float(v as f64)),
        Value::UTinyInt(v) => Cell::Int(v.into()),
        Value::USmallInt(v) => Cell::Int(v.into()),
        Value::UInt(v) => Cell::Int(v.into()),
        Value::UBigInt(v) => i64::try_from(v)
            .map(Cell::Int)
            .unwrap_or(Cell::Float(v as f64)),
        Value::Float(v) => Cell::Float(v.into()),
        Value::Double(v) => Cell::Float(v),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse().map(Cell::Float).unwrap_or(Cell::Text(text))
        }
        Value::Timestamp(unit, raw) => timestamp_cell(unit, raw),
        Value::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(Cell::Timestamp)
            .unwrap_or(Cell::Null),
        Value::Text(s) => Cell::Text(s),
        other => Cell::Text(format!("{:?}", other)),
    }
}

// DuckDB TIMESTAMP is naive; the pipeline writes UTC.
fn timestamp_cell(unit: TimeUnit, raw: i64) -> Cell {
    let micros = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    DateTime::from_timestamp_micros(micros)
        .map(Cell::Timestamp)
        .unwrap_or(Cell::Null)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_duckdb_query_types() -> Result<()> {
        let warehouse = DuckDBWarehouse::in_memory()?;
        warehouse.execute_batch(
            "CREATE TABLE claims (policy VARCHAR, fraud BOOLEAN, amount DOUBLE, loaded TIMESTAMP);
             INSERT INTO claims VALUES
               ('P1', true, 100.5, TIMESTAMP '2024-03-01 10:00:00'),
               ('P2', false, 200.0, TIMESTAMP '2024-03-01 11:30:00');",
        )?;

        let rows = warehouse
            .query(
                "SELECT COUNT(DISTINCT policy) AS policies,
                        SUM(CASE WHEN fraud THEN 1 ELSE 0 END) AS fraud_cases,
                        ROUND(AVG(amount), 2) AS avg_amount,
                        MAX(loaded) AS last_load
                 FROM claims",
            )
            .await?;

        assert_eq!(rows.columns(), ["policies", "fraud_cases", "avg_amount", "last_load"]);
        let rec = rows.first().expect("one row");
        assert_eq!(rec.i64("policies")?, Some(2));
        assert_eq!(rec.i64("fraud_cases")?, Some(1));
        assert_eq!(rec.f64("avg_amount")?, Some(150.25));
        assert_eq!(
            rec.timestamp("last_load")?,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_result_keeps_columns() -> Result<()> {
        let warehouse = DuckDBWarehouse::in_memory()?;
        warehouse.execute_batch("CREATE TABLE t (a INTEGER);")?;
        let rows = warehouse.query("SELECT a FROM t").await?;
        assert!(rows.is_empty());
        assert_eq!(rows.columns(), ["a"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_error() -> Result<()> {
        let warehouse = DuckDBWarehouse::in_memory()?;
        let result = warehouse.query("SELECT * FROM non_existent_table").await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_fails_at_query_time() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.duckdb");
        let warehouse = DuckDBWarehouse::new(path.to_string_lossy(), true);
        assert!(warehouse.query("SELECT 1").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_only_file_rejects_writes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("wh.duckdb").to_string_lossy().to_string();
        {
            let writer = DuckDBWarehouse::open(path.clone(), false)?;
            writer.execute_batch("CREATE TABLE t AS SELECT 42 AS answer;")?;
        }

        let reader = DuckDBWarehouse::open(path, true)?;
        let rows = reader.query("SELECT answer FROM t").await?;
        assert_eq!(rows.first().expect("row").i64("answer")?, Some(42));
        assert!(reader.execute_batch("DROP TABLE t;").is_err());
        Ok(())
    }
}
