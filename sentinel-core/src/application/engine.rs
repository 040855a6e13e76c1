// sentinel-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::application::queries::CompiledQuery;
use crate::error::SentinelError;
use crate::ports::warehouse::{ResultSet, Warehouse};

/// Runs one catalog query with instrumentation (span, timing, error log).
/// The error is logged here, where the timing is known, then handed back
/// so the page can render it inline.
#[instrument(skip_all, fields(query = %query.id, engine = warehouse.engine_name()))]
pub async fn fetch_rows(
    warehouse: &dyn Warehouse,
    query: &CompiledQuery,
) -> Result<ResultSet, SentinelError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query.sql);

    let result = warehouse.query(&query.sql).await;
    let duration = start.elapsed();

    match result {
        Ok(rows) => {
            debug!(rows = rows.len(), "✅ Query finished in {:.2?}", duration);
            Ok(rows)
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
