// sentinel-core/src/domain/pipeline.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::freshness::Freshness;

/// One-row aggregate over the raw claims table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub unique_policies: i64,
    pub fraud_cases: i64,
    pub avg_claim_amount: Option<f64>,
    pub last_pipeline_run: Option<DateTime<Utc>>,
    pub files_processed: i64,
}

impl PipelineSummary {
    pub fn freshness(&self, now: DateTime<Utc>) -> Option<Freshness> {
        self.last_pipeline_run.map(|last| Freshness::at(last, now))
    }
}

pub const RUNNING_SCHEDULE_STATUS: &str = "STARTED";

/// A data metric function attached to a monitored table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmfFunction {
    pub metric_name: String,
    pub ref_entity_name: String,
    pub schedule: Option<String>,
    pub schedule_status: String,
}

impl DmfFunction {
    pub fn is_running(&self) -> bool {
        self.schedule_status == RUNNING_SCHEDULE_STATUS
    }

    pub fn table_name(&self) -> &str {
        self.ref_entity_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.ref_entity_name)
    }
}

pub fn stopped_functions(functions: &[DmfFunction]) -> usize {
    functions.iter().filter(|f| !f.is_running()).count()
}
