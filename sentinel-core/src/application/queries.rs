// sentinel-core/src/application/queries.rs

// The fixed catalog of read queries behind the two pages. Templates are
// rendered once against the static `sources` constants and checked by the
// read-only guard, so a bad template fails at startup, not mid-render.

use minijinja::context;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::configuration::SentinelConfig;
use crate::error::SentinelError;
use crate::infrastructure::compiler::{ReadOnlyGuard, SqlRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryId {
    DmfResults,
    PipelineSummary,
    ActiveDmfFunctions,
    RiskOverview,
    AgeCategoryAnalysis,
    GeographicDistribution,
    RiskLevelAnalysis,
    GovernanceRoleView,
    GovernedSample,
}

/// How long a result may be served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Pipeline monitoring and risk aggregates.
    Fast,
    /// DMF schedules and governance snapshots change rarely.
    Slow,
}

impl QueryId {
    pub const ALL: [QueryId; 9] = [
        QueryId::DmfResults,
        QueryId::PipelineSummary,
        QueryId::ActiveDmfFunctions,
        QueryId::RiskOverview,
        QueryId::AgeCategoryAnalysis,
        QueryId::GeographicDistribution,
        QueryId::RiskLevelAnalysis,
        QueryId::GovernanceRoleView,
        QueryId::GovernedSample,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryId::DmfResults => "dmf_results",
            QueryId::PipelineSummary => "pipeline_summary",
            QueryId::ActiveDmfFunctions => "active_dmf_functions",
            QueryId::RiskOverview => "risk_overview",
            QueryId::AgeCategoryAnalysis => "age_category_analysis",
            QueryId::GeographicDistribution => "geographic_distribution",
            QueryId::RiskLevelAnalysis => "risk_level_analysis",
            QueryId::GovernanceRoleView => "governance_role_view",
            QueryId::GovernedSample => "governed_sample",
        }
    }

    pub fn ttl_class(&self) -> TtlClass {
        match self {
            QueryId::ActiveDmfFunctions | QueryId::GovernanceRoleView | QueryId::GovernedSample => {
                TtlClass::Slow
            }
            _ => TtlClass::Fast,
        }
    }

    fn template(&self) -> &'static str {
        match self {
            QueryId::DmfResults => include_str!("../../sql/dmf_results.sql"),
            QueryId::PipelineSummary => include_str!("../../sql/pipeline_summary.sql"),
            QueryId::ActiveDmfFunctions => include_str!("../../sql/active_dmf_functions.sql"),
            QueryId::RiskOverview => include_str!("../../sql/risk_overview.sql"),
            QueryId::AgeCategoryAnalysis => include_str!("../../sql/age_category_analysis.sql"),
            QueryId::GeographicDistribution => {
                include_str!("../../sql/geographic_distribution.sql")
            }
            QueryId::RiskLevelAnalysis => include_str!("../../sql/risk_level_analysis.sql"),
            QueryId::GovernanceRoleView => include_str!("../../sql/governance_role_view.sql"),
            QueryId::GovernedSample => include_str!("../../sql/governed_sample.sql"),
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub id: QueryId,
    pub sql: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct QueryCatalog {
    queries: HashMap<QueryId, CompiledQuery>,
}

impl QueryCatalog {
    #[instrument(skip(config), fields(database = %config.sources.database))]
    pub fn compile(config: &SentinelConfig) -> Result<Self, SentinelError> {
        let renderer = SqlRenderer::new();
        let sources = &config.sources;

        let tables: Vec<String> = sources
            .monitored_tables
            .iter()
            .map(|t| t.to_uppercase())
            .collect();
        let qualified_tables: Vec<String> = tables
            .iter()
            .map(|t| {
                format!("{}.{}.{}", sources.database, sources.raw_schema, t).to_uppercase()
            })
            .collect();
        let ctx = context! {
            sources => sources,
            tables => tables,
            qualified_tables => qualified_tables,
            role => &config.warehouse.role,
        };

        let mut queries = HashMap::with_capacity(QueryId::ALL.len());
        for id in QueryId::ALL {
            let sql = renderer.render(id.template(), &ctx)?;
            ReadOnlyGuard::check(id.as_str(), &sql)?;
            debug!(query = %id, "compiled:\n{}", sql);

            let ttl = match id.ttl_class() {
                TtlClass::Fast => config.cache.fast_ttl(),
                TtlClass::Slow => config.cache.slow_ttl(),
            };
            queries.insert(id, CompiledQuery { id, sql, ttl });
        }

        info!(queries = queries.len(), "📚 Query catalog compiled");
        Ok(Self { queries })
    }

    pub fn get(&self, id: QueryId) -> Result<&CompiledQuery, SentinelError> {
        self.queries
            .get(&id)
            .ok_or_else(|| SentinelError::UnknownQuery(id.to_string()))
    }
}
