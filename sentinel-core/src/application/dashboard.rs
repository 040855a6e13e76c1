// sentinel-core/src/application/dashboard.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::cache::QueryCache;
use crate::application::engine::fetch_rows;
use crate::application::quality_page::{
    QualityDashboard, parse_check, parse_function, parse_pipeline,
};
use crate::application::queries::{QueryCatalog, QueryId};
use crate::application::risk_page::{
    RiskDashboard, parse_age_category, parse_governed, parse_overview, parse_risk_level,
    parse_role_view, parse_state,
};
use crate::application::section::Section;
use crate::domain::configuration::SentinelConfig;
use crate::domain::quality::QualityFilter;
use crate::error::SentinelError;
use crate::ports::clock::Clock;
use crate::ports::warehouse::{ResultSet, Warehouse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Quality,
    Risk,
}

impl PageKind {
    pub const ALL: [PageKind; 2] = [PageKind::Quality, PageKind::Risk];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Quality => "quality",
            PageKind::Risk => "risk",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quality" => Ok(PageKind::Quality),
            "risk" => Ok(PageKind::Risk),
            other => Err(SentinelError::InternalError(format!(
                "unknown page '{}', expected 'quality' or 'risk'",
                other
            ))),
        }
    }
}

/// Owns the warehouse, the query cache and the clock, and turns cached
/// result sets into page view models. Queries run one after the other.
pub struct DashboardService {
    title: String,
    warehouse: Arc<dyn Warehouse>,
    catalog: QueryCatalog,
    cache: QueryCache<Arc<ResultSet>>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(
        config: &SentinelConfig,
        warehouse: Arc<dyn Warehouse>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SentinelError> {
        let catalog = QueryCatalog::compile(config)?;
        info!(engine = warehouse.engine_name(), "📊 Dashboard service ready");
        Ok(Self {
            title: config.name.clone(),
            warehouse,
            catalog,
            cache: QueryCache::new(clock.clone()),
            clock,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    async fn rows(&self, id: QueryId) -> Result<Arc<ResultSet>, SentinelError> {
        let query = self.catalog.get(id)?;
        self.cache
            .get_or_fetch(id.as_str(), query.ttl, || async {
                fetch_rows(self.warehouse.as_ref(), query).await.map(Arc::new)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn quality_page(&self, filter: QualityFilter) -> QualityDashboard {
        let checks = self.rows(QueryId::DmfResults).await;
        let checks = Section::from_rows("dmf_results", checks.as_deref(), parse_check);

        let pipeline = self.rows(QueryId::PipelineSummary).await;
        let pipeline = Section::from_first("pipeline_summary", pipeline.as_deref(), parse_pipeline);

        let functions = self.rows(QueryId::ActiveDmfFunctions).await;
        let functions =
            Section::from_rows("active_dmf_functions", functions.as_deref(), parse_function);

        QualityDashboard::build(&self.title, self.now(), checks, pipeline, functions, filter)
    }

    #[instrument(skip(self))]
    pub async fn risk_page(&self) -> RiskDashboard {
        let overview = self.rows(QueryId::RiskOverview).await;
        let overview = Section::from_first("risk_overview", overview.as_deref(), parse_overview);

        let age = self.rows(QueryId::AgeCategoryAnalysis).await;
        let age = Section::from_rows("age_category_analysis", age.as_deref(), parse_age_category);

        let geo = self.rows(QueryId::GeographicDistribution).await;
        let geo = Section::from_rows("geographic_distribution", geo.as_deref(), parse_state);

        let levels = self.rows(QueryId::RiskLevelAnalysis).await;
        let levels = Section::from_rows("risk_level_analysis", levels.as_deref(), parse_risk_level);

        let role = self.rows(QueryId::GovernanceRoleView).await;
        let role = Section::from_first("governance_role_view", role.as_deref(), parse_role_view);

        let sample = self.rows(QueryId::GovernedSample).await;
        let sample = Section::from_rows("governed_sample", sample.as_deref(), parse_governed);

        RiskDashboard::build(&self.title, self.now(), overview, age, geo, levels, role, sample)
    }
}
