// sentinel-core/src/application/quality_page.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::section::Section;
use crate::domain::alerts::{QualityIssue, Recommendation, issues, recommend};
use crate::domain::error::DomainError;
use crate::domain::freshness::Freshness;
use crate::domain::pipeline::{DmfFunction, PipelineSummary};
use crate::domain::quality::{
    CheckTypeCount, FilterOptions, PortfolioScore, QualityCheck, QualityFilter, QualityStatus,
    StatusCount, TableQualitySummary, check_type_counts, status_counts,
};
use crate::ports::warehouse::Record;

/// Everything the data-quality page shows, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct QualityDashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub score: PortfolioScore,
    pub pipeline: Section<PipelineSummary>,
    pub freshness: Option<Freshness>,
    pub checks: Section<Vec<QualityCheck>>,
    pub table_summary: Vec<TableQualitySummary>,
    pub check_types: Vec<CheckTypeCount>,
    pub status_distribution: Vec<StatusCount>,
    pub filter: QualityFilter,
    pub filter_options: FilterOptions,
    pub detail: Vec<QualityCheck>,
    pub functions: Section<Vec<DmfFunction>>,
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<Recommendation>,
}

impl QualityDashboard {
    pub fn build(
        title: impl Into<String>,
        now: DateTime<Utc>,
        checks: Section<Vec<QualityCheck>>,
        pipeline: Section<PipelineSummary>,
        functions: Section<Vec<DmfFunction>>,
        filter: QualityFilter,
    ) -> Self {
        let all = checks.items();
        let score = PortfolioScore::from_statuses(all.iter().map(|c| c.status));
        let freshness = pipeline.ready().and_then(|p| p.freshness(now));

        Self {
            title: title.into(),
            generated_at: now,
            table_summary: TableQualitySummary::by_table(all),
            check_types: check_type_counts(all),
            status_distribution: status_counts(all),
            filter_options: FilterOptions::from_checks(all),
            detail: filter.apply(all).into_iter().cloned().collect(),
            issues: issues(all),
            recommendations: recommend(all, freshness.as_ref(), functions.items(), &score),
            score,
            freshness,
            filter,
            checks,
            pipeline,
            functions,
        }
    }

    /// CI gate: rating GOOD or better and a known, non-stale last load.
    pub fn is_healthy(&self) -> bool {
        let rated_ok = matches!(
            self.score.rating,
            Some(QualityStatus::Excellent | QualityStatus::Good)
        );
        let fresh = self.freshness.as_ref().is_some_and(|f| !f.is_stale());
        rated_ok && fresh
    }
}

pub fn parse_check(rec: Record<'_>) -> Result<QualityCheck, DomainError> {
    Ok(QualityCheck::new(
        rec.label("table_name")?,
        rec.label("metric_name")?,
        rec.f64("value")?,
        rec.timestamp("measurement_time")?,
    )
    .with_commit_time(rec.timestamp("change_commit_time")?))
}

pub fn parse_pipeline(rec: Record<'_>) -> Result<PipelineSummary, DomainError> {
    Ok(PipelineSummary {
        unique_policies: rec.count("unique_policies")?,
        fraud_cases: rec.count("fraud_cases")?,
        avg_claim_amount: rec.f64("avg_claim_amount")?,
        last_pipeline_run: rec.timestamp("last_pipeline_run")?,
        files_processed: rec.count("files_processed")?,
    })
}

pub fn parse_function(rec: Record<'_>) -> Result<DmfFunction, DomainError> {
    Ok(DmfFunction {
        metric_name: rec.label("metric_name")?,
        ref_entity_name: rec.label("ref_entity_name")?,
        schedule: rec.text("schedule")?,
        schedule_status: rec.label("schedule_status")?,
    })
}
