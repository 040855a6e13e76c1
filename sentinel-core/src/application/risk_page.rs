// sentinel-core/src/application/risk_page.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::section::Section;
use crate::domain::error::DomainError;
use crate::domain::governance::{
    APPLIED_POLICIES, AppliedPolicy, GovernanceFeature, GovernedRecord, RoleView,
    governance_summary,
};
use crate::domain::risk::{AgeCategoryRisk, RiskLevel, RiskLevelStats, RiskOverview, StateRisk};
use crate::ports::warehouse::Record;

#[derive(Debug, Clone, Serialize)]
pub struct RiskDashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub overview: Section<RiskOverview>,
    pub age_analysis: Section<Vec<AgeCategoryRisk>>,
    pub geography: Section<Vec<StateRisk>>,
    pub risk_levels: Section<Vec<RiskLevelStats>>,
    pub role_view: Section<RoleView>,
    pub governed_sample: Section<Vec<GovernedRecord>>,
    pub applied_policies: &'static [AppliedPolicy],
    pub governance_summary: Vec<GovernanceFeature>,
}

impl RiskDashboard {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        title: impl Into<String>,
        now: DateTime<Utc>,
        overview: Section<RiskOverview>,
        age_analysis: Section<Vec<AgeCategoryRisk>>,
        geography: Section<Vec<StateRisk>>,
        risk_levels: Section<Vec<RiskLevelStats>>,
        role_view: Section<RoleView>,
        governed_sample: Section<Vec<GovernedRecord>>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: now,
            governance_summary: role_view.ready().map(governance_summary).unwrap_or_default(),
            overview,
            age_analysis,
            geography,
            risk_levels,
            role_view,
            governed_sample,
            applied_policies: APPLIED_POLICIES,
        }
    }
}

pub fn parse_overview(rec: Record<'_>) -> Result<RiskOverview, DomainError> {
    Ok(RiskOverview {
        total_customers: rec.count("total_customers")?,
        high_risk_count: rec.count("high_risk_count")?,
        medium_risk_count: rec.count("medium_risk_count")?,
        low_risk_count: rec.count("low_risk_count")?,
        avg_risk_score: rec.f64("avg_risk_score")?,
        avg_claim_amount: rec.f64("avg_claim_amount")?,
        last_refresh: rec.timestamp("last_refresh")?,
    })
}

pub fn parse_age_category(rec: Record<'_>) -> Result<AgeCategoryRisk, DomainError> {
    Ok(AgeCategoryRisk {
        age_category: rec.label("age_category")?,
        customer_count: rec.count("customer_count")?,
        avg_age_risk_score: rec.f64("avg_age_risk_score")?,
        avg_total_risk_score: rec.f64("avg_total_risk_score")?,
        high_risk_count: rec.count("high_risk_count")?,
    })
}

pub fn parse_state(rec: Record<'_>) -> Result<StateRisk, DomainError> {
    Ok(StateRisk {
        customer_state: rec.label("customer_state")?,
        customer_count: rec.count("customer_count")?,
        avg_risk_score: rec.f64("avg_risk_score")?,
        high_risk_count: rec.count("high_risk_count")?,
        avg_claim_amount: rec.f64("avg_claim_amount")?,
    })
}

pub fn parse_risk_level(rec: Record<'_>) -> Result<RiskLevelStats, DomainError> {
    let risk_level = rec.label("risk_level")?;
    Ok(RiskLevelStats {
        level: RiskLevel::parse(&risk_level),
        risk_level,
        count: rec.count("count")?,
        avg_score: rec.f64("avg_score")?,
        avg_claim: rec.f64("avg_claim")?,
        avg_premium: rec.f64("avg_premium")?,
    })
}

pub fn parse_role_view(rec: Record<'_>) -> Result<RoleView, DomainError> {
    Ok(RoleView {
        role_name: rec.label("role_name")?,
        visible_records: rec.count("visible_records")?,
        visible_states: rec.count("visible_states")?,
        avg_claim_amount: rec.f64("avg_claim_amount")?,
        max_claim_amount: rec.f64("max_claim_amount")?,
    })
}

pub fn parse_governed(rec: Record<'_>) -> Result<GovernedRecord, DomainError> {
    Ok(GovernedRecord {
        policy_number: rec.label("policy_number")?,
        age_category: rec.label("age_category")?,
        customer_state: rec.label("customer_state")?,
        risk_level: rec.label("risk_level")?,
        claim_amount: rec.f64("claim_amount_filled")?,
        total_risk_score: rec.f64("total_risk_score")?,
    })
}
