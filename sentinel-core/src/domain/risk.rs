// sentinel-core/src/domain/risk.rs

// Risk records are scored upstream; this side only reads aggregates.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskOverview {
    pub total_customers: i64,
    pub high_risk_count: i64,
    pub medium_risk_count: i64,
    pub low_risk_count: i64,
    pub avg_risk_score: Option<f64>,
    pub avg_claim_amount: Option<f64>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl RiskOverview {
    /// Share of the portfolio in HIGH, 0 for an empty portfolio.
    pub fn high_risk_pct(&self) -> f64 {
        percentage(self.high_risk_count, self.total_customers)
    }
}

pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeCategoryRisk {
    pub age_category: String,
    pub customer_count: i64,
    pub avg_age_risk_score: Option<f64>,
    pub avg_total_risk_score: Option<f64>,
    pub high_risk_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRisk {
    pub customer_state: String,
    pub customer_count: i64,
    pub avg_risk_score: Option<f64>,
    pub high_risk_count: i64,
    pub avg_claim_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskLevelStats {
    pub risk_level: String,
    pub level: Option<RiskLevel>,
    pub count: i64,
    pub avg_score: Option<f64>,
    pub avg_claim: Option<f64>,
    pub avg_premium: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview(high: i64, total: i64) -> RiskOverview {
        RiskOverview {
            total_customers: total,
            high_risk_count: high,
            medium_risk_count: 0,
            low_risk_count: total - high,
            avg_risk_score: Some(42.0),
            avg_claim_amount: None,
            last_refresh: None,
        }
    }

    #[test]
    fn test_high_risk_percentage() {
        assert!((overview(25, 200).high_risk_pct() - 12.5).abs() < 1e-9);
        assert_eq!(overview(0, 0).high_risk_pct(), 0.0);
    }

    #[test]
    fn test_risk_level_parsing_and_order() {
        assert_eq!(RiskLevel::parse(" high "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("extreme"), None);
        assert!(RiskLevel::High > RiskLevel::Medium);
    }
}
