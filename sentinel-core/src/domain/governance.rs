// sentinel-core/src/domain/governance.rs

// Masking and row-access policies are enforced warehouse-side. We only show
// what the current role is allowed to see, and say which policies apply.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleView {
    pub role_name: String,
    pub visible_records: i64,
    pub visible_states: i64,
    pub avg_claim_amount: Option<f64>,
    pub max_claim_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernedRecord {
    pub policy_number: String,
    pub age_category: String,
    pub customer_state: String,
    pub risk_level: String,
    pub claim_amount: Option<f64>,
    pub total_risk_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedPolicy {
    pub icon: &'static str,
    pub name: &'static str,
    pub effect: &'static str,
}

pub const APPLIED_POLICIES: &[AppliedPolicy] = &[
    AppliedPolicy {
        icon: "🎭",
        name: "Data Masking",
        effect: "Claim amounts floored to $10K increments",
    },
    AppliedPolicy {
        icon: "🗺️",
        name: "Row Access",
        effect: "Limited to CO/UT/WY territories",
    },
    AppliedPolicy {
        icon: "🔒",
        name: "Account-Aware",
        effect: "Different access based on role/account",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceFeature {
    pub feature: &'static str,
    pub status: String,
    pub business_impact: &'static str,
}

pub fn governance_summary(view: &RoleView) -> Vec<GovernanceFeature> {
    vec![
        GovernanceFeature {
            feature: "Data Masking",
            status: "✅ Active (Claim amounts masked)".into(),
            business_impact: "Protects sensitive financial data",
        },
        GovernanceFeature {
            feature: "Row Access Control",
            status: "✅ Active (Territory-based)".into(),
            business_impact: "Ensures appropriate data access",
        },
        GovernanceFeature {
            feature: "Geographic Restriction",
            status: format!("✅ Active ({} states only)", view.visible_states),
            business_impact: "Maintains broker territory boundaries",
        },
        GovernanceFeature {
            feature: "Real-time Enforcement",
            status: "✅ Active (Policy-enforced)".into(),
            business_impact: "Zero configuration for consumers",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reports_visible_states() {
        let view = RoleView {
            role_name: "BROKER".into(),
            visible_records: 120,
            visible_states: 3,
            avg_claim_amount: Some(20000.0),
            max_claim_amount: Some(90000.0),
        };
        let summary = governance_summary(&view);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[2].status, "✅ Active (3 states only)");
    }
}
