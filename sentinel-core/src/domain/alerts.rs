// sentinel-core/src/domain/alerts.rs

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::freshness::Freshness;
use crate::domain::pipeline::{DmfFunction, stopped_functions};
use crate::domain::quality::{PortfolioScore, QualityCheck, QualityStatus};

// Issue counts above this are critical, at or below it a warning.
const CRITICAL_VALUE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn for_value(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > CRITICAL_VALUE => Self::Critical,
            _ => Self::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A check in NEEDS ATTENTION, ready to be shown as an alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub description: String,
    pub table_name: String,
    pub metric_name: String,
    pub value: Option<f64>,
    pub status: QualityStatus,
    pub measured_at: Option<DateTime<Utc>>,
}

impl QualityIssue {
    pub fn from_check(check: &QualityCheck) -> Self {
        Self {
            severity: Severity::for_value(check.value),
            description: describe(check),
            table_name: check.table_name.clone(),
            metric_name: check.metric_name.clone(),
            value: check.value,
            status: check.status,
            measured_at: check.measurement_time,
        }
    }
}

pub fn issues(checks: &[QualityCheck]) -> Vec<QualityIssue> {
    checks
        .iter()
        .filter(|c| c.status == QualityStatus::NeedsAttention)
        .map(QualityIssue::from_check)
        .collect()
}

fn describe(check: &QualityCheck) -> String {
    // The metric prefix is a namespace (SNOWFLAKE.CORE) or the table itself;
    // only `table_name` reliably names the table.
    match check.metric_function() {
        "INVALID_CLAIM_AMOUNT_COUNT" => {
            "Claims with invalid amounts (outside $100-$500K range)".to_string()
        }
        "INVALID_CUSTOMER_AGE_COUNT" => {
            "Customers with invalid ages (outside 18-100 range)".to_string()
        }
        "NULL_COUNT" => format!("Records with missing values in {}", check.table_name),
        "DUPLICATE_COUNT" => format!("Duplicate records found in {}", check.table_name),
        _ => format!("Quality issue in {}", check.metric_name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    ChecksNeedAttention(usize),
    StaleData,
    StoppedFunctions(usize),
    LowQualityScore,
    AllClear,
}

impl Recommendation {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::ChecksNeedAttention(_) => "🔍",
            Self::StaleData => "⏰",
            Self::StoppedFunctions(_) => "⚙️",
            Self::LowQualityScore => "📊",
            Self::AllClear => "✅",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecksNeedAttention(n) => write!(
                f,
                "{} DMF checks need attention - investigate data quality issues",
                n
            ),
            Self::StaleData => write!(
                f,
                "Data pipeline may need attention - last update was over 2 hours ago"
            ),
            Self::StoppedFunctions(n) => write!(
                f,
                "{} DMF functions are not running - check monitoring schedule",
                n
            ),
            Self::LowQualityScore => write!(
                f,
                "Overall DMF quality score is below optimal - review data ingestion processes"
            ),
            Self::AllClear => write!(
                f,
                "Pipeline is running optimally with excellent DMF monitoring - continue monitoring"
            ),
        }
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{} {}", self.icon(), self))
    }
}

/// Health recommendations for the pipeline, most urgent first.
pub fn recommend(
    checks: &[QualityCheck],
    freshness: Option<&Freshness>,
    functions: &[DmfFunction],
    score: &PortfolioScore,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let needs_attention = checks
        .iter()
        .filter(|c| c.status == QualityStatus::NeedsAttention)
        .count();
    if needs_attention > 0 {
        out.push(Recommendation::ChecksNeedAttention(needs_attention));
    }

    if freshness.is_some_and(Freshness::is_stale) {
        out.push(Recommendation::StaleData);
    }

    let stopped = stopped_functions(functions);
    if stopped > 0 {
        out.push(Recommendation::StoppedFunctions(stopped));
    }

    if score.below_optimal() {
        out.push(Recommendation::LowQualityScore);
    }

    if out.is_empty() {
        out.push(Recommendation::AllClear);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn check(metric: &str, value: f64) -> QualityCheck {
        QualityCheck::new("CLAIMS_RAW", metric, Some(value), None)
    }

    #[test]
    fn test_issue_severity_and_description() {
        let rows = vec![
            check("INVALID_CLAIM_AMOUNT_COUNT", 14.0),
            check("CLAIMS_RAW.DUPLICATE_COUNT", 3.0),
            check("CLAIMS_RAW.NULL_COUNT", 0.0),
        ];
        let found = issues(&rows);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].severity, Severity::Critical);
        assert!(found[0].description.contains("invalid amounts"));
        assert_eq!(found[1].severity, Severity::Warning);
        assert_eq!(found[1].description, "Duplicate records found in CLAIMS_RAW");
    }

    #[test]
    fn test_namespaced_metric_describes_the_table() {
        let nulls = QualityCheck::new("CUSTOMER_RAW", "SNOWFLAKE.CORE.NULL_COUNT", Some(40.0), None);
        assert_eq!(
            QualityIssue::from_check(&nulls).description,
            "Records with missing values in CUSTOMER_RAW"
        );
        let dups = QualityCheck::new("CLAIMS_RAW", "SNOWFLAKE.CORE.DUPLICATE_COUNT", Some(7.0), None);
        assert_eq!(
            QualityIssue::from_check(&dups).description,
            "Duplicate records found in CLAIMS_RAW"
        );
    }

    #[test]
    fn test_unknown_function_gets_generic_description() {
        let row = QualityCheck::new("CUSTOMER_RAW", "NULL_COUNT", Some(40.0), None);
        assert_eq!(
            QualityIssue::from_check(&row).description,
            "Records with missing values in CUSTOMER_RAW"
        );
        let odd = QualityCheck::new("T", "INVALID_ZIP", Some(9.0), None);
        assert_eq!(QualityIssue::from_check(&odd).description, "Quality issue in INVALID_ZIP");
    }

    #[test]
    fn test_stale_pipeline_recommendation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let freshness = Freshness::at(now - Duration::minutes(150), now);
        let rows = vec![check("CLAIMS_RAW.NULL_COUNT", 0.0)];
        let score = PortfolioScore::from_statuses(rows.iter().map(|c| c.status));

        let recs = recommend(&rows, Some(&freshness), &[], &score);
        assert_eq!(recs, vec![Recommendation::StaleData]);
        assert!(recs[0].to_string().contains("pipeline may need attention"));
    }

    #[test]
    fn test_recommendation_order() {
        let rows = vec![check("CLAIMS_RAW.NULL_COUNT", 50.0)];
        let score = PortfolioScore::from_statuses(rows.iter().map(|c| c.status));
        let stopped = DmfFunction {
            metric_name: "ROW_COUNT".into(),
            ref_entity_name: "DB.RAW.CLAIMS_RAW".into(),
            schedule: None,
            schedule_status: "SUSPENDED".into(),
        };
        let recs = recommend(&rows, None, &[stopped], &score);
        assert_eq!(
            recs,
            vec![
                Recommendation::ChecksNeedAttention(1),
                Recommendation::StoppedFunctions(1),
                Recommendation::LowQualityScore,
            ]
        );
    }

    #[test]
    fn test_all_clear_when_nothing_to_report() {
        let score = PortfolioScore::from_statuses([]);
        assert_eq!(recommend(&[], None, &[], &score), vec![Recommendation::AllClear]);
    }
}
