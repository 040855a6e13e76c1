// sentinel-core/src/domain/quality/check.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::{CheckType, QualityStatus, check_type_of, classify_metric};

/// One DMF measurement, already classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityCheck {
    pub table_name: String,
    pub metric_name: String,
    pub value: Option<f64>,
    pub measurement_time: Option<DateTime<Utc>>,
    pub change_commit_time: Option<DateTime<Utc>>,
    pub check_type: CheckType,
    pub status: QualityStatus,
}

impl QualityCheck {
    pub fn new(
        table_name: impl Into<String>,
        metric_name: impl Into<String>,
        value: Option<f64>,
        measurement_time: Option<DateTime<Utc>>,
    ) -> Self {
        let metric_name = metric_name.into();
        Self {
            table_name: table_name.into(),
            check_type: check_type_of(&metric_name),
            status: classify_metric(&metric_name, value),
            metric_name,
            value,
            measurement_time,
            change_commit_time: None,
        }
    }

    pub fn with_commit_time(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.change_commit_time = at;
        self
    }

    /// Last dotted segment of the metric name ("CLAIMS_RAW.NULL_COUNT" -> "NULL_COUNT").
    pub fn metric_function(&self) -> &str {
        self.metric_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.metric_name)
    }
}

/// Detail-table filter. `None` on a field means "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityFilter {
    pub table: Option<String>,
    pub check_type: Option<CheckType>,
    pub status: Option<QualityStatus>,
}

impl QualityFilter {
    pub fn matches(&self, check: &QualityCheck) -> bool {
        self.table
            .as_deref()
            .is_none_or(|t| t == check.table_name)
            && self.check_type.is_none_or(|ct| ct == check.check_type)
            && self.status.is_none_or(|s| s == check.status)
    }

    pub fn apply<'a>(&self, checks: &'a [QualityCheck]) -> Vec<&'a QualityCheck> {
        checks.iter().filter(|c| self.matches(c)).collect()
    }

    pub fn is_all(&self) -> bool {
        self.table.is_none() && self.check_type.is_none() && self.status.is_none()
    }
}

/// Dropdown options, in order of first appearance (the "All" entry is implied).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub tables: Vec<String>,
    pub check_types: Vec<CheckType>,
    pub statuses: Vec<QualityStatus>,
}

impl FilterOptions {
    pub fn from_checks(checks: &[QualityCheck]) -> Self {
        let mut options = Self::default();
        for check in checks {
            push_unique(&mut options.tables, check.table_name.clone());
            push_unique(&mut options.check_types, check.check_type);
            push_unique(&mut options.statuses, check.status);
        }
        options
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableQualitySummary {
    pub table_name: String,
    pub total_checks: usize,
    pub excellent: usize,
    pub good: usize,
    pub needs_attention: usize,
}

impl TableQualitySummary {
    pub fn by_table(checks: &[QualityCheck]) -> Vec<Self> {
        let mut summaries: Vec<Self> = Vec::new();
        for check in checks {
            let idx = match summaries
                .iter()
                .position(|s| s.table_name == check.table_name)
            {
                Some(idx) => idx,
                None => {
                    summaries.push(Self {
                        table_name: check.table_name.clone(),
                        ..Self::default()
                    });
                    summaries.len() - 1
                }
            };
            let summary = &mut summaries[idx];
            summary.total_checks += 1;
            match check.status {
                QualityStatus::Excellent => summary.excellent += 1,
                QualityStatus::Good => summary.good += 1,
                QualityStatus::NeedsAttention => summary.needs_attention += 1,
                _ => {}
            }
        }
        summaries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckTypeCount {
    pub check_type: CheckType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: QualityStatus,
    pub count: usize,
}

pub fn check_type_counts(checks: &[QualityCheck]) -> Vec<CheckTypeCount> {
    value_counts(checks.iter().map(|c| c.check_type))
        .into_iter()
        .map(|(check_type, count)| CheckTypeCount { check_type, count })
        .collect()
}

pub fn status_counts(checks: &[QualityCheck]) -> Vec<StatusCount> {
    value_counts(checks.iter().map(|c| c.status))
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

// Descending by count; ties keep first-appearance order (stable sort).
fn value_counts<T: PartialEq + Copy>(items: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(k, _)| *k == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
