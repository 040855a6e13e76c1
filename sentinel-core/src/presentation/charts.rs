// sentinel-core/src/presentation/charts.rs

// Plotly figure specs ({data, layout}) built from the page view models.
// The browser side only calls Plotly.newPlot(id, spec).

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::domain::quality::{CheckTypeCount, QualityCheck, StatusCount, TableQualitySummary};
use crate::domain::risk::{AgeCategoryRisk, RiskLevelStats, StateRisk};
use crate::presentation::style;

pub const HISTOGRAM_BINS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub data: Vec<Value>,
    pub layout: Value,
}

impl ChartSpec {
    fn new(id: &'static str, title: &str, height: u32, data: Vec<Value>) -> Self {
        Self {
            id,
            data,
            layout: json!({
                "title": { "text": title, "font": { "color": style::MID_BLUE } },
                "height": height,
                "margin": { "t": 50, "l": 50, "r": 20, "b": 50 },
                "plot_bgcolor": "rgba(0,0,0,0)",
                "paper_bgcolor": "rgba(0,0,0,0)",
            }),
        }
    }

    fn with_layout(mut self, key: &str, value: Value) -> Self {
        if let Some(layout) = self.layout.as_object_mut() {
            layout.insert(key.to_string(), value);
        }
        self
    }

    /// JSON safe to inline in a `<script>` element. No raw `<` survives,
    /// so neither `</script` nor `<!--` can change how the tag is parsed.
    pub fn to_script_json(&self) -> String {
        let raw = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        raw.replace('<', "\\u003c")
    }
}

// --- Data quality page ---

pub fn status_by_table(summary: &[TableQualitySummary]) -> ChartSpec {
    let tables: Vec<&str> = summary.iter().map(|s| s.table_name.as_str()).collect();
    let series = [
        ("excellent", style::GREEN, summary.iter().map(|s| s.excellent).collect::<Vec<_>>()),
        ("good", style::TEAL, summary.iter().map(|s| s.good).collect()),
        (
            "needs_attention",
            style::RED,
            summary.iter().map(|s| s.needs_attention).collect(),
        ),
    ];
    let data = series
        .into_iter()
        .map(|(name, color, counts)| {
            json!({
                "type": "bar", "name": name, "x": tables, "y": counts,
                "marker": { "color": color },
            })
        })
        .collect();

    ChartSpec::new("status-by-table", "Quality Status Distribution by Table", 300, data)
        .with_layout("barmode", json!("stack"))
        .with_layout("xaxis", json!({ "title": { "text": "Table Name" } }))
        .with_layout("yaxis", json!({ "title": { "text": "Count of Checks" } }))
}

pub fn check_type_donut(counts: &[CheckTypeCount]) -> ChartSpec {
    let data = vec![json!({
        "type": "pie",
        "hole": 0.4,
        "labels": counts.iter().map(|c| c.check_type.as_str()).collect::<Vec<_>>(),
        "values": counts.iter().map(|c| c.count).collect::<Vec<_>>(),
    })];
    ChartSpec::new("check-types", "DMF Check Type Distribution", 300, data)
}

/// One line per (table, metric), points in measurement order.
pub fn value_trends(checks: &[QualityCheck]) -> ChartSpec {
    let mut series: BTreeMap<(&str, &str), Vec<(String, f64)>> = BTreeMap::new();
    for check in checks {
        if let (Some(at), Some(value)) = (check.measurement_time, check.value) {
            series
                .entry((check.table_name.as_str(), check.metric_name.as_str()))
                .or_default()
                .push((at.to_rfc3339(), value));
        }
    }

    let data = series
        .into_iter()
        .map(|((table, metric), mut points)| {
            points.sort_by(|a, b| a.0.cmp(&b.0));
            let (x, y): (Vec<_>, Vec<_>) = points.into_iter().unzip();
            json!({
                "type": "scatter", "mode": "lines+markers",
                "name": format!("{table} / {metric}"), "x": x, "y": y,
            })
        })
        .collect();

    ChartSpec::new("value-trends", "DMF Values Over Time", 400, data)
        .with_layout("xaxis", json!({ "title": { "text": "Time" } }))
        .with_layout("yaxis", json!({ "title": { "text": "DMF Value" } }))
}

pub fn status_distribution(counts: &[StatusCount]) -> ChartSpec {
    let data = vec![json!({
        "type": "bar",
        "x": counts.iter().map(|c| c.status.as_str()).collect::<Vec<_>>(),
        "y": counts.iter().map(|c| c.count).collect::<Vec<_>>(),
        "marker": {
            "color": counts.iter().map(|c| style::status_color(c.status)).collect::<Vec<_>>()
        },
    })];
    ChartSpec::new("status-distribution", "Current Quality Status Distribution", 300, data)
        .with_layout("showlegend", json!(false))
}

pub fn value_histogram(checks: &[QualityCheck]) -> ChartSpec {
    // Trace order = first appearance of the check type
    let mut order = Vec::new();
    let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for check in checks {
        if let Some(value) = check.value {
            let key = check.check_type.as_str();
            if !values.contains_key(key) {
                order.push(key);
            }
            values.entry(key).or_default().push(value);
        }
    }

    let data = order
        .into_iter()
        .map(|key| {
            json!({
                "type": "histogram", "name": key,
                "x": values.get(key).cloned().unwrap_or_default(),
                "nbinsx": HISTOGRAM_BINS,
            })
        })
        .collect();

    ChartSpec::new("value-histogram", "DMF Values Distribution by Check Type", 300, data)
        .with_layout("barmode", json!("overlay"))
}

// --- Risk page ---

pub fn age_risk_bar(rows: &[AgeCategoryRisk]) -> ChartSpec {
    let data = vec![json!({
        "type": "bar",
        "x": rows.iter().map(|r| r.age_category.as_str()).collect::<Vec<_>>(),
        "y": rows.iter().map(|r| r.avg_total_risk_score).collect::<Vec<_>>(),
        "marker": {
            "color": rows.iter().map(|r| r.avg_total_risk_score).collect::<Vec<_>>(),
            "colorscale": [[0, style::STAR_BLUE], [0.5, style::VALENCIA_ORANGE], [1, style::FIRST_LIGHT]],
        },
    })];
    ChartSpec::new("age-risk", "Average Risk Score by Age Category", 350, data)
        .with_layout("showlegend", json!(false))
        .with_layout("xaxis", json!({ "title": { "text": "Age Category" } }))
        .with_layout("yaxis", json!({ "title": { "text": "Average Risk Score" } }))
}

pub fn state_pie(rows: &[StateRisk]) -> ChartSpec {
    let data = vec![json!({
        "type": "pie",
        "labels": rows.iter().map(|r| r.customer_state.as_str()).collect::<Vec<_>>(),
        "values": rows.iter().map(|r| r.customer_count).collect::<Vec<_>>(),
        "marker": { "colors": [style::MAIN, style::STAR_BLUE, style::VALENCIA_ORANGE, style::PURPLE_MOON] },
    })];
    ChartSpec::new("state-distribution", "Customer Distribution by State", 350, data)
}

fn level_color(row: &RiskLevelStats) -> &'static str {
    row.level.map(style::risk_color).unwrap_or(style::MEDIUM_GRAY)
}

pub fn risk_level_donut(rows: &[RiskLevelStats]) -> ChartSpec {
    let data = vec![json!({
        "type": "pie",
        "hole": 0.4,
        "labels": rows.iter().map(|r| r.risk_level.as_str()).collect::<Vec<_>>(),
        "values": rows.iter().map(|r| r.count).collect::<Vec<_>>(),
        "marker": { "colors": rows.iter().map(level_color).collect::<Vec<_>>() },
    })];
    ChartSpec::new("risk-levels", "Risk Level Distribution", 400, data)
}

/// One marker per risk level, sized by customer count.
pub fn premium_scatter(rows: &[RiskLevelStats]) -> ChartSpec {
    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1) as f64;
    let data = rows
        .iter()
        .map(|r| {
            json!({
                "type": "scatter", "mode": "markers", "name": r.risk_level,
                "x": [r.avg_premium], "y": [r.avg_score],
                "marker": {
                    "size": [12.0 + 38.0 * (r.count as f64 / max_count)],
                    "color": level_color(r),
                },
            })
        })
        .collect();
    ChartSpec::new("premium-vs-score", "Risk Score vs Premium Analysis", 400, data)
        .with_layout("xaxis", json!({ "title": { "text": "Average Premium ($)" } }))
        .with_layout("yaxis", json!({ "title": { "text": "Average Risk Score" } }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::QualityStatus;
    use crate::domain::risk::RiskLevel;
    use chrono::{Duration, TimeZone, Utc};

    fn checks() -> Vec<QualityCheck> {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        vec![
            QualityCheck::new("CLAIMS_RAW", "NULL_COUNT", Some(2.0), Some(t0)),
            QualityCheck::new("CLAIMS_RAW", "NULL_COUNT", Some(0.0), Some(t0 - Duration::hours(1))),
            QualityCheck::new("CLAIMS_RAW", "INVALID_CLAIM_AMOUNT_COUNT", Some(4.0), Some(t0)),
            QualityCheck::new("CUSTOMER_RAW", "ROW_COUNT", None, Some(t0)),
        ]
    }

    #[test]
    fn test_trends_are_sorted_per_series() {
        let spec = value_trends(&checks());
        assert_eq!(spec.data.len(), 2);
        let null_series = &spec.data[1];
        assert_eq!(null_series["name"], "CLAIMS_RAW / NULL_COUNT");
        assert_eq!(null_series["y"], json!([0.0, 2.0]));
    }

    #[test]
    fn test_histogram_skips_missing_values() {
        let spec = value_histogram(&checks());
        assert_eq!(spec.data.len(), 2);
        assert_eq!(spec.data[0]["name"], "Completeness");
        assert_eq!(spec.data[0]["nbinsx"], 15);
    }

    #[test]
    fn test_status_bars_use_status_colors() {
        let spec = status_distribution(&[StatusCount {
            status: QualityStatus::NeedsAttention,
            count: 3,
        }]);
        assert_eq!(spec.data[0]["marker"]["color"], json!([style::RED]));
    }

    #[test]
    fn test_script_json_cannot_close_the_tag() {
        let spec = state_pie(&[StateRisk {
            customer_state: "</script><script>alert(1)".into(),
            customer_count: 1,
            avg_risk_score: None,
            high_risk_count: 0,
            avg_claim_amount: None,
        }]);
        let json = spec.to_script_json();
        assert!(!json.contains('<'));
        assert!(json.contains("\\u003c/script>"));
    }

    #[test]
    fn test_script_json_escapes_comment_openers() {
        let spec = state_pie(&[StateRisk {
            customer_state: "<!--<script>".into(),
            customer_count: 1,
            avg_risk_score: None,
            high_risk_count: 0,
            avg_claim_amount: None,
        }]);
        let json = spec.to_script_json();
        assert!(!json.contains('<'));

        // Still valid JSON carrying the original label
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.to_string().contains("<!--<script>"));
    }

    #[test]
    fn test_scatter_sizes_scale_with_count() {
        let row = |level: RiskLevel, count| RiskLevelStats {
            risk_level: level.as_str().into(),
            level: Some(level),
            count,
            avg_score: Some(50.0),
            avg_claim: None,
            avg_premium: Some(1500.0),
        };
        let spec = premium_scatter(&[row(RiskLevel::High, 10), row(RiskLevel::Low, 5)]);
        assert_eq!(spec.data[0]["marker"]["size"], json!([50.0]));
        assert_eq!(spec.data[1]["marker"]["size"], json!([31.0]));
        assert_eq!(spec.data[0]["marker"]["color"], style::FIRST_LIGHT);
    }
}
