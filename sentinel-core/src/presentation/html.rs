// sentinel-core/src/presentation/html.rs

use chrono::DateTime;
use minijinja::value::Value;
use minijinja::{Environment, context};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::application::{QualityDashboard, RefreshStatus, RiskDashboard};
use crate::domain::freshness::FreshnessStatus;
use crate::domain::pipeline::RUNNING_SCHEDULE_STATUS;
use crate::domain::quality::QualityStatus;
use crate::domain::risk::RiskLevel;
use crate::error::SentinelError;
use crate::infrastructure::error::InfrastructureError;
use crate::presentation::charts::{self, ChartSpec};
use crate::presentation::style;

const LAYOUT: &str = include_str!("../../templates/layout.html");
const QUALITY: &str = include_str!("../../templates/quality.html");
const RISK: &str = include_str!("../../templates/risk.html");

const MISSING: &str = "n/a";

/// How a page is being served.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Served by `serve`: controls and filter form are live.
    /// Off for static files written by `render`.
    pub interactive: bool,
    pub auto_refresh: bool,
    pub interval_secs: u64,
    pub refresh: Option<RefreshStatus>,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        // .html names turn on auto-escaping
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("quality.html", QUALITY)?;
        env.add_template("risk.html", RISK)?;

        env.add_filter("thousands", |v: Value| {
            as_number(&v).map_or(MISSING.to_string(), |n| group_thousands(n, 0))
        });
        env.add_filter("money", |v: Value, decimals: Option<usize>| {
            as_number(&v).map_or(MISSING.to_string(), |n| {
                format!("${}", group_thousands(n, decimals.unwrap_or(0)))
            })
        });
        env.add_filter("fixed", |v: Value, decimals: Option<usize>| {
            as_number(&v).map_or(MISSING.to_string(), |n| {
                format!("{:.*}", decimals.unwrap_or(1), n)
            })
        });
        env.add_filter("clock", |v: Option<String>| format_time(v, "%H:%M:%S"));
        env.add_filter("datetime", |v: Option<String>| {
            format_time(v, "%Y-%m-%d %H:%M:%S")
        });
        env.add_filter("last_segment", |v: String| {
            v.rsplit('.').next().unwrap_or_default().to_string()
        });

        env.add_function("status_style", |status: Option<String>| {
            let status = parse_status(status).unwrap_or(QualityStatus::Monitoring);
            style::status_cell(status).css()
        });
        env.add_function("status_color", |status: Option<String>| {
            parse_status(status).map_or(style::MID_BLUE, style::status_color)
        });
        env.add_function("freshness_color", |status: Option<String>| {
            [
                FreshnessStatus::Fresh,
                FreshnessStatus::Acceptable,
                FreshnessStatus::Stale,
            ]
            .into_iter()
            .find(|f| status.as_deref() == Some(f.as_str()))
            .map_or(style::MID_BLUE, style::freshness_color)
        });
        env.add_function("schedule_color", |status: Option<String>| {
            style::schedule_color(status.as_deref() == Some(RUNNING_SCHEDULE_STATUS))
        });
        env.add_function("risk_color", |level: Option<String>| {
            level
                .as_deref()
                .and_then(RiskLevel::parse)
                .map_or(style::MEDIUM_GRAY, style::risk_color)
        });

        Ok(Self { env })
    }

    pub fn quality(&self, page: &QualityDashboard, opts: &PageOptions) -> Result<String, SentinelError> {
        let mut specs = Vec::new();
        if !page.checks.items().is_empty() {
            specs.push(charts::status_by_table(&page.table_summary));
            specs.push(charts::check_type_donut(&page.check_types));
            specs.push(charts::value_trends(page.checks.items()));
            specs.push(charts::status_distribution(&page.status_distribution));
            specs.push(charts::value_histogram(page.checks.items()));
        }
        self.render("quality.html", "quality", Value::from_serialize(page), specs, opts)
    }

    pub fn risk(&self, page: &RiskDashboard, opts: &PageOptions) -> Result<String, SentinelError> {
        let mut specs = Vec::new();
        if let Some(rows) = page.age_analysis.ready() {
            specs.push(charts::age_risk_bar(rows));
        }
        if let Some(rows) = page.geography.ready() {
            specs.push(charts::state_pie(rows));
        }
        if let Some(rows) = page.risk_levels.ready() {
            specs.push(charts::risk_level_donut(rows));
            specs.push(charts::premium_scatter(rows));
        }
        self.render("risk.html", "risk", Value::from_serialize(page), specs, opts)
    }

    fn render(
        &self,
        name: &str,
        page_kind: &str,
        page: Value,
        specs: Vec<ChartSpec>,
        opts: &PageOptions,
    ) -> Result<String, SentinelError> {
        // Already script-safe JSON; must not be HTML-escaped again
        let charts: BTreeMap<&str, Value> = specs
            .iter()
            .map(|spec| (spec.id, Value::from_safe_string(spec.to_script_json())))
            .collect();

        let tmpl = self.env.get_template(name).map_err(InfrastructureError::from)?;
        let html = tmpl
            .render(context! {
                page => page,
                page_kind => page_kind,
                charts => charts,
                interactive => opts.interactive,
                auto_refresh => opts.auto_refresh,
                interval_secs => opts.interval_secs,
                refresh => &opts.refresh,
                palette => context! {
                    main => style::MAIN,
                    midnight => style::MIDNIGHT,
                    mid_blue => style::MID_BLUE,
                    medium_gray => style::MEDIUM_GRAY,
                    star_blue => style::STAR_BLUE,
                    valencia_orange => style::VALENCIA_ORANGE,
                    first_light => style::FIRST_LIGHT,
                    purple_moon => style::PURPLE_MOON,
                },
            })
            .map_err(InfrastructureError::from)?;
        Ok(html)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    if value.is_none() || value.is_undefined() {
        return None;
    }
    f64::try_from(value.clone()).ok()
}

fn parse_status(status: Option<String>) -> Option<QualityStatus> {
    status.and_then(|s| QualityStatus::from_str(&s).ok())
}

fn format_time(value: Option<String>, fmt: &str) -> String {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.format(fmt).to_string())
            .unwrap_or(raw),
        None => MISSING.to_string(),
    }
}

/// `1234567.891, 2` -> `1,234,567.89`
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::section::Section;
    use crate::domain::governance::RoleView;
    use crate::domain::pipeline::{DmfFunction, PipelineSummary};
    use crate::domain::quality::{QualityCheck, QualityFilter};
    use crate::domain::risk::RiskOverview;
    use chrono::{Duration, TimeZone, Utc};

    fn quality_page() -> QualityDashboard {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let checks = vec![
            QualityCheck::new("CLAIMS_RAW", "SNOWFLAKE.CORE.NULL_COUNT", Some(3.0), Some(now)),
            QualityCheck::new("CUSTOMER_RAW", "INVALID_CUSTOMER_AGE_COUNT", Some(14.0), Some(now)),
            QualityCheck::new("CUSTOMER_RAW", "<b>ROW_COUNT</b>", Some(120.0), Some(now)),
        ];
        QualityDashboard::build(
            "MountainPeak Insurance",
            now,
            Section::Ready(checks),
            Section::Ready(PipelineSummary {
                unique_policies: 1234567,
                fraud_cases: 14,
                avg_claim_amount: Some(15250.5),
                last_pipeline_run: Some(now - Duration::minutes(150)),
                files_processed: 3,
            }),
            Section::Ready(vec![DmfFunction {
                metric_name: "INVALID_CUSTOMER_AGE_COUNT".into(),
                ref_entity_name: "DB.RAW_DATA.CUSTOMER_RAW".into(),
                schedule: Some("5 MINUTE".into()),
                schedule_status: "SUSPENDED".into(),
            }]),
            QualityFilter::default(),
        )
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(-15250.4, 0), "-15,250");
        assert_eq!(group_thousands(-0.2, 0), "0");
    }

    #[test]
    fn test_quality_page_renders_cards_and_alerts() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .quality(&quality_page(), &PageOptions::default())
            .unwrap();

        assert!(html.contains("1,234,567"));
        assert!(html.contains("$15,250.50"));
        assert!(html.contains("150 min"));
        assert!(html.contains("STALE"));
        assert!(html.contains("Customers with invalid ages"));
        assert!(html.contains("Data pipeline may need attention"));
        assert!(html.contains("Plotly.newPlot(\"value-trends\""));
        // Metric names are escaped
        assert!(html.contains("&lt;b&gt;ROW_COUNT&lt;/b&gt;"));
        // Static render: no live controls
        assert!(!html.contains("http-equiv=\"refresh\""));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_interactive_page_has_controls_and_auto_reload() {
        let renderer = PageRenderer::new().unwrap();
        let opts = PageOptions {
            interactive: true,
            auto_refresh: true,
            interval_secs: 30,
            refresh: None,
        };
        let html = renderer.quality(&quality_page(), &opts).unwrap();

        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"30\">"));
        assert!(html.contains("action=\"/quality/refresh\""));
        assert!(html.contains("name=\"check_type\""));
    }

    #[test]
    fn test_risk_page_with_failed_sections() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let page = RiskDashboard::build(
            "MountainPeak Insurance",
            now,
            Section::Ready(RiskOverview {
                total_customers: 0,
                high_risk_count: 0,
                medium_risk_count: 0,
                low_risk_count: 0,
                avg_risk_score: None,
                avg_claim_amount: None,
                last_refresh: None,
            }),
            Section::Failed("Catalog Error: table risk_score_matrix does not exist".into()),
            Section::Empty,
            Section::Empty,
            Section::Ready(RoleView {
                role_name: "BROKER_ROLE".into(),
                visible_records: 36,
                visible_states: 3,
                avg_claim_amount: Some(40000.0),
                max_claim_amount: Some(90000.0),
            }),
            Section::Empty,
        );

        let html = PageRenderer::new()
            .unwrap()
            .risk(&page, &PageOptions::default())
            .unwrap();
        assert!(html.contains("0.0% of portfolio"));
        assert!(html.contains("risk_score_matrix does not exist"));
        assert!(html.contains("BROKER_ROLE"));
        assert!(html.contains("3 states only"));
        assert!(!html.contains("Plotly.newPlot(\"age-risk\""));
    }
}
