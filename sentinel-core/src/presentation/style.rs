// sentinel-core/src/presentation/style.rs

// Colors of the two dashboards. Status text and cell colors follow the
// quality monitor, the brand palette follows the risk dashboard.

use crate::domain::freshness::FreshnessStatus;
use crate::domain::quality::QualityStatus;
use crate::domain::risk::RiskLevel;

pub const MAIN: &str = "#29B5E8";
pub const MIDNIGHT: &str = "#000000";
pub const MID_BLUE: &str = "#11567F";
pub const MEDIUM_GRAY: &str = "#5B5B5B";
pub const STAR_BLUE: &str = "#75CDD7";
pub const VALENCIA_ORANGE: &str = "#FF9F36";
pub const FIRST_LIGHT: &str = "#D45B90";
pub const PURPLE_MOON: &str = "#7254A3";

pub const GREEN: &str = "#28a745";
pub const TEAL: &str = "#17a2b8";
pub const YELLOW: &str = "#ffc107";
pub const RED: &str = "#dc3545";

/// Cell colors for a status badge in the detail table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl CellStyle {
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; color: {}",
            self.background, self.foreground
        )
    }
}

pub fn status_cell(status: QualityStatus) -> CellStyle {
    match status {
        QualityStatus::Excellent => CellStyle {
            background: "#d4edda",
            foreground: "#155724",
        },
        QualityStatus::Good => CellStyle {
            background: "#d1ecf1",
            foreground: "#0c5460",
        },
        QualityStatus::NeedsAttention => CellStyle {
            background: "#f8d7da",
            foreground: "#721c24",
        },
        QualityStatus::Fair | QualityStatus::Monitoring => CellStyle {
            background: "#fff3cd",
            foreground: "#856404",
        },
    }
}

/// Solid color used for a status in charts and on the score card.
pub fn status_color(status: QualityStatus) -> &'static str {
    match status {
        QualityStatus::Excellent => GREEN,
        QualityStatus::Good => TEAL,
        QualityStatus::Fair | QualityStatus::Monitoring => YELLOW,
        QualityStatus::NeedsAttention => RED,
    }
}

pub fn freshness_color(status: FreshnessStatus) -> &'static str {
    match status {
        FreshnessStatus::Fresh => GREEN,
        FreshnessStatus::Acceptable => YELLOW,
        FreshnessStatus::Stale => RED,
    }
}

pub fn schedule_color(running: bool) -> &'static str {
    if running { GREEN } else { RED }
}

pub fn risk_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => FIRST_LIGHT,
        RiskLevel::Medium => VALENCIA_ORANGE,
        RiskLevel::Low => STAR_BLUE,
    }
}
