// sentinel-core/src/domain/quality/status.rs

// Static threshold tables for DMF metrics. The warehouse used to compute these
// in a CASE expression; the rules below reproduce it exactly, including SQL
// LIKE semantics for the metric-name patterns ('%' = any run, '_' = any char).

use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
    Monitoring,
}

impl QualityStatus {
    pub const ALL: [QualityStatus; 5] = [
        Self::Excellent,
        Self::Good,
        Self::Fair,
        Self::NeedsAttention,
        Self::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::NeedsAttention => "NEEDS ATTENTION",
            Self::Monitoring => "MONITORING",
        }
    }

    /// CSS-friendly slug ("needs-attention").
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QualityStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::str::FromStr for QualityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckType {
    Completeness,
    Uniqueness,
    Validity,
    Volume,
    Other,
}

impl CheckType {
    pub const ALL: [CheckType; 5] = [
        Self::Completeness,
        Self::Uniqueness,
        Self::Validity,
        Self::Volume,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Uniqueness => "Uniqueness",
            Self::Validity => "Validity",
            Self::Volume => "Volume",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::str::FromStr for CheckType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCheckType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Band {
    Exactly(f64),
    AtMost(f64),
}

impl Band {
    fn contains(&self, value: f64) -> bool {
        match *self {
            Band::Exactly(v) => value == v,
            Band::AtMost(max) => value <= max,
        }
    }
}

struct ThresholdRule {
    pattern: &'static str,
    check_type: CheckType,
    bands: &'static [(Band, QualityStatus)],
}

// Evaluated top to bottom; the first matching pattern wins. A value that
// falls through every band (including NULL) is NEEDS ATTENTION.
const THRESHOLD_RULES: &[ThresholdRule] = &[
    ThresholdRule {
        pattern: "%NULL_COUNT",
        check_type: CheckType::Completeness,
        bands: &[
            (Band::Exactly(0.0), QualityStatus::Excellent),
            (Band::AtMost(5.0), QualityStatus::Good),
            (Band::AtMost(20.0), QualityStatus::Fair),
        ],
    },
    ThresholdRule {
        pattern: "%DUPLICATE_COUNT",
        check_type: CheckType::Uniqueness,
        bands: &[
            (Band::Exactly(0.0), QualityStatus::Excellent),
            (Band::AtMost(2.0), QualityStatus::Good),
        ],
    },
    ThresholdRule {
        pattern: "INVALID_%",
        check_type: CheckType::Validity,
        bands: &[
            (Band::Exactly(0.0), QualityStatus::Excellent),
            (Band::AtMost(3.0), QualityStatus::Good),
        ],
    },
];

// Check types without thresholds; only drive categorisation.
const CATEGORY_ONLY: &[(&str, CheckType)] = &[("ROW_COUNT", CheckType::Volume)];

/// Quality status of one metric reading.
pub fn classify_metric(metric_name: &str, value: Option<f64>) -> QualityStatus {
    let Some(rule) = THRESHOLD_RULES
        .iter()
        .find(|rule| sql_like(metric_name, rule.pattern))
    else {
        return QualityStatus::Monitoring;
    };

    value
        .and_then(|v| {
            rule.bands
                .iter()
                .find(|(band, _)| band.contains(v))
                .map(|(_, status)| *status)
        })
        .unwrap_or(QualityStatus::NeedsAttention)
}

/// Category of check a metric belongs to.
pub fn check_type_of(metric_name: &str) -> CheckType {
    THRESHOLD_RULES
        .iter()
        .map(|rule| (rule.pattern, rule.check_type))
        .chain(CATEGORY_ONLY.iter().copied())
        .find(|(pattern, _)| sql_like(metric_name, pattern))
        .map(|(_, check_type)| check_type)
        .unwrap_or(CheckType::Other)
}

/// Case-sensitive SQL `LIKE` without escape characters.
fn sql_like(input: &str, pattern: &str) -> bool {
    let text: Vec<char> = input.chars().collect();
    let pat: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pat.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('_') => {
                t += 1;
                p += 1;
            }
            Some(c) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pat[p..].iter().all(|c| *c == '%')
}
