// sentinel-core/src/domain/freshness.rs

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

const FRESH_MAX_MINUTES: i64 = 30;
const ACCEPTABLE_MAX_MINUTES: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessStatus {
    Fresh,
    Acceptable,
    Stale,
}

impl FreshnessStatus {
    /// Upper bounds are inclusive: 30 is FRESH, 31 is ACCEPTABLE.
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes <= FRESH_MAX_MINUTES {
            Self::Fresh
        } else if minutes <= ACCEPTABLE_MAX_MINUTES {
            Self::Acceptable
        } else {
            Self::Stale
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "FRESH",
            Self::Acceptable => "ACCEPTABLE",
            Self::Stale => "STALE",
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FreshnessStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whole minutes elapsed between the last load and `now` (floored).
pub fn minutes_since(last_load: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(last_load).num_minutes()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Freshness {
    pub last_load: DateTime<Utc>,
    pub minutes_since_load: i64,
    pub status: FreshnessStatus,
}

impl Freshness {
    pub fn at(last_load: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes_since_load = minutes_since(last_load, now);
        Self {
            last_load,
            minutes_since_load,
            status: FreshnessStatus::from_minutes(minutes_since_load),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.status == FreshnessStatus::Stale
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_boundaries_are_inclusive_on_the_lower_side() {
        assert_eq!(FreshnessStatus::from_minutes(0), FreshnessStatus::Fresh);
        assert_eq!(FreshnessStatus::from_minutes(30), FreshnessStatus::Fresh);
        assert_eq!(FreshnessStatus::from_minutes(31), FreshnessStatus::Acceptable);
        assert_eq!(FreshnessStatus::from_minutes(120), FreshnessStatus::Acceptable);
        assert_eq!(FreshnessStatus::from_minutes(121), FreshnessStatus::Stale);
    }

    #[test]
    fn test_future_loads_count_as_fresh() {
        assert_eq!(FreshnessStatus::from_minutes(-5), FreshnessStatus::Fresh);
    }

    #[test]
    fn test_partial_minutes_are_floored() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let last = now - Duration::seconds(30 * 60 + 59);
        let freshness = Freshness::at(last, now);
        assert_eq!(freshness.minutes_since_load, 30);
        assert_eq!(freshness.status, FreshnessStatus::Fresh);
    }

    #[test]
    fn test_150_minutes_is_stale() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let freshness = Freshness::at(now - Duration::minutes(150), now);
        assert!(freshness.is_stale());
    }
}
