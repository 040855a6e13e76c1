// sentinel-core/src/domain/quality/score.rs

use serde::Serialize;

use super::status::QualityStatus;

const EXCELLENT_WEIGHT: f64 = 100.0;
const GOOD_WEIGHT: f64 = 85.0;

// (minimum score, rating), checked in order.
const RATING_CUTOFFS: &[(f64, QualityStatus)] = &[
    (95.0, QualityStatus::Excellent),
    (85.0, QualityStatus::Good),
    (70.0, QualityStatus::Fair),
];

/// Portfolio-wide quality score: a weighted pass rate over all checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioScore {
    pub score: f64,
    /// `None` when there were no checks at all ("NO DATA").
    pub rating: Option<QualityStatus>,
    pub excellent: usize,
    pub good: usize,
    pub needs_attention: usize,
    pub total: usize,
}

impl PortfolioScore {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = QualityStatus>,
    {
        let mut excellent = 0;
        let mut good = 0;
        let mut needs_attention = 0;
        let mut total = 0;
        for status in statuses {
            total += 1;
            match status {
                QualityStatus::Excellent => excellent += 1,
                QualityStatus::Good => good += 1,
                QualityStatus::NeedsAttention => needs_attention += 1,
                _ => {}
            }
        }

        let (score, rating) = if total == 0 {
            (0.0, None)
        } else {
            let score = weighted_score(excellent, good, total);
            (score, Some(rate(score)))
        };

        Self {
            score,
            rating,
            excellent,
            good,
            needs_attention,
            total,
        }
    }

    pub fn rating_label(&self) -> &'static str {
        self.rating.map(|r| r.as_str()).unwrap_or("NO DATA")
    }

    /// True when there is a score and it is under the GOOD cutoff.
    pub fn below_optimal(&self) -> bool {
        self.rating.is_some() && self.score < GOOD_WEIGHT
    }
}

pub fn weighted_score(excellent: usize, good: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (excellent as f64 * EXCELLENT_WEIGHT + good as f64 * GOOD_WEIGHT) / total as f64
}

pub fn rate(score: f64) -> QualityStatus {
    RATING_CUTOFFS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, rating)| *rating)
        .unwrap_or(QualityStatus::NeedsAttention)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use QualityStatus::*;

    #[test]
    fn test_mixed_portfolio_is_fair() {
        let score = PortfolioScore::from_statuses([Excellent, Excellent, Good, NeedsAttention]);
        assert!((score.score - 71.25).abs() < 1e-9);
        assert_eq!(score.rating, Some(Fair));
        assert_eq!(score.total, 4);
        assert_eq!(score.needs_attention, 1);
    }

    #[test]
    fn test_rating_cutoffs() {
        assert_eq!(rate(100.0), Excellent);
        assert_eq!(rate(95.0), Excellent);
        assert_eq!(rate(94.99), Good);
        assert_eq!(rate(85.0), Good);
        assert_eq!(rate(70.0), Fair);
        assert_eq!(rate(69.9), NeedsAttention);
    }

    #[test]
    fn test_no_checks_means_no_data() {
        let score = PortfolioScore::from_statuses([]);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.rating_label(), "NO DATA");
        assert!(!score.below_optimal());
    }

    #[test]
    fn test_fair_and_monitoring_count_as_zero() {
        let score = PortfolioScore::from_statuses([Fair, Monitoring]);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.rating, Some(NeedsAttention));
        assert!(score.below_optimal());
    }

    #[test]
    fn test_score_is_monotonic_in_excellent_and_good() {
        let total = 12;
        for excellent in 0..=total {
            for good in 0..=(total - excellent) {
                let base = weighted_score(excellent, good, total);
                if excellent + good < total {
                    assert!(weighted_score(excellent + 1, good, total) >= base);
                    assert!(weighted_score(excellent, good + 1, total) >= base);
                }
            }
        }
    }
}
