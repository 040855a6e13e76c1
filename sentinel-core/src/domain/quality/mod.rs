// sentinel-core/src/domain/quality/mod.rs

pub mod check;
pub mod score;
pub mod status;

pub use check::{
    CheckTypeCount, FilterOptions, QualityCheck, QualityFilter, StatusCount, TableQualitySummary,
    check_type_counts, status_counts,
};
pub use score::PortfolioScore;
pub use status::{CheckType, QualityStatus, check_type_of, classify_metric};
