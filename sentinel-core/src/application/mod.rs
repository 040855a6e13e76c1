// sentinel-core/src/application/mod.rs

pub mod cache;
pub mod dashboard;
pub mod engine;
pub mod quality_page;
pub mod queries;
pub mod refresh;
pub mod risk_page;
pub mod section;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le binaire peut faire `use sentinel_core::application::{DashboardService, PageKind};`
// sans connaître la structure interne des fichiers.

pub use cache::QueryCache;
pub use dashboard::{DashboardService, PageKind};
pub use quality_page::QualityDashboard;
pub use queries::{QueryCatalog, QueryId};
pub use refresh::{
    RefreshController, RefreshHandle, RefreshScheduler, RefreshState, RefreshStatus,
    RefreshTrigger,
};
pub use risk_page::RiskDashboard;
pub use section::Section;
