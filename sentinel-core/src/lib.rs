// sentinel-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Warehouse (where rows come from) and Clock (what time it is).
pub mod ports;

// 2. Domain (Cœur du métier)
// Threshold tables, quality score, freshness, risk & governance entities.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB warehouse, SQL templates, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// Query cache, page builders, refresh cycle.
pub mod application;

// 5. Presentation
// HTML pages and chart specifications handed to the browser.
pub mod presentation;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use sentinel_core::SentinelError;
pub use error::SentinelError;
