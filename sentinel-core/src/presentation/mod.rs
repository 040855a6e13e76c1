// sentinel-core/src/presentation/mod.rs

pub mod charts;
pub mod html;
pub mod style;

pub use html::{PageOptions, PageRenderer};
