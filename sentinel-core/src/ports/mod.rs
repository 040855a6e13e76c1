// sentinel-core/src/ports/mod.rs

pub mod clock;
pub mod warehouse;

pub use clock::{Clock, ManualClock, SystemClock};
pub use warehouse::{Cell, Record, ResultSet, Warehouse};
