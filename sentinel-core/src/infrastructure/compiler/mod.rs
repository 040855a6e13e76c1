pub mod guard;
pub mod jinja;

pub use guard::ReadOnlyGuard;
pub use jinja::SqlRenderer;
