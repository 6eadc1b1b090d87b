// crates/quire-core/src/lib.rs
pub mod clock;
pub mod elements;
pub mod gc;
pub mod predefined;
pub mod properties;
pub mod property_registry;
pub mod registry;
pub mod resolve;
pub mod style;

pub use clock::{Clock, ManualClock, SystemClock};
pub use elements::*;
pub use gc::{cleanup_unused, collect_references, sweep, CleanupReport};
pub use properties::*;
pub use property_registry::*;
pub use registry::*;
pub use resolve::*;
pub use style::*;

#[derive(Debug, thiserror::Error)]
pub enum QuireError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Unknown style category: {0}")]
    UnknownCategory(String),

    #[error("Invalid value for '{property}': expected {expected}, got {found}")]
    InvalidValue {
        property: String,
        expected: String,
        found: String,
    },

    #[error("Property '{property}' belongs to {found} styles, not {expected}")]
    CategoryMismatch {
        property: String,
        expected: StyleCategory,
        found: StyleCategory,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, QuireError>;
