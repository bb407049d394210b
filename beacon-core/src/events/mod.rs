//! Event system for beacon

pub mod conversion;
pub mod types;

pub use conversion::{
    Conversion, ConversionGoal, ConversionSpec, DEFAULT_CURRENCY, NavigationTiming, PageView,
};
pub use types::{Event, EventKind, Extras, FormAction, Scalar};
