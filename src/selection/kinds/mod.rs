//! The concrete list panels: active filters and disabled entities.

pub mod disabled;
pub mod filters;

pub use disabled::{DisabledItem, DisabledKind};
pub use filters::FiltersKind;
