//! Search filters: the filter entity, its disabled form, the stores owning
//! them and match counting over log files.

pub mod colors;
pub mod counting;
pub mod disabled;
pub mod entry;
pub mod error;
pub mod flags;
pub mod request;
pub mod store;

pub use disabled::{DisableConvertable, DisabledEntity, DisabledRequest, EntityTypeRef};
pub use entry::{Entry, EntryConvertable};
pub use error::FilterError;
pub use flags::{Filter, FilterFlags, MarkerRegex};
pub use request::{
    Colors, Definition, FilterRequest, OptionalColors, OptionalDefinition, UpdateEvent,
    UpdateRequest, UpdatedParts,
};
pub use store::{DisabledStore, EntityStore, FilterStore, Shared, StoreUpdate};
