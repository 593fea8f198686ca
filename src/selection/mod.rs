//! Multi-select controllers for the list panels.

pub mod context;
pub mod dragdrop;
pub mod entity;
pub mod error;
pub mod keyboard;
pub mod kinds;
pub mod provider;

pub use context::{GuidSource, SelectionContext};
pub use dragdrop::{DragAndDropService, DragPayload, DropEvent, ListContent};
pub use entity::{EditState, Entity};
pub use error::ProviderError;
pub use keyboard::KeyboardListener;
pub use kinds::{DisabledItem, DisabledKind, FiltersKind};
pub use provider::{
    AvailableActions, ComponentDesc, ContextMenuEvent, DoubleclickEvent, Editor, EntityAction,
    MenuCommand, MenuItem, Provider, ProviderKind, ProviderSubjects, SelectEvent, Selection,
    Selector,
};
