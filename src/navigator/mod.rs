pub mod entries;

pub use entries::{
    Collection, ELEMENT_HEIGHT, Entries, FilteredCollection, MAX_VISIBLE_ITEMS, Mover,
    NavigatorItem, Viewport,
};
