//! Filter store persistence
//!
//! Both stores live in one JSON file:
//! - `version`: format version, checked on load
//! - `saved_at`: RFC 3339 timestamp of the last save
//! - `filters` / `disabled`: `{uuid, content}` entries in display order
//!
//! Default location: platform data directory
//! - macOS: `~/Library/Application Support/log-filters/filters.json`
//! - Linux: `~/.local/share/log-filters/filters.json`
//! - Windows: `%APPDATA%\log-filters\filters.json`

pub mod error;
pub mod metadata;
pub mod persistence;

pub use error::StoreError;
pub use metadata::{STORE_VERSION, StoreFile};
pub use persistence::{LoadedStores, load_store, save_store};
