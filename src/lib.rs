//! Log Filters - search filter management for a log viewer
//!
//! This library holds the front-end core of a log analysis tool. It provides:
//!
//! - The search filter entity ([`FilterRequest`]): pattern, flags, colors,
//!   active state, marker expression and persistence
//! - A fuzzy navigator ([`Entries`]) over grouped entities, scored through a
//!   pluggable [`ScoreOracle`]
//! - A generic multi-select engine ([`Provider`]) with ctrl/shift selection,
//!   edit mode, context menus and drag-and-drop between lists
//! - A JSON store file for filters and disabled entities, and match counting
//!   over log files
//!
//! # Example
//!
//! ```
//! use log_filters::{Filter, FilterFlags, FilterRequest};
//!
//! let filter = FilterRequest::new(Filter::new("error", FilterFlags::default()).into())?;
//! assert_eq!(filter.count_in("error: disk error"), 2);
//! # Ok::<(), log_filters::FilterError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod events;
pub mod filters;
pub mod logging;
pub mod matcher;
pub mod navigator;
pub mod selection;
pub mod storage;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use events::{Subject, Subscription};
pub use filters::{
    Definition, DisabledRequest, DisabledStore, Filter, FilterError, FilterFlags, FilterRequest,
    FilterStore, UpdateRequest,
};
pub use matcher::{NucleoOracle, ScoreOracle};
pub use navigator::{Entries, NavigatorItem};
pub use selection::{Provider, ProviderKind, Selection};
pub use storage::{StoreError, load_store, save_store};
