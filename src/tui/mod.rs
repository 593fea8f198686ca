// Interactive filter manager
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use app::App;
pub use events::{Action, InputMode, key_to_action};
use tracing::info;

use self::terminal::TerminalGuard;
use crate::filters::{DisabledStore, FilterStore};
use crate::storage::load_store;

/// Run the interactive TUI over the store at `store_path`, saving on exit
pub fn run_interactive(store_path: &Path, log_file: Option<PathBuf>) -> Result<()> {
    let (filters, disabled) = match load_store(store_path)
        .with_context(|| format!("Failed to load filters from {}", store_path.display()))?
    {
        Some(loaded) => (loaded.filters, loaded.disabled),
        None => (FilterStore::new(), DisabledStore::new()),
    };
    let mut app = App::new(filters, disabled, log_file);

    let mut guard = TerminalGuard::enter()?;
    let res = app.run(guard.terminal_mut());
    guard.restore()?;
    res?;

    if app.save_if_modified(store_path)? {
        info!(path = %store_path.display(), "filters saved");
        eprintln!("Saved filters to {}", store_path.display());
    }
    Ok(())
}
