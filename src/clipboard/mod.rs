//! Copying filter patterns out of the terminal UI.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

use crate::filters::Definition;

/// Upper bound for copied text; filter lists never get close
const MAX_CLIPBOARD_SIZE: usize = 1024 * 1024;

/// Clipboard access, swapped for a mock in tests
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")
    }
}

/// One pattern per line, in the given order
pub fn patterns_text(definitions: &[Definition]) -> Result<String> {
    if definitions.is_empty() {
        bail!("No filters selected to copy");
    }
    let text = definitions
        .iter()
        .map(|definition| definition.filter.filter.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if text.len() > MAX_CLIPBOARD_SIZE {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }
    Ok(text)
}

/// `open` only runs once the text is built; an empty or oversized selection
/// never reaches the clipboard
fn copy_with_provider<P: ClipboardProvider>(
    definitions: &[Definition],
    open: impl FnOnce() -> Result<P>,
) -> Result<usize> {
    let text = patterns_text(definitions)?;
    open()?.set_text(&text)?;
    Ok(definitions.len())
}

/// Copy the patterns of `definitions` to the system clipboard
///
/// Returns the number of patterns copied. Fails on an empty selection before
/// the clipboard is touched, and when no system clipboard is available
/// (headless sessions).
pub fn copy_patterns(definitions: &[Definition]) -> Result<usize> {
    copy_with_provider(definitions, SystemClipboard::new)
}
