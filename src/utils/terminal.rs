//! Terminal output sanitization
//!
//! Patterns and log lines come from user files and are printed as-is by the
//! CLI and the terminal UI. ANSI escape sequences in them could move the
//! cursor or recolor the screen, so everything user-provided goes through
//! [`sanitize_line`] before display.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static CSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("CSI pattern compiles")
});

/// Strip ANSI CSI sequences and control characters; tabs become spaces
///
/// # Examples
///
/// ```
/// use log_filters::utils::terminal::sanitize_line;
///
/// assert_eq!(sanitize_line("\x1b[31mERROR\x1b[0m\tdisk full"), "ERROR disk full");
/// ```
pub fn sanitize_line(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let stripped = CSI.replace_all(text, "");
    let cleaned = stripped
        .chars()
        .filter_map(|ch| match ch {
            '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect();
    Cow::Owned(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(sanitize_line("error: disk full"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strips_color_and_cursor_sequences() {
        assert_eq!(sanitize_line("\x1b[1m\x1b[31mfatal\x1b[0m"), "fatal");
        assert_eq!(sanitize_line("\x1b[2J\x1b[H cleared"), " cleared");
        assert_eq!(sanitize_line("\x1b[?25lhidden"), "hidden");
    }

    #[test]
    fn test_drops_control_characters() {
        assert_eq!(sanitize_line("bell\x07 back\x08"), "bell back");
        assert_eq!(sanitize_line("line\r\n"), "line");
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(sanitize_line("a\tb"), "a b");
    }

    #[test]
    fn test_unicode_kept() {
        assert_eq!(sanitize_line("naïve \x1b[32m✓\x1b[0m"), "naïve ✓");
    }
}
