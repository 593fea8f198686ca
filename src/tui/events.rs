use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// How key presses are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys drive the filter panels
    Browse,
    /// Keys edit a text field (navigator query, filter pattern)
    Text,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Cancel,
    MoveUp,
    MoveDown,
    /// Shift+arrow: grow the selection as a range
    ExtendUp,
    ExtendDown,
    /// Ctrl+arrow: move the cursor without selecting
    CursorUp,
    CursorDown,
    Select,
    /// Ctrl+Space: add to the selection
    AddToSelection,
    ToggleFocus,
    ToggleActive,
    /// Move the selected entity to the other list
    Transfer,
    Edit,
    NewFilter,
    Remove,
    MoveItemUp,
    MoveItemDown,
    /// Pick up the entity under the cursor
    Grab,
    /// Drop the grabbed entity at the cursor of the focused list
    Put,
    CopyToClipboard,
    ShowMatches,
    OpenNavigator,
    Confirm,
    Input(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, mode: InputMode) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(key_to_action(key, mode));
    }
    Ok(Action::None)
}

pub fn key_to_action(key: KeyEvent, mode: InputMode) -> Action {
    match mode {
        InputMode::Browse => browse_action(key),
        InputMode::Text => text_action(key),
    }
}

fn browse_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
            Action::Quit
        }
        (KeyCode::Esc, _) => Action::Cancel,

        (KeyCode::Up, KeyModifiers::SHIFT) => Action::ExtendUp,
        (KeyCode::Down, KeyModifiers::SHIFT) => Action::ExtendDown,
        (KeyCode::Up, KeyModifiers::CONTROL) => Action::CursorUp,
        (KeyCode::Down, KeyModifiers::CONTROL) => Action::CursorDown,
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::Char('K'), _) => Action::MoveItemUp,
        (KeyCode::Char('J'), _) => Action::MoveItemDown,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::Grab,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::Put,

        (KeyCode::Char(' '), KeyModifiers::CONTROL) => Action::AddToSelection,
        (KeyCode::Char(' '), _) => Action::Select,
        (KeyCode::Tab, _) => Action::ToggleFocus,
        (KeyCode::Char('a'), KeyModifiers::NONE) => Action::ToggleActive,
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::Transfer,
        (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) => Action::Edit,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NewFilter,
        (KeyCode::Delete, _) | (KeyCode::Char('x'), KeyModifiers::NONE) => Action::Remove,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyToClipboard,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ShowMatches,
        (KeyCode::Char('/'), KeyModifiers::NONE) => Action::OpenNavigator,

        _ => Action::None,
    }
}

fn text_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Enter, _) => Action::Confirm,
        (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browse(code: KeyCode, modifiers: KeyModifiers) -> Action {
        key_to_action(KeyEvent::new(code, modifiers), InputMode::Browse)
    }

    fn text(code: KeyCode, modifiers: KeyModifiers) -> Action {
        key_to_action(KeyEvent::new(code, modifiers), InputMode::Text)
    }

    #[test]
    fn test_quit_actions() {
        assert_eq!(browse(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(browse(KeyCode::Char('q'), KeyModifiers::NONE), Action::Quit);
        assert_eq!(text(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
    }

    #[test]
    fn test_q_is_input_in_text_mode() {
        assert_eq!(text(KeyCode::Char('q'), KeyModifiers::NONE), Action::Input('q'));
    }

    #[test]
    fn test_navigation() {
        assert_eq!(browse(KeyCode::Up, KeyModifiers::NONE), Action::MoveUp);
        assert_eq!(browse(KeyCode::Char('j'), KeyModifiers::NONE), Action::MoveDown);
        assert_eq!(browse(KeyCode::Up, KeyModifiers::SHIFT), Action::ExtendUp);
        assert_eq!(browse(KeyCode::Down, KeyModifiers::SHIFT), Action::ExtendDown);
        assert_eq!(browse(KeyCode::Up, KeyModifiers::CONTROL), Action::CursorUp);
        assert_eq!(text(KeyCode::Char('n'), KeyModifiers::CONTROL), Action::MoveDown);
    }

    #[test]
    fn test_selection_keys() {
        assert_eq!(browse(KeyCode::Char(' '), KeyModifiers::NONE), Action::Select);
        assert_eq!(browse(KeyCode::Char(' '), KeyModifiers::CONTROL), Action::AddToSelection);
        assert_eq!(browse(KeyCode::Tab, KeyModifiers::NONE), Action::ToggleFocus);
    }

    #[test]
    fn test_entity_actions() {
        assert_eq!(browse(KeyCode::Char('a'), KeyModifiers::NONE), Action::ToggleActive);
        assert_eq!(browse(KeyCode::Char('d'), KeyModifiers::NONE), Action::Transfer);
        assert_eq!(browse(KeyCode::Enter, KeyModifiers::NONE), Action::Edit);
        assert_eq!(browse(KeyCode::Delete, KeyModifiers::NONE), Action::Remove);
        assert_eq!(browse(KeyCode::Char('K'), KeyModifiers::SHIFT), Action::MoveItemUp);
        assert_eq!(browse(KeyCode::Char('g'), KeyModifiers::NONE), Action::Grab);
        assert_eq!(browse(KeyCode::Char('p'), KeyModifiers::NONE), Action::Put);
        assert_eq!(browse(KeyCode::Char('y'), KeyModifiers::CONTROL), Action::CopyToClipboard);
        assert_eq!(browse(KeyCode::Char('m'), KeyModifiers::NONE), Action::ShowMatches);
        assert_eq!(browse(KeyCode::Char('/'), KeyModifiers::NONE), Action::OpenNavigator);
    }

    #[test]
    fn test_text_input() {
        assert_eq!(text(KeyCode::Char('A'), KeyModifiers::SHIFT), Action::Input('A'));
        assert_eq!(text(KeyCode::Backspace, KeyModifiers::NONE), Action::DeleteChar);
        assert_eq!(text(KeyCode::Enter, KeyModifiers::NONE), Action::Confirm);
        assert_eq!(text(KeyCode::Esc, KeyModifiers::NONE), Action::Cancel);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(browse(KeyCode::F(1), KeyModifiers::NONE), Action::None);
        assert_eq!(text(KeyCode::F(1), KeyModifiers::NONE), Action::None);
    }
}
