use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Modifiers {
    ctrl: bool,
    shift: bool,
}

/// Latched ctrl/shift state shared by every provider of one view.
///
/// Clones share the same latch.
#[derive(Debug, Clone, Default)]
pub struct KeyboardListener {
    state: Rc<Cell<Modifiers>>,
}

impl KeyboardListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctrl(&self) -> bool {
        self.state.get().ctrl
    }

    pub fn shift(&self) -> bool {
        self.state.get().shift
    }

    /// Record the modifiers held with the latest key or click
    pub fn update(&self, ctrl: bool, shift: bool) {
        self.state.set(Modifiers { ctrl, shift });
    }

    pub fn ignore_ctrl_shift(&self) {
        self.state.set(Modifiers::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let listener = KeyboardListener::new();
        let other = listener.clone();

        listener.update(true, false);
        assert!(other.ctrl());
        assert!(!other.shift());

        other.ignore_ctrl_shift();
        assert!(!listener.ctrl());
    }
}
