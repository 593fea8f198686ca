/// Whether an entity is currently being edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditState {
    editing: bool,
}

impl EditState {
    pub fn editing() -> Self {
        Self { editing: true }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

/// A selectable item of a provider: identity, a snapshot of the item and its
/// edit state
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<T> {
    uuid: String,
    item: T,
    edit: EditState,
}

impl<T> Entity<T> {
    pub fn new(uuid: impl Into<String>, item: T, edit: EditState) -> Self {
        Self { uuid: uuid.into(), item, edit }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn extract(&self) -> &T {
        &self.item
    }

    pub fn edit_state(&self) -> EditState {
        self.edit
    }
}
