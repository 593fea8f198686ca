//! Drag-and-drop between provider lists.
//!
//! The payload says what is being dragged through its variant, so a target
//! list decides whether to accept it by matching on the tag.

use crate::filters::EntityTypeRef;

/// Identifies the list a drag starts from or ends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListContent {
    FiltersList,
    DisabledList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// An active filter
    Filter { uuid: String },
    /// A disabled entity of the given kind
    Disabled { uuid: String, kind: EntityTypeRef },
}

impl DragPayload {
    pub fn uuid(&self) -> &str {
        match self {
            DragPayload::Filter { uuid } | DragPayload::Disabled { uuid, .. } => uuid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub previous_container: ListContent,
    pub container: ListContent,
    pub previous_index: usize,
    pub current_index: usize,
    pub payload: DragPayload,
}

impl DropEvent {
    pub fn is_reorder(&self) -> bool {
        self.previous_container == self.container
    }
}

/// Tracks the payload currently being dragged
#[derive(Debug, Default)]
pub struct DragAndDropService {
    dragging: Option<DragPayload>,
}

impl DragAndDropService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, payload: DragPayload) {
        self.dragging = Some(payload);
    }

    pub fn dragging(&self) -> Option<&DragPayload> {
        self.dragging.as_ref()
    }

    pub fn finish(&mut self) -> Option<DragPayload> {
        self.dragging.take()
    }
}
