//! Generic selection engine shared by the list panels.
//!
//! [`Provider`] owns the selection state machine. Everything that depends on
//! what is listed lives behind [`ProviderKind`]. Providers never touch each
//! other: shift ranges read sibling ids through the [`SelectionContext`] and
//! transfers go through the shared stores.

use tracing::{debug, error};
use uuid::Uuid;

use super::context::SelectionContext;
use super::dragdrop::{DragPayload, DropEvent, ListContent};
use super::entity::{EditState, Entity};
use super::error::ProviderError;
use super::keyboard::KeyboardListener;
use crate::events::{Subject, Subscription};
use crate::filters::{Definition, StoreUpdate};

/// Views a provider can hand to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentDesc {
    FiltersList,
    FilterDetails,
    FiltersPlaceholder,
    DisabledList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityAction {
    Activate,
    Deactivate,
    Remove,
    Edit,
    /// Park the entities in the disabled list
    Disable,
    /// Move disabled entities back to their own list
    Enable,
}

/// Actions offered for the current selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailableActions {
    pub activate: bool,
    pub deactivate: bool,
    pub remove: bool,
    pub edit: bool,
    pub disable: bool,
    pub enable: bool,
}

impl AvailableActions {
    pub fn allows(&self, action: EntityAction) -> bool {
        match action {
            EntityAction::Activate => self.activate,
            EntityAction::Deactivate => self.deactivate,
            EntityAction::Remove => self.remove,
            EntityAction::Edit => self.edit,
            EntityAction::Disable => self.disable,
            EntityAction::Enable => self.enable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ShowMatches,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub caption: String,
    pub command: MenuCommand,
}

/// Input of [`Selector::set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub guid: String,
    pub sender: Option<String>,
    /// Clear the ctrl/shift latch before selecting
    pub ignore: bool,
    /// `Some(false)` never deselects an already selected entity
    pub toggle: Option<bool>,
}

impl Selection {
    pub fn new(guid: impl Into<String>) -> Self {
        Self { guid: guid.into(), sender: None, ignore: false, toggle: None }
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn toggle(mut self, toggle: bool) -> Self {
        self.toggle = Some(toggle);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEvent {
    pub provider: String,
    pub entity: Option<String>,
    pub guids: Vec<String>,
    pub sender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuEvent {
    pub provider: String,
    pub entity: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleclickEvent {
    pub provider: String,
    pub entity: String,
}

#[derive(Debug, Default)]
pub struct ProviderSubjects {
    pub change: Subject<()>,
    pub selection: Subject<SelectEvent>,
    /// Uuid of the entity entering edit mode, `None` when editing ends
    pub edit: Subject<Option<String>>,
    pub context: Subject<ContextMenuEvent>,
    pub doubleclick: Subject<DoubleclickEvent>,
    pub search: Subject<Definition>,
}

impl ProviderSubjects {
    fn destroy(&self) {
        self.change.destroy();
        self.selection.destroy();
        self.edit.destroy();
        self.context.destroy();
        self.doubleclick.destroy();
        self.search.destroy();
    }
}

/// The kind-specific half of a provider
pub trait ProviderKind {
    type Item: Clone;

    fn list_id(&self) -> ListContent;

    /// Listed items in display order, keyed by uuid
    fn items(&self) -> Vec<(String, Self::Item)>;

    /// Store updates that invalidate the listing
    fn watch(&self) -> Option<Subscription<StoreUpdate>> {
        None
    }

    fn reorder(&self, prev: usize, curt: usize);

    fn panel_name(&self) -> String;

    fn panel_desc(&self, count: usize) -> String;

    fn details_panel_name(&self) -> Option<String> {
        None
    }

    fn details_panel_desc(&self, _selected: Option<&Entity<Self::Item>>) -> Option<String> {
        None
    }

    fn list_component(&self) -> Option<ComponentDesc> {
        None
    }

    fn details_component(&self) -> Option<ComponentDesc> {
        None
    }

    fn content_if_empty(&self) -> Option<ComponentDesc> {
        None
    }

    fn context_menu_items(
        &self,
        _target: &Entity<Self::Item>,
        _selected: &[Entity<Self::Item>],
    ) -> Vec<MenuItem> {
        Vec::new()
    }

    fn actions(&self, selected: &[Entity<Self::Item>]) -> AvailableActions;

    /// Run `action` on the given entities; `Ok(true)` when anything changed
    fn perform(&self, action: EntityAction, guids: &[String]) -> Result<bool, ProviderError>;

    fn search(&self, _entity: &Entity<Self::Item>) -> Option<Definition> {
        None
    }

    fn is_viable(&self, dragging: Option<&DragPayload>) -> bool;

    /// Take over an entity dropped here from another list
    fn accept_drop(&self, event: &DropEvent) -> bool;
}

#[derive(Debug, Default)]
struct SelectionState {
    current: Vec<String>,
    last: Option<String>,
}

pub struct Provider<K: ProviderKind> {
    guid: String,
    kind: K,
    state: SelectionState,
    editing: Option<String>,
    keyboard: KeyboardListener,
    context: SelectionContext,
    store_updates: Option<Subscription<StoreUpdate>>,
    subjects: ProviderSubjects,
}

impl<K: ProviderKind> Provider<K> {
    pub fn new(kind: K, keyboard: KeyboardListener, context: SelectionContext) -> Self {
        let store_updates = kind.watch();
        Self {
            guid: Uuid::new_v4().to_string(),
            kind,
            state: SelectionState::default(),
            editing: None,
            keyboard,
            context,
            store_updates,
            subjects: ProviderSubjects::default(),
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn subjects(&self) -> &ProviderSubjects {
        &self.subjects
    }

    pub fn keyboard(&self) -> &KeyboardListener {
        &self.keyboard
    }

    pub fn list_id(&self) -> ListContent {
        self.kind.list_id()
    }

    /// Entities in display order
    pub fn get(&self) -> Vec<Entity<K::Item>> {
        self.kind
            .items()
            .into_iter()
            .map(|(uuid, item)| {
                let edit = if self.editing.as_deref() == Some(uuid.as_str()) {
                    EditState::editing()
                } else {
                    EditState::default()
                };
                Entity::new(uuid, item, edit)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kind.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selected(&self) -> &[String] {
        &self.state.current
    }

    pub fn is_selected(&self, guid: &str) -> bool {
        self.state.current.iter().any(|selected| selected == guid)
    }

    pub fn last_selection(&self) -> Option<&str> {
        self.state.last.as_deref()
    }

    /// Move the shift-range anchor, e.g. after a selection made elsewhere
    pub fn set_last_selection(&mut self, guid: Option<String>) {
        self.state.last = guid;
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn select(&mut self) -> Selector<'_, K> {
        Selector { provider: self }
    }

    pub fn edit(&mut self) -> Editor<'_, K> {
        Editor { provider: self }
    }

    pub fn change(&self) {
        self.subjects.change.emit(());
    }

    /// Pick up store changes since the last call: emit `change` and prune the
    /// selection to entities still listed. Returns whether anything changed.
    pub fn sync(&mut self) -> bool {
        let pending = self.store_updates.as_ref().map_or(0, |updates| updates.drain().len());
        if pending == 0 {
            return false;
        }
        let guids = self.guids();
        if self.editing.as_ref().is_some_and(|editing| !guids.contains(editing)) {
            self.editing = None;
        }
        self.change();
        let current = self.state.current.clone();
        self.select().apply(Some("sync"), &current);
        true
    }

    pub fn actions(&self) -> AvailableActions {
        self.kind.actions(&self.selected_entities())
    }

    /// Run `action` on the current selection if it is available
    pub fn perform(&mut self, action: EntityAction) -> Result<bool, ProviderError> {
        if !self.actions().allows(action) {
            debug!(?action, provider = %self.kind.panel_name(), "action not available");
            return Ok(false);
        }
        if action == EntityAction::Edit {
            return Ok(self.edit().in_());
        }
        let guids = self.state.current.clone();
        let changed = self.kind.perform(action, &guids)?;
        self.sync();
        Ok(changed)
    }

    /// Handle a drop onto this provider's list
    pub fn item_dragged(&mut self, event: &DropEvent) -> bool {
        if event.container != self.kind.list_id() {
            return false;
        }
        if event.is_reorder() {
            self.kind.reorder(event.previous_index, event.current_index);
        } else if !self.kind.accept_drop(event) {
            debug!(payload = ?event.payload, "drop rejected");
            return false;
        }
        if !self.sync() {
            self.change();
        }
        true
    }

    pub fn is_viable(&self, dragging: Option<&DragPayload>) -> bool {
        self.kind.is_viable(dragging)
    }

    /// Ask the kind for a search built from one entity and emit it
    pub fn search(&self, guid: &str) -> bool {
        let Some(entity) = self.get().into_iter().find(|entity| entity.uuid() == guid) else {
            return false;
        };
        match self.kind.search(&entity) {
            Some(definition) => {
                self.subjects.search.emit(definition);
                true
            }
            None => false,
        }
    }

    pub fn panel_name(&self) -> String {
        self.kind.panel_name()
    }

    pub fn panel_desc(&self) -> String {
        self.kind.panel_desc(self.len())
    }

    pub fn details_panel_name(&self) -> Option<String> {
        self.kind.details_panel_name()
    }

    pub fn details_panel_desc(&self) -> Option<String> {
        let selected = self.single_entity();
        self.kind.details_panel_desc(selected.as_ref())
    }

    pub fn list_component(&self) -> Result<ComponentDesc, ProviderError> {
        self.kind.list_component().ok_or_else(|| self.unsupported("list component"))
    }

    pub fn details_component(&self) -> Result<ComponentDesc, ProviderError> {
        self.kind.details_component().ok_or_else(|| self.unsupported("details component"))
    }

    pub fn content_if_empty(&self) -> Result<ComponentDesc, ProviderError> {
        self.kind.content_if_empty().ok_or_else(|| self.unsupported("placeholder content"))
    }

    pub fn has_details_component(&self) -> bool {
        self.kind.details_component().is_some()
    }

    pub fn has_content_if_empty(&self) -> bool {
        self.kind.content_if_empty().is_some()
    }

    /// Release every event channel of this provider
    pub fn destroy(&self) {
        self.subjects.destroy();
    }

    fn guids(&self) -> Vec<String> {
        self.kind.items().into_iter().map(|(uuid, _)| uuid).collect()
    }

    fn selected_entities(&self) -> Vec<Entity<K::Item>> {
        self.get().into_iter().filter(|entity| self.is_selected(entity.uuid())).collect()
    }

    fn single_entity(&self) -> Option<Entity<K::Item>> {
        let [guid] = self.state.current.as_slice() else {
            return None;
        };
        self.get().into_iter().find(|entity| entity.uuid() == guid)
    }

    fn unsupported(&self, capability: &'static str) -> ProviderError {
        let provider = self.kind.panel_name();
        error!(%provider, capability, "capability not supported");
        ProviderError::Unsupported { provider, capability }
    }

    fn set_selection(&mut self, selection: Selection) {
        let Selection { guid, sender, ignore, toggle } = selection;
        if ignore {
            self.keyboard.ignore_ctrl_shift();
        }
        let known = self.guids().contains(&guid);
        let selected = self.is_selected(&guid);
        let mut entity = None;
        if self.keyboard.ctrl() {
            if !selected {
                self.state.current.push(guid.clone());
                if known {
                    entity = Some(guid.clone());
                }
            }
            self.state.last = Some(guid);
        } else if self.keyboard.shift() && self.state.last.is_some() {
            self.select_range(&guid);
            entity = self.state.last.clone();
        } else if selected && self.state.current.len() == 1 {
            if toggle == Some(false) {
                entity = Some(guid);
            } else {
                self.state.current.clear();
            }
        } else {
            self.state.current = vec![guid.clone()];
            if known {
                entity = Some(guid.clone());
            }
            self.state.last = Some(guid);
        }
        self.emit_selection(entity, sender);
    }

    /// Union the span between the anchor and `guid` into the selection
    fn select_range(&mut self, guid: &str) {
        let Some(anchor) = self.state.last.clone() else {
            return;
        };
        let guids = if self.context.is_empty() { self.guids() } else { self.context.guids() };
        let from = guids.iter().position(|candidate| *candidate == anchor);
        let to = guids.iter().position(|candidate| candidate == guid);
        let (Some(from), Some(to)) = (from, to) else {
            debug!(%anchor, target = guid, "range bounds not found");
            return;
        };
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        for candidate in &guids[start..=end] {
            if !self.state.current.contains(candidate) {
                self.state.current.push(candidate.clone());
            }
        }
    }

    fn emit_selection(&self, entity: Option<String>, sender: Option<String>) {
        self.subjects.selection.emit(SelectEvent {
            provider: self.guid.clone(),
            entity,
            guids: self.state.current.clone(),
            sender,
        });
    }
}

/// Selection operations, see [`Provider::select`]
pub struct Selector<'a, K: ProviderKind> {
    provider: &'a mut Provider<K>,
}

impl<'a, K: ProviderKind> Selector<'a, K> {
    pub fn set(self, selection: Selection) {
        self.provider.set_selection(selection);
    }

    pub fn first(self) -> bool {
        match self.provider.guids().into_iter().next() {
            Some(guid) => {
                self.provider.set_selection(Selection::new(guid).sender("self.first"));
                true
            }
            None => false,
        }
    }

    pub fn last(self) -> bool {
        match self.provider.guids().pop() {
            Some(guid) => {
                self.provider.set_selection(Selection::new(guid).sender("self.last"));
                true
            }
            None => false,
        }
    }

    /// Step a single selection forward; `false` at the end or when the
    /// selection is not a single entity of this provider
    pub fn next(self) -> bool {
        self.step(true)
    }

    pub fn prev(self) -> bool {
        self.step(false)
    }

    /// Clear the selection; always emits
    pub fn drop(self, sender: Option<&str>) {
        self.provider.state.current.clear();
        self.provider.emit_selection(None, sender.map(str::to_string));
    }

    /// Replace the selection with `guids`, keeping only ids this provider
    /// lists; always emits
    pub fn apply(self, sender: Option<&str>, guids: &[String]) {
        let own = self.provider.guids();
        self.provider.state.current = guids.iter().filter(|guid| own.contains(guid)).cloned().collect();
        self.provider.emit_selection(None, sender.map(str::to_string));
    }

    pub fn get(self) -> &'a [String] {
        let provider: &'a Provider<K> = self.provider;
        &provider.state.current
    }

    /// Selected entities in display order
    pub fn entities(self) -> Vec<Entity<K::Item>> {
        self.provider.selected_entities()
    }

    pub fn single(self) -> Option<Entity<K::Item>> {
        self.provider.single_entity()
    }

    /// Open the context menu for `guid`; `false` for an unknown entity
    pub fn context(self, guid: &str) -> bool {
        let entities = self.provider.get();
        let Some(target) = entities.iter().find(|entity| entity.uuid() == guid) else {
            return false;
        };
        let selected = self.provider.selected_entities();
        let items = self.provider.kind.context_menu_items(target, &selected);
        self.provider.subjects.context.emit(ContextMenuEvent {
            provider: self.provider.guid.clone(),
            entity: guid.to_string(),
            items,
        });
        true
    }

    pub fn doubleclick(self, guid: &str) {
        self.provider.subjects.doubleclick.emit(DoubleclickEvent {
            provider: self.provider.guid.clone(),
            entity: guid.to_string(),
        });
        self.provider.set_selection(Selection::new(guid).sender("self.doubleclick").toggle(false));
    }

    fn step(self, forward: bool) -> bool {
        let [current] = self.provider.state.current.as_slice() else {
            return false;
        };
        let guids = self.provider.guids();
        let Some(index) = guids.iter().position(|guid| guid == current) else {
            return false;
        };
        let target = if forward { index.checked_add(1) } else { index.checked_sub(1) };
        let Some(guid) = target.and_then(|target| guids.get(target)) else {
            return false;
        };
        let sender = if forward { "self.next" } else { "self.prev" };
        self.provider.set_selection(Selection::new(guid.clone()).sender(sender));
        true
    }
}

/// Edit-mode operations, see [`Provider::edit`]
pub struct Editor<'a, K: ProviderKind> {
    provider: &'a mut Provider<K>,
}

impl<K: ProviderKind> Editor<'_, K> {
    /// Put the sole selected entity into edit mode; every other entity leaves it
    pub fn in_(self) -> bool {
        let Some(entity) = self.provider.single_entity() else {
            return false;
        };
        let guid = entity.uuid().to_string();
        self.provider.editing = Some(guid.clone());
        self.provider.subjects.edit.emit(Some(guid));
        true
    }

    pub fn out(self) {
        self.provider.editing = None;
        self.provider.subjects.edit.emit(None);
        self.provider.change();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::selection::context::GuidSource;

    #[derive(Clone)]
    struct Names(Rc<RefCell<Vec<String>>>);

    impl Names {
        fn new(names: &[&str]) -> Self {
            Self(Rc::new(RefCell::new(names.iter().map(|name| name.to_string()).collect())))
        }
    }

    impl GuidSource for Names {
        fn guids(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl ProviderKind for Names {
        type Item = String;

        fn list_id(&self) -> ListContent {
            ListContent::FiltersList
        }

        fn items(&self) -> Vec<(String, String)> {
            self.0.borrow().iter().map(|name| (name.clone(), name.to_uppercase())).collect()
        }

        fn reorder(&self, prev: usize, curt: usize) {
            let mut names = self.0.borrow_mut();
            let name = names.remove(prev);
            names.insert(curt, name);
        }

        fn panel_name(&self) -> String {
            "Names".to_string()
        }

        fn panel_desc(&self, count: usize) -> String {
            format!("{count} names")
        }

        fn list_component(&self) -> Option<ComponentDesc> {
            Some(ComponentDesc::FiltersList)
        }

        fn actions(&self, selected: &[Entity<String>]) -> AvailableActions {
            AvailableActions { edit: selected.len() == 1, ..Default::default() }
        }

        fn perform(&self, _action: EntityAction, _guids: &[String]) -> Result<bool, ProviderError> {
            Ok(false)
        }

        fn is_viable(&self, _dragging: Option<&DragPayload>) -> bool {
            false
        }

        fn accept_drop(&self, _event: &DropEvent) -> bool {
            false
        }
    }

    fn provider(names: &[&str]) -> (Provider<Names>, KeyboardListener) {
        let keyboard = KeyboardListener::new();
        (Provider::new(Names::new(names), keyboard.clone(), SelectionContext::default()), keyboard)
    }

    #[test]
    fn test_ctrl_then_shift_selection() {
        let (mut provider, keyboard) = provider(&["a", "b", "c"]);

        provider.select().set(Selection::new("b"));
        assert_eq!(provider.selected(), ["b"]);

        keyboard.update(true, false);
        provider.select().set(Selection::new("c"));
        assert_eq!(provider.selected(), ["b", "c"]);

        keyboard.update(false, true);
        provider.select().set(Selection::new("a"));
        assert_eq!(provider.selected(), ["b", "c", "a"]);
    }

    #[test]
    fn test_ctrl_click_never_removes() {
        let (mut provider, keyboard) = provider(&["a", "b"]);
        provider.select().set(Selection::new("a"));
        keyboard.update(true, false);
        provider.select().set(Selection::new("a"));
        assert_eq!(provider.selected(), ["a"]);
    }

    #[test]
    fn test_ctrl_click_reports_entity_only_when_added() {
        let (mut provider, keyboard) = provider(&["a", "b"]);
        let events = provider.subjects().selection.subscribe();
        provider.select().set(Selection::new("a"));
        keyboard.update(true, false);

        provider.select().set(Selection::new("a"));
        provider.select().set(Selection::new("b"));

        let events = events.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].entity, None);
        assert_eq!(events[1].guids, ["a"]);
        assert_eq!(events[2].entity.as_deref(), Some("b"));
    }

    #[test]
    fn test_ignore_clears_latch() {
        let (mut provider, keyboard) = provider(&["a", "b"]);
        provider.select().set(Selection::new("a"));
        keyboard.update(true, false);
        provider.select().set(Selection::new("b").ignore());
        assert_eq!(provider.selected(), ["b"]);
        assert!(!keyboard.ctrl());
    }

    #[test]
    fn test_plain_click_toggles_sole_selection() {
        let (mut provider, _) = provider(&["a", "b"]);
        provider.select().set(Selection::new("a"));
        provider.select().set(Selection::new("a"));
        assert!(provider.selected().is_empty());

        provider.select().set(Selection::new("a"));
        provider.select().set(Selection::new("a").toggle(false));
        assert_eq!(provider.selected(), ["a"]);
    }

    #[test]
    fn test_plain_click_on_multi_selection_narrows() {
        let (mut provider, keyboard) = provider(&["a", "b"]);
        keyboard.update(true, false);
        provider.select().set(Selection::new("a"));
        provider.select().set(Selection::new("b"));
        keyboard.ignore_ctrl_shift();
        provider.select().set(Selection::new("b"));
        assert_eq!(provider.selected(), ["b"]);
    }

    #[test]
    fn test_shift_range_with_unknown_target_is_noop() {
        let (mut provider, keyboard) = provider(&["a", "b"]);
        provider.select().set(Selection::new("a"));
        keyboard.update(false, true);
        provider.select().set(Selection::new("zzz"));
        assert_eq!(provider.selected(), ["a"]);
    }

    #[test]
    fn test_shift_range_spans_context_members() {
        let first = Names::new(&["a", "b"]);
        let second = Names::new(&["x", "y"]);
        let members: Vec<Rc<dyn GuidSource>> =
            vec![Rc::new(first.clone()) as Rc<dyn GuidSource>, Rc::new(second) as Rc<dyn GuidSource>];
        let context = SelectionContext::new(members);
        let keyboard = KeyboardListener::new();
        let mut provider = Provider::new(first, keyboard.clone(), context);

        provider.select().set(Selection::new("b"));
        keyboard.update(false, true);
        provider.select().set(Selection::new("y"));
        assert_eq!(provider.selected(), ["b", "x", "y"]);
    }

    #[test]
    fn test_next_and_prev_stop_at_bounds() {
        let (mut provider, _) = provider(&["a", "b", "c"]);
        assert!(provider.select().last());
        assert_eq!(provider.selected(), ["c"]);
        assert!(!provider.select().next());
        assert_eq!(provider.selected(), ["c"]);

        assert!(provider.select().prev());
        assert_eq!(provider.selected(), ["b"]);
        assert!(provider.select().first());
        assert!(!provider.select().prev());
        assert_eq!(provider.selected(), ["a"]);
    }

    #[test]
    fn test_next_requires_single_selection() {
        let (mut provider, _) = provider(&["a", "b"]);
        assert!(!provider.select().next());
        provider.select().apply(None, &["a".to_string(), "b".to_string()]);
        assert!(!provider.select().next());
    }

    #[test]
    fn test_drop_always_emits() {
        let (mut provider, _) = provider(&["a"]);
        let events = provider.subjects().selection.subscribe();
        provider.select().drop(Some("test"));
        provider.select().drop(None);

        let events = events.drain();
        assert_eq!(events.len(), 2);
        assert!(events[0].guids.is_empty());
        assert_eq!(events[0].sender.as_deref(), Some("test"));
    }

    #[test]
    fn test_apply_prunes_unknown_ids() {
        let (mut provider, _) = provider(&["a", "b"]);
        let events = provider.subjects().selection.subscribe();
        provider.select().apply(Some("ext"), &["b".to_string(), "gone".to_string()]);
        assert_eq!(provider.selected(), ["b"]);

        provider.select().apply(None, &["gone".to_string()]);
        assert!(provider.selected().is_empty());
        assert_eq!(events.drain().len(), 2);
    }

    #[test]
    fn test_select_event_payload() {
        let (mut provider, _) = provider(&["a"]);
        let events = provider.subjects().selection.subscribe();
        provider.select().set(Selection::new("a").sender("list"));

        let event = events.try_next().unwrap();
        assert_eq!(event.provider, provider.guid());
        assert_eq!(event.entity.as_deref(), Some("a"));
        assert_eq!(event.guids, vec!["a"]);
        assert_eq!(event.sender.as_deref(), Some("list"));
    }

    #[test]
    fn test_entities_and_single() {
        let (mut provider, keyboard) = provider(&["a", "b", "c"]);
        keyboard.update(true, false);
        provider.select().set(Selection::new("c"));
        provider.select().set(Selection::new("a"));

        let uuids: Vec<String> =
            provider.select().entities().iter().map(|entity| entity.uuid().to_string()).collect();
        assert_eq!(uuids, vec!["a", "c"]);
        assert!(provider.select().single().is_none());

        keyboard.ignore_ctrl_shift();
        provider.select().set(Selection::new("b"));
        assert_eq!(provider.select().single().unwrap().extract(), "B");
    }

    #[test]
    fn test_doubleclick_never_deselects() {
        let (mut provider, _) = provider(&["a"]);
        let clicks = provider.subjects().doubleclick.subscribe();
        provider.select().set(Selection::new("a"));
        provider.select().doubleclick("a");
        assert_eq!(provider.selected(), ["a"]);
        assert_eq!(clicks.drain().len(), 1);
    }

    #[test]
    fn test_edit_exclusivity() {
        let (mut provider, _) = provider(&["a", "b"]);
        let edits = provider.subjects().edit.subscribe();
        assert!(!provider.edit().in_());

        provider.select().set(Selection::new("a"));
        assert!(provider.edit().in_());
        provider.select().set(Selection::new("b"));
        assert!(provider.edit().in_());

        let editing: Vec<bool> =
            provider.get().iter().map(|entity| entity.edit_state().is_editing()).collect();
        assert_eq!(editing, vec![false, true]);

        let changes = provider.subjects().change.subscribe();
        provider.edit().out();
        assert!(provider.editing().is_none());
        assert_eq!(changes.drain().len(), 1);
        assert_eq!(edits.drain(), vec![Some("a".to_string()), Some("b".to_string()), None]);
    }

    #[test]
    fn test_perform_edit_uses_actions() {
        let (mut provider, _) = provider(&["a"]);
        assert!(!provider.perform(EntityAction::Edit).unwrap());
        provider.select().set(Selection::new("a"));
        assert!(provider.perform(EntityAction::Edit).unwrap());
        assert_eq!(provider.editing(), Some("a"));
    }

    #[test]
    fn test_reorder_drop() {
        let (mut provider, _) = provider(&["a", "b", "c"]);
        let changes = provider.subjects().change.subscribe();
        let event = DropEvent {
            previous_container: ListContent::FiltersList,
            container: ListContent::FiltersList,
            previous_index: 0,
            current_index: 2,
            payload: DragPayload::Filter { uuid: "a".into() },
        };
        assert!(provider.item_dragged(&event));
        let order: Vec<String> = provider.get().iter().map(|e| e.uuid().to_string()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(changes.drain().len(), 1);
    }

    #[test]
    fn test_unsupported_capabilities() {
        let (provider, _) = provider(&[]);
        assert_eq!(provider.list_component().unwrap(), ComponentDesc::FiltersList);
        assert!(matches!(
            provider.details_component(),
            Err(ProviderError::Unsupported { capability: "details component", .. })
        ));
        assert!(provider.content_if_empty().is_err());
        assert!(!provider.has_details_component());
        assert_eq!(provider.panel_desc(), "0 names");
    }

    #[test]
    fn test_destroy_closes_subscriptions() {
        let (provider, _) = provider(&["a"]);
        let selection = provider.subjects().selection.subscribe();
        provider.destroy();
        assert!(selection.is_closed());
    }
}
