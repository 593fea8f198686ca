//! TUI application state and event handling.
//!
//! The `App` owns both filter stores and drives one selection provider per
//! list panel:
//!
//! - **Filters panel**: active filters; activate, edit, reorder, remove
//! - **Disabled panel**: parked filters, moved back and forth with `d`
//! - **Drag and drop**: `g` grabs the entity under the cursor, `p` puts it at
//!   the cursor of the focused panel
//! - **Navigator** (`/`): fuzzy jump to any entity of either panel
//! - **Matches** (`m`): lines of the `--log` file matched by the selected filter
//!
//! Keys never touch the selection directly. They latch ctrl/shift on the
//! shared [`KeyboardListener`] and go through the providers' `select()`
//! operations; store changes reach the panels through `Provider::sync`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use super::events::{Action, InputMode, poll_event};
use super::layout::{inner_rows, popup_area};
use super::rendering::{
    DetailsView, DisabledRow, FilterRow, NAVIGATOR_SIZE, NavigatorRow, NavigatorView, PanelHeader,
    PromptView, RenderState, render_ui,
};
use crate::clipboard::copy_patterns;
use crate::events::Subscription;
use crate::filters::counting::{CountPattern, MatchListing, find_matches};
use crate::filters::{
    Definition, DisabledStore, Filter, FilterFlags, FilterRequest, FilterStore, Shared,
    UpdateRequest,
};
use crate::matcher::NucleoOracle;
use crate::navigator::{Entries, NavigatorItem};
use crate::selection::{
    ContextMenuEvent, DisabledKind, DragAndDropService, DragPayload, DropEvent, EntityAction,
    FiltersKind, GuidSource, KeyboardListener, ListContent, MenuCommand, Provider, ProviderKind,
    Selection, SelectionContext,
};
use crate::storage::save_store;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest pattern or navigator query accepted from the keyboard
const MAX_INPUT_LEN: usize = 256;
/// Matched lines kept for the matches pane
const MATCH_LINES_LIMIT: usize = 500;

const SENDER: &str = "keyboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Panel receiving browse keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Disabled,
}

impl Focus {
    fn other(self) -> Self {
        match self {
            Focus::Filters => Focus::Disabled,
            Focus::Disabled => Focus::Filters,
        }
    }

    fn list(self) -> ListContent {
        match self {
            Focus::Filters => ListContent::FiltersList,
            Focus::Disabled => ListContent::DisabledList,
        }
    }
}

/// What a text prompt edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewFilter,
    EditFilter(String),
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
    pub error: Option<String>,
}

/// One navigator row: an entity of either panel
#[derive(Debug, Clone)]
pub struct NavigatorEntry {
    pub uuid: String,
    pub label: String,
    pub focus: Focus,
}

impl NavigatorItem for NavigatorEntry {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

struct Navigator {
    entries: Entries<NavigatorEntry>,
    query: String,
    updates: Subscription<()>,
}

/// An in-flight grab: the payload lives in the drag service
#[derive(Debug, Clone, Copy)]
struct DragOrigin {
    list: ListContent,
    index: usize,
}

// Run `$body` with `$provider` bound to the provider of the focused panel
macro_rules! with_focused {
    ($app:expr, $provider:ident => $body:expr) => {
        match $app.focus {
            Focus::Filters => {
                let $provider = &mut $app.filters_provider;
                $body
            }
            Focus::Disabled => {
                let $provider = &mut $app.disabled_provider;
                $body
            }
        }
    };
}

pub struct App {
    filters: Shared<FilterStore>,
    disabled: Shared<DisabledStore>,
    filters_provider: Provider<FiltersKind>,
    disabled_provider: Provider<DisabledKind>,
    dragdrop: DragAndDropService,
    drag_origin: Option<DragOrigin>,
    focus: Focus,
    // Entity under the cursor of the focused panel
    cursor: Option<String>,
    navigator: Option<Navigator>,
    prompt: Option<Prompt>,
    matches: Option<MatchListing>,
    log_file: Option<PathBuf>,
    // Provider event channels the app reacts to
    searches: Subscription<Definition>,
    context_menus: Subscription<ContextMenuEvent>,
    changes: [Subscription<()>; 2],
    saved_hash: String,
    status_message: Option<StatusMessage>,
    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(filters: FilterStore, disabled: DisabledStore, log_file: Option<PathBuf>) -> Self {
        let filters = Rc::new(RefCell::new(filters));
        let disabled = Rc::new(RefCell::new(disabled));

        // Shift-ranges run over the filters list followed by the disabled list
        let keyboard = KeyboardListener::new();
        let context = SelectionContext::new(vec![
            filters.clone() as Rc<dyn GuidSource>,
            disabled.clone() as Rc<dyn GuidSource>,
        ]);
        let filters_provider = Provider::new(
            FiltersKind::new(filters.clone(), disabled.clone()),
            keyboard.clone(),
            context.clone(),
        );
        let disabled_provider =
            Provider::new(DisabledKind::new(disabled.clone(), filters.clone()), keyboard, context);

        let searches = filters_provider.subjects().search.subscribe();
        let context_menus = filters_provider.subjects().context.subscribe();
        let changes = [
            filters_provider.subjects().change.subscribe(),
            disabled_provider.subjects().change.subscribe(),
        ];
        let saved_hash = stores_hash(&filters, &disabled);

        Self {
            filters,
            disabled,
            filters_provider,
            disabled_provider,
            dragdrop: DragAndDropService::new(),
            drag_origin: None,
            focus: Focus::Filters,
            cursor: None,
            navigator: None,
            prompt: None,
            matches: None,
            log_file,
            searches,
            context_menus,
            changes,
            saved_hash,
            status_message: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            let had_status = self.status_message.is_some();
            self.check_and_clear_expired_status();
            if had_status && self.status_message.is_none() {
                self.needs_redraw = true;
            }

            self.process_updates();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100) {
                let size = terminal.size()?;
                self.resize_navigator(Rect::new(0, 0, size.width, size.height));
                terminal.draw(|f| render_ui(f, &self.render_state()))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.input_mode())?;
            self.handle_action(action);
        }
        Ok(())
    }

    /// Whether the stores differ from what was loaded or last saved
    pub fn is_modified(&self) -> bool {
        stores_hash(&self.filters, &self.disabled) != self.saved_hash
    }

    /// Write both stores to `path` if they changed; returns whether it wrote
    pub fn save_if_modified(&mut self, path: &Path) -> Result<bool> {
        if !self.is_modified() {
            debug!("stores unchanged, nothing to save");
            return Ok(false);
        }
        save_store(path, &self.filters.borrow(), &self.disabled.borrow())
            .with_context(|| format!("Failed to save filters to {}", path.display()))?;
        self.saved_hash = stores_hash(&self.filters, &self.disabled);
        Ok(true)
    }

    pub fn input_mode(&self) -> InputMode {
        if self.navigator.is_some() || self.prompt.is_some() {
            InputMode::Text
        } else {
            InputMode::Browse
        }
    }

    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn success(&mut self, text: impl Into<String>) {
        self.set_status(format!("✓ {}", text.into()), MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn failure(&mut self, text: impl Into<String>) {
        self.set_status(format!("✗ {}", text.into()), MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    fn check_and_clear_expired_status(&mut self) {
        let expired =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if expired {
            self.status_message = None;
        }
    }

    /// Pull store changes into the providers and react to provider events
    fn process_updates(&mut self) {
        if self.filters_provider.sync() | self.disabled_provider.sync() {
            self.repair_cursor();
        }
        for changes in &self.changes {
            if !changes.drain().is_empty() {
                self.needs_redraw = true;
            }
        }
        if let Some(navigator) = &self.navigator
            && !navigator.updates.drain().is_empty()
        {
            self.needs_redraw = true;
        }
        for menu in self.context_menus.drain() {
            let shows_matches = menu.items.iter().any(|item| item.command == MenuCommand::ShowMatches);
            if shows_matches {
                self.filters_provider.search(&menu.entity);
            } else {
                self.failure("Select a single filter to show its matches");
            }
        }
        for definition in self.searches.drain() {
            self.show_matches(&definition);
        }
    }

    fn handle_action(&mut self, action: Action) {
        if self.navigator.is_some() {
            self.handle_navigator_action(action);
        } else if self.prompt.is_some() {
            self.handle_prompt_action(action);
        } else {
            self.handle_browse_action(action);
        }
        self.process_updates();
    }

    fn handle_browse_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Cancel => self.cancel(),
            Action::MoveUp => self.step(false),
            Action::MoveDown => self.step(true),
            Action::ExtendUp => self.extend(false),
            Action::ExtendDown => self.extend(true),
            Action::CursorUp => self.move_cursor(false),
            Action::CursorDown => self.move_cursor(true),
            Action::Select => self.click(false),
            Action::AddToSelection => self.click(true),
            Action::ToggleFocus => {
                self.focus = self.focus.other();
                self.cursor = with_focused!(self, provider => provider.last_selection().map(str::to_string));
                self.repair_cursor();
                self.needs_redraw = true;
            }
            Action::ToggleActive => self.toggle_active(),
            Action::Transfer => self.transfer(),
            Action::Edit => self.start_edit(),
            Action::NewFilter => {
                self.prompt = Some(Prompt { kind: PromptKind::NewFilter, text: String::new(), error: None });
                self.needs_redraw = true;
            }
            Action::Remove => {
                let removed = with_focused!(self, provider => provider.perform(EntityAction::Remove));
                match removed {
                    Ok(true) => self.success("Removed"),
                    Ok(false) => self.failure("Nothing selected to remove"),
                    Err(err) => self.failure(err.to_string()),
                }
            }
            Action::MoveItemUp => self.reorder(false),
            Action::MoveItemDown => self.reorder(true),
            Action::Grab => self.grab(),
            Action::Put => self.put(),
            Action::CopyToClipboard => self.copy_selection(),
            Action::ShowMatches => self.request_matches(),
            Action::OpenNavigator => self.open_navigator(),
            Action::Confirm | Action::Input(_) | Action::DeleteChar | Action::None => {}
        }
    }

    /// Esc unwinds one level: drag, matches pane, then the selection
    fn cancel(&mut self) {
        if self.dragdrop.finish().is_some() {
            self.drag_origin = None;
            self.success("Drag cancelled");
        } else if self.matches.take().is_none() {
            with_focused!(self, provider => provider.select().drop(Some(SENDER)));
        }
        self.needs_redraw = true;
    }

    /// Plain arrow: move a single selection, or start one
    fn step(&mut self, forward: bool) {
        with_focused!(self, provider => step_selection(provider, forward));
        self.cursor = with_focused!(self, provider => provider.last_selection().map(str::to_string));
        self.needs_redraw = true;
    }

    /// Shift+arrow: grow the selection from its anchor
    fn extend(&mut self, forward: bool) {
        let anchor = with_focused!(self, provider => provider.last_selection().map(str::to_string));
        let Some(anchor) = anchor else {
            self.step(forward);
            return;
        };
        let guids = self.focused_guids();
        let edge = self.focused_selected_positions(&guids);
        let from = if forward { edge.iter().max() } else { edge.iter().min() };
        let from = from.copied().or_else(|| guids.iter().position(|guid| *guid == anchor));
        let Some(from) = from else {
            return;
        };
        let target = if forward { from.checked_add(1) } else { from.checked_sub(1) };
        let Some(target) = target.and_then(|index| guids.get(index)).cloned() else {
            return;
        };
        with_focused!(self, provider => {
            provider.keyboard().update(false, true);
            provider.select().set(Selection::new(target.clone()).sender(SENDER));
            provider.keyboard().ignore_ctrl_shift();
        });
        self.cursor = Some(target);
        self.needs_redraw = true;
    }

    /// Ctrl+arrow: the cursor moves, the selection stays
    fn move_cursor(&mut self, forward: bool) {
        let guids = self.focused_guids();
        if guids.is_empty() {
            return;
        }
        let index = self.cursor_index(&guids);
        let target = match index {
            None if forward => 0,
            None => guids.len() - 1,
            Some(index) if forward => (index + 1).min(guids.len() - 1),
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(guids[target].clone());
        self.needs_redraw = true;
    }

    /// Space (toggle) or Ctrl+Space (add) on the entity under the cursor
    fn click(&mut self, ctrl: bool) {
        let guids = self.focused_guids();
        let target = self.cursor_index(&guids).or((!guids.is_empty()).then_some(0));
        let Some(target) = target.map(|index| guids[index].clone()) else {
            return;
        };
        with_focused!(self, provider => {
            provider.keyboard().update(ctrl, false);
            provider.select().set(Selection::new(target.clone()).sender(SENDER));
            provider.keyboard().ignore_ctrl_shift();
        });
        self.cursor = Some(target);
        self.needs_redraw = true;
    }

    fn toggle_active(&mut self) {
        if self.focus != Focus::Filters {
            self.failure("Disabled filters cannot be activated; move them back with d");
            return;
        }
        let actions = self.filters_provider.actions();
        let action = if actions.activate { EntityAction::Activate } else { EntityAction::Deactivate };
        match self.filters_provider.perform(action) {
            Ok(true) => {}
            Ok(false) => self.failure("Nothing selected"),
            Err(err) => self.failure(err.to_string()),
        }
        self.needs_redraw = true;
    }

    /// Disable the selected filters or enable the selected disabled entities
    fn transfer(&mut self) {
        let result = match self.focus {
            Focus::Filters => self.filters_provider.perform(EntityAction::Disable),
            Focus::Disabled => self.disabled_provider.perform(EntityAction::Enable),
        };
        match result {
            Ok(true) => {
                let moved = match self.focus {
                    Focus::Filters => "Disabled",
                    Focus::Disabled => "Enabled",
                };
                self.success(moved);
            }
            Ok(false) => self.failure("Nothing selected to move"),
            Err(err) => self.failure(err.to_string()),
        }
    }

    fn start_edit(&mut self) {
        if self.focus != Focus::Filters {
            self.failure("Only filters can be edited");
            return;
        }
        match self.filters_provider.perform(EntityAction::Edit) {
            Ok(true) => {}
            Ok(false) => {
                self.failure("Select a single filter to edit");
                return;
            }
            Err(err) => {
                self.failure(err.to_string());
                return;
            }
        }
        let Some(uuid) = self.filters_provider.editing().map(str::to_string) else {
            return;
        };
        let text = self
            .filters
            .borrow()
            .find(&uuid)
            .map(|filter| filter.definition().filter.filter.clone())
            .unwrap_or_default();
        self.prompt = Some(Prompt { kind: PromptKind::EditFilter(uuid), text, error: None });
        self.needs_redraw = true;
    }

    /// Shift+J/K: a drop onto the same list one row further
    fn reorder(&mut self, forward: bool) {
        let guids = self.focused_guids();
        let Some(index) = self.cursor_index(&guids) else {
            self.failure("Move the cursor onto an entry first");
            return;
        };
        let target = if forward { index.checked_add(1) } else { index.checked_sub(1) };
        let Some(target) = target.filter(|target| *target < guids.len()) else {
            return;
        };
        let Some(payload) = self.payload_for(&guids[index]) else {
            return;
        };
        let list = self.focus.list();
        let event = DropEvent {
            previous_container: list,
            container: list,
            previous_index: index,
            current_index: target,
            payload,
        };
        with_focused!(self, provider => provider.item_dragged(&event));
        self.needs_redraw = true;
    }

    fn grab(&mut self) {
        let guids = self.focused_guids();
        let Some(index) = self.cursor_index(&guids) else {
            self.failure("Move the cursor onto an entry to grab it");
            return;
        };
        let Some(payload) = self.payload_for(&guids[index]) else {
            return;
        };
        debug!(uuid = payload.uuid(), "drag started");
        self.dragdrop.start(payload);
        self.drag_origin = Some(DragOrigin { list: self.focus.list(), index });
        self.needs_redraw = true;
    }

    fn put(&mut self) {
        let (Some(origin), Some(payload)) = (self.drag_origin, self.dragdrop.dragging().cloned()) else {
            self.failure("Nothing grabbed; press g on an entry first");
            return;
        };
        let container = self.focus.list();
        let reorder = origin.list == container;
        let viable = with_focused!(self, provider => provider.is_viable(self.dragdrop.dragging()));
        if !reorder && !viable {
            self.failure("This list does not accept the grabbed entry");
            return;
        }
        let guids = self.focused_guids();
        let current_index = self.cursor_index(&guids).unwrap_or(guids.len());
        let event = DropEvent {
            previous_container: origin.list,
            container,
            previous_index: origin.index,
            current_index,
            payload,
        };
        let accepted = with_focused!(self, provider => provider.item_dragged(&event));
        self.dragdrop.finish();
        self.drag_origin = None;
        if accepted {
            self.cursor = Some(event.payload.uuid().to_string());
            self.success("Dropped");
        } else {
            self.failure("Drop rejected");
        }
    }

    fn copy_selection(&mut self) {
        if self.focus != Focus::Filters {
            self.failure("Only active filters can be copied");
            return;
        }
        let definitions: Vec<Definition> = self
            .filters_provider
            .select()
            .entities()
            .into_iter()
            .map(|entity| entity.extract().clone())
            .collect();
        match copy_patterns(&definitions) {
            Ok(count) => self.success(format!("Copied {count} pattern(s) to clipboard")),
            Err(err) => self.failure(format!("Clipboard error: {err}")),
        }
    }

    /// Ask the filters panel for the context menu of the entity under the cursor
    fn request_matches(&mut self) {
        if self.focus != Focus::Filters {
            self.failure("Matches are listed for active filters only");
            return;
        }
        let guids = self.focused_guids();
        let target = self
            .cursor_index(&guids)
            .map(|index| guids[index].clone())
            .or_else(|| self.filters_provider.selected().first().cloned());
        let opened = target.is_some_and(|guid| self.filters_provider.select().context(&guid));
        if !opened {
            self.failure("Select a filter to show its matches");
        }
    }

    fn show_matches(&mut self, definition: &Definition) {
        let Some(log_file) = self.log_file.clone() else {
            self.failure("No log file to search; start with --log <FILE>");
            return;
        };
        let pattern = self.filters.borrow().find(&definition.uuid).map(CountPattern::from);
        let Some(pattern) = pattern else {
            warn!(uuid = %definition.uuid, "search for unknown filter");
            return;
        };
        match find_matches(&log_file, &pattern, MATCH_LINES_LIMIT) {
            Ok(listing) => {
                info!(pattern = %listing.label, total = listing.total, "matches listed");
                self.success(format!("{} match(es) for '{}'", listing.total, listing.label));
                self.matches = Some(listing);
            }
            Err(err) => self.failure(format!("Cannot read {}: {err}", log_file.display())),
        }
    }

    fn open_navigator(&mut self) {
        let mut entries = Entries::new(Box::new(NucleoOracle::new()));
        let filters = self
            .filters_provider
            .get()
            .into_iter()
            .map(|entity| NavigatorEntry {
                uuid: entity.uuid().to_string(),
                label: entity.extract().filter.filter.clone(),
                focus: Focus::Filters,
            })
            .collect();
        let disabled = self
            .disabled_provider
            .get()
            .into_iter()
            .map(|entity| NavigatorEntry {
                uuid: entity.uuid().to_string(),
                label: entity.extract().display_name.clone(),
                focus: Focus::Disabled,
            })
            .collect();
        entries.add(0, self.filters_provider.panel_name(), filters);
        entries.add(1, self.disabled_provider.panel_name(), disabled);
        entries.set_viewport_height(usize::from(NAVIGATOR_SIZE.1.saturating_sub(3)));
        let updates = entries.subscribe();
        entries.filtering("");
        self.navigator = Some(Navigator { entries, query: String::new(), updates });
        self.needs_redraw = true;
    }

    fn handle_navigator_action(&mut self, action: Action) {
        let Some(navigator) = self.navigator.as_mut() else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::Cancel => self.navigator = None,
            Action::MoveUp => navigator.entries.navigate().up(),
            Action::MoveDown => navigator.entries.navigate().down(),
            Action::Input(c) => {
                if navigator.query.len() < MAX_INPUT_LEN {
                    navigator.query.push(c);
                    navigator.entries.filtering(&navigator.query);
                }
            }
            Action::DeleteChar => {
                if navigator.query.pop().is_some() {
                    navigator.entries.filtering(&navigator.query);
                }
            }
            Action::Confirm => {
                let picked = navigator.entries.get_selected().cloned();
                self.navigator = None;
                if let Some(entry) = picked {
                    self.reveal(entry);
                }
            }
            _ => {}
        }
        self.needs_redraw = true;
    }

    /// Focus the panel listing `entry` and make it the sole selection
    fn reveal(&mut self, entry: NavigatorEntry) {
        self.focus = entry.focus;
        with_focused!(self, provider => {
            provider.select().set(Selection::new(entry.uuid.clone()).sender("navigator").ignore().toggle(false));
        });
        self.cursor = Some(entry.uuid);
    }

    fn handle_prompt_action(&mut self, action: Action) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::Cancel => self.close_prompt(),
            Action::Input(c) => {
                if prompt.text.len() < MAX_INPUT_LEN {
                    prompt.text.push(c);
                    prompt.error = None;
                }
            }
            Action::DeleteChar => {
                prompt.text.pop();
                prompt.error = None;
            }
            Action::Confirm => self.confirm_prompt(),
            _ => {}
        }
        self.needs_redraw = true;
    }

    fn close_prompt(&mut self) {
        if let Some(Prompt { kind: PromptKind::EditFilter(_), .. }) = self.prompt.take() {
            self.filters_provider.edit().out();
        }
    }

    fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.as_ref() else {
            return;
        };
        let text = prompt.text.trim().to_string();
        let result = match &prompt.kind {
            _ if text.is_empty() => Err("Pattern cannot be empty".to_string()),
            PromptKind::NewFilter => self.add_filter(&text),
            PromptKind::EditFilter(uuid) => {
                let update = UpdateRequest { filter: Some(text.clone()), ..Default::default() };
                let uuid = uuid.clone();
                self.filters.borrow_mut().update(&uuid, update).map(|_| uuid).map_err(|err| err.to_string())
            }
        };
        match result {
            Ok(uuid) => {
                self.close_prompt();
                self.process_updates();
                self.focus = Focus::Filters;
                self.filters_provider
                    .select()
                    .set(Selection::new(uuid.clone()).sender(SENDER).ignore().toggle(false));
                self.cursor = Some(uuid);
                self.success(format!("Saved '{text}'"));
            }
            Err(err) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.error = Some(err);
                }
            }
        }
    }

    /// New filters take regular expressions
    fn add_filter(&self, pattern: &str) -> std::result::Result<String, String> {
        if !FilterRequest::is_valid(Some(pattern)) {
            return Err(format!("'{pattern}' is not a valid regular expression"));
        }
        let flags = FilterFlags::new(false, false, true);
        let request = FilterRequest::new(Filter::new(pattern, flags).into()).map_err(|err| err.to_string())?;
        let uuid = request.uuid().to_string();
        self.filters.borrow_mut().add(request);
        Ok(uuid)
    }

    fn resize_navigator(&mut self, area: Rect) {
        if let Some(navigator) = self.navigator.as_mut() {
            let popup = popup_area(area, NAVIGATOR_SIZE.0, NAVIGATOR_SIZE.1);
            // The query line takes one row
            navigator.entries.set_viewport_height(inner_rows(popup).saturating_sub(1));
        }
    }

    fn focused_guids(&self) -> Vec<String> {
        match self.focus {
            Focus::Filters => listed_guids(&self.filters_provider),
            Focus::Disabled => listed_guids(&self.disabled_provider),
        }
    }

    fn focused_selected_positions(&self, guids: &[String]) -> Vec<usize> {
        let selected = match self.focus {
            Focus::Filters => self.filters_provider.selected(),
            Focus::Disabled => self.disabled_provider.selected(),
        };
        selected.iter().filter_map(|guid| guids.iter().position(|g| g == guid)).collect()
    }

    fn cursor_index(&self, guids: &[String]) -> Option<usize> {
        let cursor = self.cursor.as_deref()?;
        guids.iter().position(|guid| guid == cursor)
    }

    /// Keep the cursor on a listed entity after the list changed
    fn repair_cursor(&mut self) {
        let guids = self.focused_guids();
        if self.cursor_index(&guids).is_none() {
            self.cursor = with_focused!(self, provider => provider.last_selection().map(str::to_string))
                .filter(|guid| guids.contains(guid))
                .or_else(|| guids.first().cloned());
        }
        self.needs_redraw = true;
    }

    fn payload_for(&self, uuid: &str) -> Option<DragPayload> {
        match self.focus {
            Focus::Filters => Some(DragPayload::Filter { uuid: uuid.to_string() }),
            Focus::Disabled => self
                .disabled_provider
                .get()
                .into_iter()
                .find(|entity| entity.uuid() == uuid)
                .map(|entity| DragPayload::Disabled { uuid: uuid.to_string(), kind: entity.extract().type_ref }),
        }
    }

    fn render_state(&self) -> RenderState<'_> {
        let filters_cursor = self.cursor.as_deref().filter(|_| self.focus == Focus::Filters);
        let disabled_cursor = self.cursor.as_deref().filter(|_| self.focus == Focus::Disabled);
        let dragging = self.dragdrop.dragging();

        let filter_rows = self
            .filters_provider
            .get()
            .into_iter()
            .map(|entity| {
                let definition = entity.extract();
                FilterRow {
                    pattern: definition.filter.filter.clone(),
                    flags: definition.filter.flags,
                    colors: definition.colors.clone(),
                    active: definition.active,
                    selected: self.filters_provider.is_selected(entity.uuid()),
                    cursor: filters_cursor == Some(entity.uuid()),
                    editing: entity.edit_state().is_editing(),
                }
            })
            .collect();
        let disabled_rows = self
            .disabled_provider
            .get()
            .into_iter()
            .map(|entity| DisabledRow {
                name: entity.extract().display_name.clone(),
                icon: entity.extract().icon,
                selected: self.disabled_provider.is_selected(entity.uuid()),
                cursor: disabled_cursor == Some(entity.uuid()),
            })
            .collect();

        let details = self.filters_provider.has_details_component().then(|| DetailsView {
            title: self.filters_provider.details_panel_name().unwrap_or_default(),
            desc: self.filters_provider.details_panel_desc().unwrap_or_default(),
            definition: match self.filters_provider.selected() {
                [guid] => self.filters.borrow().find(guid).map(|filter| filter.definition().clone()),
                _ => None,
            },
        });

        let navigator = self.navigator.as_ref().map(|navigator| navigator_view(navigator));
        let prompt = self.prompt.as_ref().map(|prompt| PromptView {
            title: match prompt.kind {
                PromptKind::NewFilter => " New filter (regex) ",
                PromptKind::EditFilter(_) => " Edit filter ",
            },
            text: &prompt.text,
            error: prompt.error.as_deref(),
        });

        RenderState {
            filters: PanelHeader {
                title: self.filters_provider.panel_name(),
                desc: self.filters_provider.panel_desc(),
                focused: self.focus == Focus::Filters,
                drop_target: self.filters_provider.is_viable(dragging),
            },
            filter_rows,
            placeholder: self.filters_provider.is_empty() && self.filters_provider.has_content_if_empty(),
            disabled: PanelHeader {
                title: self.disabled_provider.panel_name(),
                desc: self.disabled_provider.panel_desc(),
                focused: self.focus == Focus::Disabled,
                drop_target: self.disabled_provider.is_viable(dragging),
            },
            disabled_rows,
            details,
            matches: self.matches.as_ref(),
            navigator,
            prompt,
            status_message: self.status_message.as_ref(),
            dragging: dragging.map(|payload| self.label_of(payload)),
        }
    }

    fn label_of(&self, payload: &DragPayload) -> String {
        match payload {
            DragPayload::Filter { uuid } => self
                .filters
                .borrow()
                .find(uuid)
                .map(|filter| filter.definition().filter.filter.clone())
                .unwrap_or_default(),
            DragPayload::Disabled { uuid, .. } => {
                self.disabled.borrow().find(uuid).map(|disabled| disabled.display_name()).unwrap_or_default()
            }
        }
    }
}

fn stores_hash(filters: &Shared<FilterStore>, disabled: &Shared<DisabledStore>) -> String {
    format!("{}|{}", filters.borrow().hash(), disabled.borrow().hash())
}

fn listed_guids<K: ProviderKind>(provider: &Provider<K>) -> Vec<String> {
    provider.get().iter().map(|entity| entity.uuid().to_string()).collect()
}

/// Move a single selection one row; start at the edge when nothing is
/// selected and collapse a multi-selection onto its anchor
fn step_selection<K: ProviderKind>(provider: &mut Provider<K>, forward: bool) {
    provider.keyboard().ignore_ctrl_shift();
    let moved = if forward { provider.select().next() } else { provider.select().prev() };
    if moved || provider.selected().len() == 1 {
        return;
    }
    let anchor = provider.last_selection().map(str::to_string).filter(|anchor| provider.is_selected(anchor));
    match anchor {
        Some(anchor) => provider.select().set(Selection::new(anchor).sender(SENDER)),
        None if forward => {
            provider.select().first();
        }
        None => {
            provider.select().last();
        }
    }
}

fn navigator_view(navigator: &Navigator) -> NavigatorView {
    let entries = &navigator.entries;
    let viewport = entries.viewport();
    let selected = entries.selected();
    let collections = entries.filtered();
    let total: usize = collections.iter().map(|collection| collection.total).sum();
    let rows: Vec<NavigatorRow> = collections
        .iter()
        .flat_map(|collection| {
            collection.entries.iter().map(|matchee| NavigatorRow {
                group: collection.title.to_string(),
                label: matchee.item.label.clone(),
                indices: entries.indices(matchee).to_vec(),
                selected: selected == Some(matchee.item.uuid.as_str()),
            })
        })
        .collect();
    let visible = rows.len();
    let rows = rows.into_iter().skip(viewport.scroll_top).take(viewport.height.max(1)).collect();
    NavigatorView { query: navigator.query.clone(), rows, visible, total }
}
