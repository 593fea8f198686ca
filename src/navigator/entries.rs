//! Grouped, fuzzy-filtered list behind the navigator popup.
//!
//! Items live in numbered groups. Filtering asks the [`ScoreOracle`] for fresh
//! scores, re-sorts each group by descending score (ties keep their previous
//! order) and repairs the selection. Items scoring zero or less stay stored but
//! are not visible; each group shows at most [`MAX_VISIBLE_ITEMS`].

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tracing::trace;

use crate::events::{Subject, Subscription};
use crate::matcher::{MatchMode, Matchee, ScoreOracle, create_passive_matchee_list};

/// Visible items per group
pub const MAX_VISIBLE_ITEMS: usize = 35;

/// Height of one row, in viewport units
pub const ELEMENT_HEIGHT: usize = 1;

/// Anything the navigator can list
pub trait NavigatorItem {
    fn uuid(&self) -> &str;
    /// Text the oracle scores against
    fn label(&self) -> String;
}

#[derive(Debug)]
pub struct Collection<E> {
    pub index: usize,
    pub title: String,
    /// Item count before filtering
    pub total: usize,
    pub entries: Vec<Matchee<E>>,
}

/// Visible part of a [`Collection`]
#[derive(Debug)]
pub struct FilteredCollection<'a, E> {
    pub index: usize,
    pub title: &'a str,
    pub total: usize,
    pub entries: Vec<&'a Matchee<E>>,
}

/// Scrollable window over the flattened visible list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub height: usize,
    pub scroll_top: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { height, scroll_top: 0 }
    }

    /// Scroll the least amount that brings row `index` fully into view.
    /// Returns `true` if the viewport moved.
    pub fn scroll_into_view(&mut self, index: usize) -> bool {
        if self.height == 0 {
            return false;
        }
        let offset = index * ELEMENT_HEIGHT;
        if offset >= self.scroll_top && offset + ELEMENT_HEIGHT <= self.height + self.scroll_top {
            return false;
        }
        self.scroll_top = if offset < self.scroll_top {
            offset
        } else {
            (offset + ELEMENT_HEIGHT).saturating_sub(self.height)
        };
        true
    }
}

pub struct Entries<E> {
    collections: BTreeMap<usize, Collection<E>>,
    oracle: Box<dyn ScoreOracle>,
    selected: Option<String>,
    viewport: Viewport,
    query: String,
    update: Subject<()>,
}

impl<E: NavigatorItem> Entries<E> {
    pub fn new(oracle: Box<dyn ScoreOracle>) -> Self {
        Self {
            collections: BTreeMap::new(),
            oracle,
            selected: None,
            viewport: Viewport::default(),
            query: String::new(),
            update: Subject::new(),
        }
    }

    /// Register a group; replaces any group with the same index
    pub fn add(&mut self, index: usize, title: impl Into<String>, items: Vec<E>) {
        let total = items.len();
        let entries = create_passive_matchee_list(items, &mut *self.oracle, |item| item.label());
        self.collections.insert(index, Collection { index, title: title.into(), total, entries });
    }

    pub fn subscribe(&self) -> Subscription<()> {
        self.update.subscribe()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(&mut self, uuid: Option<String>) {
        self.selected = uuid;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.height = height;
    }

    pub fn score(&self, matchee: &Matchee<E>) -> i64 {
        self.oracle.score(matchee.key)
    }

    /// Matched character positions of `matchee` for highlighting
    pub fn indices(&self, matchee: &Matchee<E>) -> &[u32] {
        self.oracle.indices(matchee.key)
    }

    /// Rescore, re-sort and repair the selection for `query`
    pub fn filtering(&mut self, query: &str) {
        self.query = query.to_string();
        self.oracle.search(query, MatchMode::Span);
        let oracle = &self.oracle;
        for collection in self.collections.values_mut() {
            collection.entries.sort_by_key(|matchee| Reverse(oracle.score(matchee.key)));
        }
        self.default_selection();
        self.navigate().update();
        trace!(query, visible = self.all().len(), "navigator filtered");
        self.update.emit(());
    }

    /// Visible items of every group, flattened in group order
    pub fn all(&self) -> Vec<&Matchee<E>> {
        self.filtered().into_iter().flat_map(|collection| collection.entries).collect()
    }

    pub fn filtered(&self) -> Vec<FilteredCollection<'_, E>> {
        self.collections
            .values()
            .map(|collection| FilteredCollection {
                index: collection.index,
                title: &collection.title,
                total: collection.total,
                entries: collection
                    .entries
                    .iter()
                    .filter(|matchee| self.oracle.score(matchee.key) > 0)
                    .take(MAX_VISIBLE_ITEMS)
                    .collect(),
            })
            .collect()
    }

    /// Stored item count, visible or not
    pub fn len(&self) -> usize {
        self.collections.values().map(|collection| collection.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Select the first stored item of the first non-empty group
    pub fn default_selection(&mut self) {
        self.selected = self
            .collections
            .values()
            .find_map(|collection| collection.entries.first())
            .map(|matchee| matchee.item.uuid().to_string());
    }

    pub fn get_selected(&self) -> Option<&E> {
        let selected = self.selected.as_deref()?;
        self.collections
            .values()
            .flat_map(|collection| collection.entries.iter())
            .find(|matchee| matchee.item.uuid() == selected)
            .map(|matchee| &matchee.item)
    }

    /// Group index of the selected item
    pub fn selected_group(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.collections
            .values()
            .find(|collection| collection.entries.iter().any(|m| m.item.uuid() == selected))
            .map(|collection| collection.index)
    }

    /// Navigation over the visible list as it is right now
    pub fn navigate(&mut self) -> Mover<'_, E> {
        let visible = self.all().iter().map(|matchee| matchee.item.uuid().to_string()).collect();
        Mover { entries: self, visible }
    }
}

pub struct Mover<'a, E> {
    entries: &'a mut Entries<E>,
    visible: Vec<String>,
}

impl<E> Mover<'_, E> {
    fn position(&self) -> Option<usize> {
        let selected = self.entries.selected.as_deref()?;
        self.visible.iter().position(|uuid| uuid == selected)
    }

    fn select(&mut self, index: usize) {
        self.entries.selected = Some(self.visible[index].clone());
    }

    /// Previous visible item, wrapping to the last; with nothing selected the
    /// last item is picked
    pub fn up(mut self) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        if self.entries.selected.is_none() {
            self.select(last);
            return;
        }
        let target = match self.position() {
            None | Some(0) => last,
            Some(index) => index - 1,
        };
        self.select(target);
        self.entries.viewport.scroll_into_view(target);
    }

    /// Next visible item, wrapping to the first; with nothing selected the
    /// first item is picked
    pub fn down(mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.entries.selected.is_none() {
            self.select(0);
            return;
        }
        let target = match self.position() {
            Some(index) if index + 1 < self.visible.len() => index + 1,
            _ => 0,
        };
        self.select(target);
        self.entries.viewport.scroll_into_view(target);
    }

    /// Keep the selection if it is still visible, otherwise fall back to the
    /// first visible item. Does nothing when nothing is visible.
    pub fn update(mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.position().is_none() {
            self.select(0);
        }
    }

    pub fn scroll_into_view(self, index: usize) -> bool {
        self.entries.viewport.scroll_into_view(index)
    }
}
