//! Ordered stores owning the filters and the disabled entities.
//!
//! Providers never reach into each other; they cooperate by sharing these
//! stores (`Rc<RefCell<_>>`). Every structural change emits a [`StoreUpdate`].

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::disabled::{DisabledEntity, DisabledRequest};
use super::entry::EntryConvertable;
use super::error::FilterError;
use super::request::{FilterRequest, UpdateRequest};
use crate::events::{Subject, Subscription};

/// Store contents after a structural change, as ordered uuids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUpdate {
    pub guids: Vec<String>,
}

/// Entities a store can own
pub trait StoreItem: EntryConvertable {
    /// Release event channels held by the entity
    fn release(&self) {}
}

impl StoreItem for FilterRequest {
    fn release(&self) {
        self.destroy();
    }
}

impl StoreItem for DisabledRequest {
    fn release(&self) {
        match self.entity() {
            DisabledEntity::Filter(filter) => filter.destroy(),
        }
    }
}

#[derive(Debug)]
pub struct EntityStore<T> {
    items: Vec<T>,
    updated: Subject<StoreUpdate>,
}

pub type FilterStore = EntityStore<FilterRequest>;
pub type DisabledStore = EntityStore<DisabledRequest>;

/// Store handle shared between providers
pub type Shared<T> = Rc<RefCell<T>>;

impl<T: StoreItem> EntityStore<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), updated: Subject::new() }
    }

    pub fn shared() -> Shared<Self> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn subscribe(&self) -> Subscription<StoreUpdate> {
        self.updated.subscribe()
    }

    pub fn get(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn guids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.entry_uuid().to_string()).collect()
    }

    pub fn find(&self, uuid: &str) -> Option<&T> {
        self.items.iter().find(|item| item.entry_uuid() == uuid)
    }

    pub fn find_mut(&mut self, uuid: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.entry_uuid() == uuid)
    }

    pub fn position(&self, uuid: &str) -> Option<usize> {
        self.items.iter().position(|item| item.entry_uuid() == uuid)
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
        self.emit();
    }

    /// Insert at `index`, clamped to the end of the store
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.emit();
    }

    /// Take the given entities out of the store, returning them in store order
    pub fn delete(&mut self, uuids: &[impl AsRef<str>]) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| uuids.iter().any(|uuid| uuid.as_ref() == item.entry_uuid()));
        self.items = kept;
        if !removed.is_empty() {
            self.emit();
        }
        removed
    }

    /// Move the entity at `prev` to `curt`
    pub fn reorder(&mut self, prev: usize, curt: usize) {
        if prev >= self.items.len() || curt >= self.items.len() {
            warn!(prev, curt, len = self.items.len(), "reorder out of bounds ignored");
            return;
        }
        if prev == curt {
            return;
        }
        let item = self.items.remove(prev);
        self.items.insert(curt, item);
        self.emit();
    }

    /// Drop every entity and release its event channels
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            item.release();
        }
        debug!("store cleared");
        self.emit();
    }

    /// Combined entry fingerprint, used to skip persisting unchanged stores
    pub fn hash(&self) -> String {
        self.items.iter().map(|item| item.entry_hash()).collect::<Vec<_>>().join(";")
    }

    fn emit(&self) {
        self.updated.emit(StoreUpdate { guids: self.guids() });
    }
}

impl<T: StoreItem> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore<FilterRequest> {
    pub fn active(&self) -> impl Iterator<Item = &FilterRequest> {
        self.items.iter().filter(|filter| filter.is_active())
    }

    /// Apply `update` to one filter; `Ok(false)` when the filter is unknown or
    /// nothing changed
    pub fn update(&mut self, uuid: &str, update: UpdateRequest) -> Result<bool, FilterError> {
        let Some(filter) = self.find_mut(uuid) else {
            return Ok(false);
        };
        let changed = filter.set().from(update)?;
        if changed {
            self.emit();
        }
        Ok(changed)
    }
}
