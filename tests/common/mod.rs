//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log_filters::filters::{
    DisabledEntity, DisabledRequest, DisabledStore, Filter, FilterFlags, FilterRequest, FilterStore, Shared,
};
use log_filters::selection::{
    DisabledKind, FiltersKind, GuidSource, KeyboardListener, Provider, SelectionContext,
};
use tempfile::TempDir;

pub fn filter(pattern: &str) -> FilterRequest {
    filter_with(pattern, FilterFlags::default())
}

pub fn filter_with(pattern: &str, flags: FilterFlags) -> FilterRequest {
    FilterRequest::new(Filter::new(pattern, flags).into()).expect("valid test pattern")
}

pub fn disabled(pattern: &str) -> DisabledRequest {
    DisabledRequest::new(DisabledEntity::Filter(filter(pattern)))
}

pub fn filter_store(patterns: &[&str]) -> FilterStore {
    let mut store = FilterStore::new();
    for pattern in patterns {
        store.add(filter(pattern));
    }
    store
}

pub fn disabled_store(patterns: &[&str]) -> DisabledStore {
    let mut store = DisabledStore::new();
    for pattern in patterns {
        store.add(disabled(pattern));
    }
    store
}

pub fn patterns(store: &FilterStore) -> Vec<String> {
    store.get().iter().map(|filter| filter.definition().filter.filter.clone()).collect()
}

pub fn disabled_names(store: &DisabledStore) -> Vec<String> {
    store.get().iter().map(|request| request.display_name()).collect()
}

pub fn uuid_of(store: &FilterStore, pattern: &str) -> String {
    store
        .get()
        .iter()
        .find(|filter| filter.definition().filter.filter == pattern)
        .map(|filter| filter.uuid().to_string())
        .expect("pattern in store")
}

/// Both list panels over shared stores, wired like the terminal UI wires them
pub struct Panels {
    pub filters: Shared<FilterStore>,
    pub disabled: Shared<DisabledStore>,
    pub keyboard: KeyboardListener,
    pub filters_provider: Provider<FiltersKind>,
    pub disabled_provider: Provider<DisabledKind>,
}

impl Panels {
    pub fn new(filters: &[&str], parked: &[&str]) -> Self {
        let filters = Rc::new(RefCell::new(filter_store(filters)));
        let disabled = Rc::new(RefCell::new(disabled_store(parked)));
        let keyboard = KeyboardListener::new();
        let members: Vec<Rc<dyn GuidSource>> = vec![
            filters.clone() as Rc<dyn GuidSource>,
            disabled.clone() as Rc<dyn GuidSource>,
        ];
        let context = SelectionContext::new(members);
        let filters_provider = Provider::new(
            FiltersKind::new(filters.clone(), disabled.clone()),
            keyboard.clone(),
            context.clone(),
        );
        let disabled_provider = Provider::new(
            DisabledKind::new(disabled.clone(), filters.clone()),
            keyboard.clone(),
            context,
        );
        Self { filters, disabled, keyboard, filters_provider, disabled_provider }
    }

    pub fn sync(&mut self) {
        self.filters_provider.sync();
        self.disabled_provider.sync();
    }
}

/// Temporary directory holding a store file and log files
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.temp_dir.path().join("filters.json")
    }

    /// Write a log file (parent directories created) and return its path
    pub fn write_log(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create log dir");
        }
        fs::write(&path, content).expect("Failed to write log file");
        path
    }
}
