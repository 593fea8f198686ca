//! Store file persistence: load/save with atomic writes

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::error::StoreError;
use super::metadata::{STORE_VERSION, StoreFile};
use crate::filters::{DisabledRequest, DisabledStore, FilterRequest, FilterStore};

/// Stores rebuilt from a store file
#[derive(Debug)]
pub struct LoadedStores {
    pub filters: FilterStore,
    pub disabled: DisabledStore,
    pub saved_at: DateTime<Utc>,
}

/// Load both stores from `path`
/// Returns None if the file does not exist yet
pub fn load_store(path: &Path) -> Result<Option<LoadedStores>, StoreError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store file yet");
            return Ok(None);
        }
        Err(err) => return Err(StoreError::io(path, err)),
    };
    let file: StoreFile = serde_json::from_str(&json)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;

    if file.version != STORE_VERSION {
        return Err(StoreError::VersionMismatch { expected: STORE_VERSION, found: file.version });
    }

    let mut filters = FilterStore::new();
    for entry in &file.filters {
        filters.add(FilterRequest::restore(entry)?);
    }
    let mut disabled = DisabledStore::new();
    for entry in &file.disabled {
        disabled.add(DisabledRequest::restore(entry)?);
    }

    info!(
        path = %path.display(),
        filters = filters.len(),
        disabled = disabled.len(),
        "store loaded"
    );
    Ok(Some(LoadedStores { filters, disabled, saved_at: file.saved_at }))
}

/// Save both stores atomically (temp file + rename)
pub fn save_store(
    path: &Path,
    filters: &FilterStore,
    disabled: &DisabledStore,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let file = StoreFile::capture(filters, disabled);
    let json = serde_json::to_string_pretty(&file)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;

    let temp = path.with_extension("json.tmp");
    fs::write(&temp, json).map_err(|err| StoreError::io(&temp, err))?;
    fs::rename(&temp, path).map_err(|err| StoreError::io(path, err))?;

    info!(path = %path.display(), filters = filters.len(), disabled = disabled.len(), "store saved");
    Ok(())
}
