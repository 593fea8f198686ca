//! Persistence entries and the typed field accessors used to validate them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::FilterError;

/// One persisted entity: its identity and its JSON-encoded definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub uuid: String,
    pub content: String,
}

/// Conversion between an entity and its persisted [`Entry`]
pub trait EntryConvertable {
    fn to_entry(&self) -> Entry;

    /// Validate `entry` and apply it. Leaves the entity untouched on error.
    fn from_entry(&mut self, entry: &Entry) -> Result<(), FilterError>;

    /// Fingerprint the store compares to detect changes worth persisting
    fn entry_hash(&self) -> String;

    fn entry_uuid(&self) -> &str;
}

pub(crate) fn parse_object(content: &str) -> Result<Map<String, Value>, FilterError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        _ => Err(FilterError::malformed("<root>", "should be an object")),
    }
}

/// Dotted path used in error messages, e.g. `filter.flags`
fn path(parent: &str, key: &str) -> String {
    if parent.is_empty() { key.to_string() } else { format!("{}.{}", parent, key) }
}

fn field<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value, FilterError> {
    obj.get(key).ok_or_else(|| FilterError::malformed(path(parent, key), "is missing"))
}

pub(crate) fn get_as_obj<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Map<String, Value>, FilterError> {
    field(obj, parent, key)?
        .as_object()
        .ok_or_else(|| FilterError::malformed(path(parent, key), "should be an object"))
}

pub(crate) fn get_as_string(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<String, FilterError> {
    field(obj, parent, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FilterError::malformed(path(parent, key), "should be a string"))
}

pub(crate) fn get_as_not_empty_string(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<String, FilterError> {
    let value = get_as_string(obj, parent, key)?;
    if value.is_empty() {
        return Err(FilterError::malformed(path(parent, key), "should not be empty"));
    }
    Ok(value)
}

pub(crate) fn get_as_bool(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<bool, FilterError> {
    field(obj, parent, key)?
        .as_bool()
        .ok_or_else(|| FilterError::malformed(path(parent, key), "should be a boolean"))
}
