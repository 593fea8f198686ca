//! Entities parked in the disabled list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::entry::{Entry, EntryConvertable, get_as_string, parse_object};
use super::error::FilterError;
use super::request::FilterRequest;

/// Kind tag of an entity that can be disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTypeRef {
    Filter,
}

/// Capabilities every disableable entity provides
pub trait DisableConvertable {
    fn display_name(&self) -> String;
    fn type_ref(&self) -> EntityTypeRef;
    fn icon(&self) -> &'static str;
}

impl DisableConvertable for FilterRequest {
    fn display_name(&self) -> String {
        self.definition().filter.filter.clone()
    }

    fn type_ref(&self) -> EntityTypeRef {
        EntityTypeRef::Filter
    }

    fn icon(&self) -> &'static str {
        "search"
    }
}

#[derive(Debug)]
pub enum DisabledEntity {
    Filter(FilterRequest),
}

impl DisabledEntity {
    fn as_convertable(&self) -> &dyn DisableConvertable {
        match self {
            DisabledEntity::Filter(filter) => filter,
        }
    }
}

#[derive(Debug)]
pub struct DisabledRequest {
    uuid: String,
    entity: DisabledEntity,
}

#[derive(Serialize, Deserialize)]
struct DisabledContent {
    #[serde(rename = "typeRef")]
    type_ref: EntityTypeRef,
    entity: Entry,
}

impl DisabledRequest {
    pub fn new(entity: DisabledEntity) -> Self {
        Self { uuid: Uuid::new_v4().to_string(), entity }
    }

    /// Rebuild a disabled entity from its persisted entry
    pub fn restore(entry: &Entry) -> Result<Self, FilterError> {
        let (type_ref, inner) = parse_content(&entry.content)?;
        let entity = match type_ref {
            EntityTypeRef::Filter => DisabledEntity::Filter(FilterRequest::restore(&inner)?),
        };
        Ok(Self { uuid: entry.uuid.clone(), entity })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn entity(&self) -> &DisabledEntity {
        &self.entity
    }

    /// Unwrap the parked entity, e.g. to move it back into its own list
    pub fn into_entity(self) -> DisabledEntity {
        self.entity
    }

    pub fn display_name(&self) -> String {
        self.entity.as_convertable().display_name()
    }

    pub fn type_ref(&self) -> EntityTypeRef {
        self.entity.as_convertable().type_ref()
    }

    pub fn icon(&self) -> &'static str {
        self.entity.as_convertable().icon()
    }
}

fn parse_content(content: &str) -> Result<(EntityTypeRef, Entry), FilterError> {
    let obj = parse_object(content)?;
    let type_ref: EntityTypeRef = match obj.get("typeRef") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|_| FilterError::malformed("typeRef", "is not a known entity type"))?,
        None => return Err(FilterError::malformed("typeRef", "is missing")),
    };
    let inner = match obj.get("entity") {
        Some(Value::Object(entity)) => Entry {
            uuid: get_as_string(entity, "entity", "uuid")?,
            content: get_as_string(entity, "entity", "content")?,
        },
        Some(_) => return Err(FilterError::malformed("entity", "should be an object")),
        None => return Err(FilterError::malformed("entity", "is missing")),
    };
    Ok((type_ref, inner))
}

impl EntryConvertable for DisabledRequest {
    fn to_entry(&self) -> Entry {
        let content = match &self.entity {
            DisabledEntity::Filter(filter) => {
                DisabledContent { type_ref: EntityTypeRef::Filter, entity: filter.to_entry() }
            }
        };
        Entry {
            uuid: self.uuid.clone(),
            // String fields and a unit enum tag; serializing cannot fail
            content: serde_json::to_string(&content).expect("disabled entry serializes"),
        }
    }

    fn from_entry(&mut self, entry: &Entry) -> Result<(), FilterError> {
        let (type_ref, inner) = parse_content(&entry.content)?;
        match (&mut self.entity, type_ref) {
            (DisabledEntity::Filter(filter), EntityTypeRef::Filter) => filter.from_entry(&inner),
        }
    }

    fn entry_hash(&self) -> String {
        match &self.entity {
            DisabledEntity::Filter(filter) => filter.entry_hash(),
        }
    }

    fn entry_uuid(&self) -> &str {
        &self.uuid
    }
}
