//! A single search filter: pattern, flags, colors and active state.
//!
//! The marker expression and the internal hash are derived from `(filter, flags)`
//! only. Setters report whether anything changed and, unless silenced, emit an
//! [`UpdateEvent`] after the change is applied.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::colors::{SCHEME_COLOR_ACCENT, contrast_color};
use super::entry::{
    Entry, EntryConvertable, get_as_bool, get_as_not_empty_string, get_as_obj, get_as_string,
    parse_object,
};
use super::error::FilterError;
use super::flags::{Filter, FilterFlags, MarkerRegex, is_valid_regex};
use crate::events::{Subject, Subscription};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    pub color: String,
    pub background: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self { color: contrast_color(SCHEME_COLOR_ACCENT), background: SCHEME_COLOR_ACCENT.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalColors {
    pub color: Option<String>,
    pub background: Option<String>,
}

/// Full persisted state of a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub filter: Filter,
    pub colors: Colors,
    pub active: bool,
    pub uuid: String,
}

/// Constructor input; omitted fields get defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalDefinition {
    pub filter: Filter,
    pub colors: Option<OptionalColors>,
    pub active: Option<bool>,
    pub uuid: Option<String>,
}

impl From<Filter> for OptionalDefinition {
    fn from(filter: Filter) -> Self {
        Self { filter, ..Default::default() }
    }
}

/// Any subset of the mutable fields, applied by [`Setter::from`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub filter: Option<String>,
    pub flags: Option<FilterFlags>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub active: Option<bool>,
}

/// Which categories an update touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatedParts {
    pub request: bool,
    pub state: bool,
    pub colors: bool,
}

impl UpdatedParts {
    pub fn any(&self) -> bool {
        self.request || self.state || self.colors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Snapshot of the filter after the update
    pub filter: Definition,
    pub updated: UpdatedParts,
}

pub struct FilterRequest {
    definition: Definition,
    marker: MarkerRegex,
    hash: String,
    updated: Subject<UpdateEvent>,
}

fn compile(filter: &Filter) -> Result<MarkerRegex, FilterError> {
    // An empty pattern would match everywhere and cannot be restored
    if filter.filter.is_empty() {
        return Err(FilterError::EmptyPattern);
    }
    MarkerRegex::build(&filter.filter, &filter.flags)
        .map_err(|source| FilterError::InvalidPattern { pattern: filter.filter.clone(), source })
}

impl FilterRequest {
    /// `None` is never valid; otherwise the pattern has to compile as a regex
    pub fn is_valid(request: Option<&str>) -> bool {
        match request {
            Some(pattern) => is_valid_regex(pattern),
            None => false,
        }
    }

    pub fn new(def: OptionalDefinition) -> Result<Self, FilterError> {
        let defaults = Colors::default();
        let colors = match def.colors {
            Some(colors) => Colors {
                color: colors.color.filter(|c| !c.is_empty()).unwrap_or(defaults.color),
                background: colors
                    .background
                    .filter(|c| !c.is_empty())
                    .unwrap_or(defaults.background),
            },
            None => defaults,
        };
        let definition = Definition {
            filter: def.filter,
            colors,
            active: def.active.unwrap_or(true),
            uuid: def.uuid.unwrap_or_else(|| Uuid::new_v4().to_string()),
        };
        let marker = compile(&definition.filter)?;
        let hash = marker.fingerprint();
        Ok(Self { definition, marker, hash, updated: Subject::new() })
    }

    /// Rebuild a filter from its persisted entry, keeping the stored uuid
    pub fn restore(entry: &Entry) -> Result<Self, FilterError> {
        let definition = definition_from_content(&entry.content)?;
        Self::new(OptionalDefinition {
            filter: definition.filter,
            colors: Some(OptionalColors {
                color: Some(definition.colors.color),
                background: Some(definition.colors.background),
            }),
            active: Some(definition.active),
            uuid: Some(definition.uuid),
        })
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn uuid(&self) -> &str {
        &self.definition.uuid
    }

    pub fn is_active(&self) -> bool {
        self.definition.active
    }

    pub fn subscribe(&self) -> Subscription<UpdateEvent> {
        self.updated.subscribe()
    }

    /// Release every subscriber of this filter's update events
    pub fn destroy(&self) {
        self.updated.destroy();
    }

    /// Cached marker expression
    pub fn as_regex(&self) -> &Regex {
        self.marker.regex()
    }

    pub fn as_filter(&self) -> Filter {
        self.definition.filter.clone()
    }

    /// Internal hash: marker source followed by its flags
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Number of marker matches in `text`
    pub fn count_in(&self, text: &str) -> usize {
        self.marker.regex().find_iter(text).count()
    }

    pub fn set(&mut self) -> Setter<'_> {
        Setter { request: self, silent: false }
    }

    /// Setters that mutate without emitting update events
    pub fn set_silent(&mut self) -> Setter<'_> {
        Setter { request: self, silent: true }
    }

    fn emit(&self, updated: UpdatedParts) {
        self.updated.emit(UpdateEvent { filter: self.definition.clone(), updated });
    }

    /// Swap in a new `(filter, flags)` pair; `true` if the hash changed
    fn recompile(&mut self, filter: Filter) -> Result<bool, FilterError> {
        let marker = compile(&filter)?;
        let hash = marker.fingerprint();
        self.definition.filter = filter;
        self.marker = marker;
        if hash == self.hash {
            return Ok(false);
        }
        debug!(uuid = %self.definition.uuid, from = %self.hash, to = %hash, "filter recompiled");
        self.hash = hash;
        Ok(true)
    }
}

impl std::fmt::Debug for FilterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRequest")
            .field("definition", &self.definition)
            .field("hash", &self.hash)
            .finish()
    }
}

/// Fluent setter surface returned by [`FilterRequest::set`]
pub struct Setter<'a> {
    request: &'a mut FilterRequest,
    silent: bool,
}

impl Setter<'_> {
    pub fn filter(self, filter: &str) -> Result<bool, FilterError> {
        let next = Filter::new(filter, self.request.definition.filter.flags);
        if !self.request.recompile(next)? {
            return Ok(false);
        }
        if !self.silent {
            self.request.emit(UpdatedParts { request: true, ..Default::default() });
        }
        Ok(true)
    }

    pub fn flags(self, flags: FilterFlags) -> Result<bool, FilterError> {
        let next = Filter::new(self.request.definition.filter.filter.clone(), flags);
        if !self.request.recompile(next)? {
            return Ok(false);
        }
        if !self.silent {
            self.request.emit(UpdatedParts { request: true, ..Default::default() });
        }
        Ok(true)
    }

    pub fn color(self, color: &str) -> bool {
        if color.is_empty() || self.request.definition.colors.color == color {
            return false;
        }
        self.request.definition.colors.color = color.to_string();
        if !self.silent {
            self.request.emit(UpdatedParts { colors: true, ..Default::default() });
        }
        true
    }

    pub fn background(self, background: &str) -> bool {
        if background.is_empty() || self.request.definition.colors.background == background {
            return false;
        }
        self.request.definition.colors.background = background.to_string();
        if !self.silent {
            self.request.emit(UpdatedParts { colors: true, ..Default::default() });
        }
        true
    }

    pub fn state(self, active: bool) -> bool {
        if self.request.definition.active == active {
            return false;
        }
        self.request.definition.active = active;
        if !self.silent {
            self.request.emit(UpdatedParts { state: true, ..Default::default() });
        }
        true
    }

    /// Apply any subset of fields and emit at most one combined event.
    ///
    /// The resulting pattern is compiled before anything is touched, so an
    /// invalid pattern leaves the filter as it was.
    pub fn from(self, desc: UpdateRequest) -> Result<bool, FilterError> {
        let current = &self.request.definition.filter;
        let target = Filter::new(
            desc.filter.clone().unwrap_or_else(|| current.filter.clone()),
            desc.flags.unwrap_or(current.flags),
        );
        compile(&target)?;

        let request = self.request;
        let mut updated = UpdatedParts::default();
        if let Some(filter) = &desc.filter {
            updated.request |= request.set_silent().filter(filter)?;
        }
        if let Some(flags) = desc.flags {
            updated.request |= request.set_silent().flags(flags)?;
        }
        if let Some(active) = desc.active {
            updated.state |= request.set_silent().state(active);
        }
        if let Some(color) = &desc.color {
            updated.colors |= request.set_silent().color(color);
        }
        if let Some(background) = &desc.background {
            updated.colors |= request.set_silent().background(background);
        }
        if updated.any() && !self.silent {
            request.emit(updated);
        }
        Ok(updated.any())
    }
}

/// Parse and validate a persisted definition field by field
fn definition_from_content(content: &str) -> Result<Definition, FilterError> {
    let def = parse_object(content)?;
    let uuid = get_as_string(&def, "", "uuid")?;
    let filter = get_as_obj(&def, "", "filter")?;
    let flags = get_as_obj(filter, "filter", "flags")?;
    let flags = FilterFlags {
        cases: get_as_bool(flags, "filter.flags", "cases")?,
        word: get_as_bool(flags, "filter.flags", "word")?,
        reg: get_as_bool(flags, "filter.flags", "reg")?,
    };
    let pattern = get_as_not_empty_string(filter, "filter", "filter")?;
    let colors = get_as_obj(&def, "", "colors")?;
    let colors = Colors {
        color: get_as_not_empty_string(colors, "colors", "color")?,
        background: get_as_not_empty_string(colors, "colors", "background")?,
    };
    let active = get_as_bool(&def, "", "active")?;
    Ok(Definition { filter: Filter::new(pattern, flags), colors, active, uuid })
}

impl EntryConvertable for FilterRequest {
    fn to_entry(&self) -> Entry {
        Entry {
            uuid: self.definition.uuid.clone(),
            // Strings and bools only; serializing cannot fail
            content: serde_json::to_string(&self.definition).expect("definition serializes"),
        }
    }

    fn from_entry(&mut self, entry: &Entry) -> Result<(), FilterError> {
        let def = definition_from_content(&entry.content)?;
        self.recompile(def.filter)?;
        self.definition.colors = def.colors;
        self.definition.active = def.active;
        Ok(())
    }

    fn entry_hash(&self) -> String {
        let def = &self.definition;
        format!(
            "{}{}{}{}{}{}{}",
            def.filter.filter,
            if def.filter.flags.cases { "c" } else { "" },
            if def.filter.flags.reg { "r" } else { "" },
            if def.filter.flags.word { "w" } else { "" },
            def.colors.color,
            def.colors.background,
            if def.active { "1" } else { "0" },
        )
    }

    fn entry_uuid(&self) -> &str {
        &self.definition.uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pattern: &str) -> FilterRequest {
        FilterRequest::new(Filter::new(pattern, FilterFlags::default()).into()).unwrap()
    }

    #[test]
    fn test_new_fills_defaults() {
        let filter = request("error");
        let def = filter.definition();
        assert!(def.active);
        assert_eq!(def.colors, Colors::default());
        assert!(Uuid::parse_str(&def.uuid).is_ok());
        assert_eq!(filter.hash(), "(error)gi");
    }

    #[test]
    fn test_new_keeps_supplied_fields() {
        let filter = FilterRequest::new(OptionalDefinition {
            filter: Filter::new("warn", FilterFlags::default()),
            colors: Some(OptionalColors { color: Some("#111111".into()), background: None }),
            active: Some(false),
            uuid: Some("fixed".into()),
        })
        .unwrap();

        let def = filter.definition();
        assert_eq!(def.uuid, "fixed");
        assert!(!def.active);
        assert_eq!(def.colors.color, "#111111");
        assert_eq!(def.colors.background, SCHEME_COLOR_ACCENT);
    }

    #[test]
    fn test_new_rejects_invalid_regex() {
        let result = FilterRequest::new(Filter::new("(", FilterFlags::new(false, false, true)).into());
        assert!(matches!(result, Err(FilterError::InvalidPattern { .. })));
    }

    #[test]
    fn test_is_valid() {
        assert!(!FilterRequest::is_valid(None));
        assert!(FilterRequest::is_valid(Some("a|b")));
        assert!(!FilterRequest::is_valid(Some("a(")));
    }

    #[test]
    fn test_set_filter_same_text_is_noop() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        assert!(!filter.set().filter("error").unwrap());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_set_filter_emits_request_update() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        assert!(filter.set().filter("warn").unwrap());
        let events = sub.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].updated, UpdatedParts { request: true, state: false, colors: false });
        assert_eq!(events[0].filter.filter.filter, "warn");
        assert_eq!(filter.hash(), "(warn)gi");
    }

    #[test]
    fn test_set_filter_invalid_keeps_state() {
        let mut filter =
            FilterRequest::new(Filter::new("a+", FilterFlags::new(false, false, true)).into()).unwrap();
        assert!(filter.set().filter("a(").is_err());
        assert_eq!(filter.definition().filter.filter, "a+");
        assert_eq!(filter.hash(), "(a+)gi");
    }

    #[test]
    fn test_set_flags_that_do_not_change_regex_is_noop() {
        // Escaping a pattern without metacharacters yields the same source
        let mut filter = request("plain");
        let sub = filter.subscribe();

        assert!(!filter.set().flags(FilterFlags::new(false, false, true)).unwrap());
        assert!(sub.drain().is_empty());
        assert!(filter.definition().filter.flags.reg);
    }

    #[test]
    fn test_set_flags_changes_hash() {
        let mut filter = request("plain");
        assert!(filter.set().flags(FilterFlags::new(true, false, false)).unwrap());
        assert_eq!(filter.hash(), "(plain)g");
    }

    #[test]
    fn test_silent_setters_do_not_emit() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        assert!(filter.set_silent().filter("warn").unwrap());
        assert!(filter.set_silent().state(false));
        assert!(filter.set_silent().color("#000000"));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_color_setters() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        assert!(filter.set().color("#abcdef"));
        assert!(!filter.set().color("#abcdef"));
        assert!(filter.set().background("#fedcba"));

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.updated == UpdatedParts { colors: true, ..Default::default() }));
    }

    #[test]
    fn test_state_setter() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        assert!(!filter.set().state(true));
        assert!(filter.set().state(false));
        assert_eq!(sub.drain().len(), 1);
        assert!(!filter.is_active());
    }

    #[test]
    fn test_from_single_color_emits_one_event() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        let changed = filter
            .set()
            .from(UpdateRequest { color: Some("#fff".into()), ..Default::default() })
            .unwrap();

        assert!(changed);
        let events = sub.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].updated, UpdatedParts { colors: true, request: false, state: false });
        assert_eq!(filter.definition().colors.color, "#fff");
        assert_eq!(filter.definition().colors.background, SCHEME_COLOR_ACCENT);
    }

    #[test]
    fn test_from_combines_categories() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        let changed = filter
            .set()
            .from(UpdateRequest {
                filter: Some("fatal".into()),
                active: Some(false),
                background: Some("#000".into()),
                ..Default::default()
            })
            .unwrap();

        assert!(changed);
        let events = sub.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].updated, UpdatedParts { request: true, state: true, colors: true });
    }

    #[test]
    fn test_from_nothing_changed() {
        let mut filter = request("error");
        let sub = filter.subscribe();

        let changed = filter
            .set()
            .from(UpdateRequest { filter: Some("error".into()), active: Some(true), ..Default::default() })
            .unwrap();

        assert!(!changed);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_from_invalid_pattern_is_atomic() {
        let mut filter = request("error");
        let result = filter.set().from(UpdateRequest {
            filter: Some("(".into()),
            flags: Some(FilterFlags::new(false, false, true)),
            active: Some(false),
            ..Default::default()
        });

        assert!(result.is_err());
        assert!(filter.is_active());
        assert_eq!(filter.definition().filter.filter, "error");
    }

    #[test]
    fn test_as_regex_is_cached() {
        let filter = request("error");
        let first = filter.as_regex() as *const Regex;
        let second = filter.as_regex() as *const Regex;
        assert_eq!(first, second);
        assert!(filter.as_regex().is_match("An ERROR occurred"));
    }

    #[test]
    fn test_count_in() {
        let filter = request("ab");
        assert_eq!(filter.count_in("ab AB xab"), 3);
        assert_eq!(filter.count_in("nothing"), 0);
    }

    #[test]
    fn test_entry_round_trip() {
        let mut original = FilterRequest::new(OptionalDefinition {
            filter: Filter::new("timeout", FilterFlags::new(true, true, false)),
            colors: Some(OptionalColors {
                color: Some("#010101".into()),
                background: Some("#fefefe".into()),
            }),
            active: Some(false),
            uuid: None,
        })
        .unwrap();
        let entry = original.to_entry();
        assert_eq!(entry.uuid, original.uuid());

        let restored = FilterRequest::restore(&entry).unwrap();
        assert_eq!(restored.definition(), original.definition());

        let mut other = request("something else");
        other.from_entry(&entry).unwrap();
        assert_eq!(other.definition().filter, original.definition().filter);
        assert_eq!(other.definition().colors, original.definition().colors);
        assert_eq!(other.definition().active, original.definition().active);
        assert_ne!(other.uuid(), original.uuid());
        assert_eq!(other.hash(), original.hash());

        assert!(original.set().state(true));
        assert_ne!(original.entry_hash(), other.entry_hash());
    }

    #[test]
    fn test_empty_pattern_rejected_everywhere() {
        let result = FilterRequest::new(Filter::new("", FilterFlags::default()).into());
        assert!(matches!(result, Err(FilterError::EmptyPattern)));

        let mut filter = request("error");
        let sub = filter.subscribe();
        assert!(matches!(filter.set().filter(""), Err(FilterError::EmptyPattern)));
        let update = UpdateRequest { filter: Some(String::new()), active: Some(false), ..Default::default() };
        assert!(filter.set().from(update).is_err());

        assert_eq!(filter.definition().filter.filter, "error");
        assert!(filter.is_active());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_empty_colors_are_ignored() {
        let mut filter = FilterRequest::new(OptionalDefinition {
            filter: Filter::new("error", FilterFlags::default()),
            colors: Some(OptionalColors { color: Some(String::new()), background: Some(String::new()) }),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.definition().colors, Colors::default());

        let sub = filter.subscribe();
        assert!(!filter.set().color(""));
        assert!(!filter.set().background(""));
        assert!(sub.drain().is_empty());
        assert_eq!(filter.definition().colors, Colors::default());
    }

    #[test]
    fn test_boundary_values_restore() {
        let cases = [
            ("x", FilterFlags::default()),
            (" ", FilterFlags::new(true, false, false)),
            (".", FilterFlags::new(false, true, true)),
            ("\\", FilterFlags::new(true, true, false)),
        ];
        for (pattern, flags) in cases {
            let mut original = FilterRequest::new(Filter::new(pattern, flags).into()).unwrap();
            original.set().color("#000000");
            original.set().color("");
            let restored = FilterRequest::restore(&original.to_entry()).unwrap();
            assert_eq!(restored.definition(), original.definition());
            assert_eq!(restored.hash(), original.hash());
        }
    }

    #[test]
    fn test_from_entry_missing_filter_field() {
        let mut filter = request("error");
        let entry = Entry {
            uuid: "x".into(),
            content: r##"{"uuid":"x","filter":{"flags":{"cases":false,"word":false,"reg":false}},"colors":{"color":"#fff","background":"#000"},"active":true}"##.into(),
        };

        let err = filter.from_entry(&entry).unwrap_err();
        assert!(err.to_string().contains("filter.filter"));
        assert_eq!(filter.definition().filter.filter, "error");
    }

    #[test]
    fn test_from_entry_wrong_types() {
        let mut filter = request("error");
        let bad_active = Entry {
            uuid: "x".into(),
            content: r##"{"uuid":"x","filter":{"filter":"a","flags":{"cases":false,"word":false,"reg":false}},"colors":{"color":"#fff","background":"#000"},"active":"yes"}"##.into(),
        };
        assert!(matches!(filter.from_entry(&bad_active), Err(FilterError::MalformedEntry { .. })));

        let not_json = Entry { uuid: "x".into(), content: "{".into() };
        assert!(matches!(filter.from_entry(&not_json), Err(FilterError::Json(_))));
    }

    #[test]
    fn test_entry_hash_format() {
        let filter = FilterRequest::new(OptionalDefinition {
            filter: Filter::new("x", FilterFlags::new(true, true, true)),
            colors: Some(OptionalColors { color: Some("#1".into()), background: Some("#2".into()) }),
            active: Some(true),
            uuid: None,
        })
        .unwrap();
        assert_eq!(filter.entry_hash(), "xcrw#1#21");
    }

    #[test]
    fn test_identical_definitions_have_identical_regex_but_distinct_uuids() {
        let a = request("same");
        let b = request("same");
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.as_regex().as_str(), b.as_regex().as_str());
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_destroy_closes_subscriptions() {
        let filter = request("error");
        let sub = filter.subscribe();
        filter.destroy();
        assert!(sub.is_closed());
    }
}
