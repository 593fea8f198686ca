use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Matching toggles of a filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterFlags {
    /// Case-sensitive matching
    pub cases: bool,
    /// Whole-word matching
    pub word: bool,
    /// Pattern is a regular expression (otherwise matched literally)
    pub reg: bool,
}

impl FilterFlags {
    pub fn new(cases: bool, word: bool, reg: bool) -> Self {
        Self { cases, word, reg }
    }
}

/// Raw pattern text plus its matching flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub filter: String,
    pub flags: FilterFlags,
}

impl Filter {
    pub fn new(filter: impl Into<String>, flags: FilterFlags) -> Self {
        Self { filter: filter.into(), flags }
    }
}

/// Compiled marker expression for a filter.
///
/// `source` and `flags` mirror the textual form the expression is identified by:
/// the source is the pattern (escaped unless `reg`, wrapped in `\b` when `word`)
/// inside a single capture group, and the flags are `g` for case-sensitive
/// filters and `gi` otherwise.
#[derive(Debug, Clone)]
pub struct MarkerRegex {
    regex: Regex,
    source: String,
    flags: &'static str,
}

impl MarkerRegex {
    pub fn build(filter: &str, flags: &FilterFlags) -> Result<Self, regex::Error> {
        let body = if flags.reg { filter.to_string() } else { regex::escape(filter) };
        let body = if flags.word { format!(r"\b{}\b", body) } else { body };
        let source = format!("({})", body);
        let regex = RegexBuilder::new(&source).case_insensitive(!flags.cases).build()?;
        Ok(Self { regex, source, flags: if flags.cases { "g" } else { "gi" } })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        self.flags
    }

    /// `source` followed by `flags`; equal fingerprints mean identical matching.
    pub fn fingerprint(&self) -> String {
        format!("{}{}", self.source, self.flags)
    }
}

/// Check whether `pattern` compiles as a regular expression
pub fn is_valid_regex(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}
