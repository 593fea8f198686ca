use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};

use super::{MatchMode, MatcheeKey, ScoreOracle};

/// Score given to every label when the query is blank
const BLANK_QUERY_SCORE: i64 = 1;

struct Registered {
    label: String,
    score: i64,
    indices: Vec<u32>,
}

/// [`ScoreOracle`] backed by the `nucleo` fuzzy matcher
pub struct NucleoOracle {
    matcher: Matcher,
    items: Vec<Registered>,
    query: String,
}

impl NucleoOracle {
    pub fn new() -> Self {
        Self { matcher: Matcher::new(Config::DEFAULT), items: Vec::new(), query: String::new() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NucleoOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreOracle for NucleoOracle {
    fn register(&mut self, label: &str) -> MatcheeKey {
        self.items.push(Registered {
            label: label.to_string(),
            score: BLANK_QUERY_SCORE,
            indices: Vec::new(),
        });
        MatcheeKey(self.items.len() - 1)
    }

    fn search(&mut self, query: &str, mode: MatchMode) {
        self.query = query.to_string();
        if query.trim().is_empty() {
            for item in &mut self.items {
                item.score = BLANK_QUERY_SCORE;
                item.indices.clear();
            }
            return;
        }

        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
        let mut buf = Vec::new();
        for item in &mut self.items {
            let haystack = Utf32Str::new(&item.label, &mut buf);
            item.indices.clear();
            let score = match mode {
                MatchMode::Score => pattern.score(haystack, &mut self.matcher),
                MatchMode::Span => {
                    let score = pattern.indices(haystack, &mut self.matcher, &mut item.indices);
                    item.indices.sort_unstable();
                    item.indices.dedup();
                    score
                }
            };
            item.score = score.map(i64::from).unwrap_or(0);
        }
    }

    fn score(&self, key: MatcheeKey) -> i64 {
        self.items.get(key.0).map(|item| item.score).unwrap_or(0)
    }

    fn indices(&self, key: MatcheeKey) -> &[u32] {
        self.items.get(key.0).map(|item| item.indices.as_slice()).unwrap_or(&[])
    }
}
