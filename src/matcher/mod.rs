//! Relevance scoring of labels against a query.
//!
//! Callers register labels once and get back a [`MatcheeKey`]; a `search` then
//! rescores every registered label and `score` reads the result. A score of
//! zero or less means "hidden".

mod nucleo_oracle;

pub use nucleo_oracle::NucleoOracle;

/// Handle of a label registered with an oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatcheeKey(pub usize);

/// What a search should compute besides scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Scores only
    #[default]
    Score,
    /// Scores plus the matched character positions, for highlighting
    Span,
}

pub trait ScoreOracle {
    fn register(&mut self, label: &str) -> MatcheeKey;

    /// Rescore every registered label against `query`
    fn search(&mut self, query: &str, mode: MatchMode);

    fn score(&self, key: MatcheeKey) -> i64;

    /// Matched character positions from the last [`MatchMode::Span`] search
    fn indices(&self, key: MatcheeKey) -> &[u32];
}

/// An item bound to its oracle registration
#[derive(Debug, Clone)]
pub struct Matchee<E> {
    pub item: E,
    pub key: MatcheeKey,
}

/// Register every item's label with `oracle`
pub fn create_passive_matchee_list<E>(
    items: Vec<E>,
    oracle: &mut dyn ScoreOracle,
    label: impl Fn(&E) -> String,
) -> Vec<Matchee<E>> {
    items
        .into_iter()
        .map(|item| {
            let key = oracle.register(&label(&item));
            Matchee { item, key }
        })
        .collect()
}
