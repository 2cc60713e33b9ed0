//! Query classification and ranking over the index.

use super::index::IndexedEntry;
use super::scoring::{Metric, SHAPE_MISMATCH, distance, similarity};
use crate::signature::{Type, normalize, parse};
use serde::Serialize;

/// A classified user query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Substring search over entry names and rendered signatures.
    Name(String),
    /// Structural search with a normalized type.
    Type(Type),
}

impl Query {
    /// Classify `text`. A bare variable (including anything that fails to parse) is
    /// a name search; every other shape is a type search. Blank input is no query.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(match parse(text) {
            Type::Variable { name } => Self::Name(name),
            tipe => Self::Type(normalize(&tipe)),
        })
    }
}

/// A ranked entry. `score` is `None` for name searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub entry: &'a IndexedEntry,
    pub score: Option<i32>,
}

/// Owned form of [`SearchHit`] for handing results across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub entry: IndexedEntry,
    pub score: Option<i32>,
}

impl From<SearchHit<'_>> for RankedEntry {
    fn from(hit: SearchHit<'_>) -> Self {
        Self {
            entry: hit.entry.clone(),
            score: hit.score,
        }
    }
}

fn name_search<'a>(needle: &str, entries: &'a [IndexedEntry]) -> Vec<SearchHit<'a>> {
    let needle = needle.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.name.name.to_lowercase().contains(&needle)
                || entry.signature().to_lowercase().contains(&needle)
        })
        .map(|entry| SearchHit { entry, score: None })
        .collect()
}

fn type_search<'a>(query: &Type, entries: &'a [IndexedEntry], metric: Metric) -> Vec<SearchHit<'a>> {
    let scored = entries.iter().map(|entry| match metric {
        Metric::Similarity => (entry, similarity(query, &entry.normalized)),
        Metric::Distance => (entry, distance(query, &entry.normalized)),
    });

    let mut hits: Vec<SearchHit<'a>> = match metric {
        Metric::Similarity => scored
            .filter(|(_, score)| *score > 0)
            .map(|(entry, score)| SearchHit {
                entry,
                score: Some(score),
            })
            .collect(),
        Metric::Distance => scored
            .filter(|(_, score)| *score < SHAPE_MISMATCH)
            .map(|(entry, score)| SearchHit {
                entry,
                score: Some(score),
            })
            .collect(),
    };

    // stable: equal scores keep insertion order
    match metric {
        Metric::Similarity => hits.sort_by(|a, b| b.score.cmp(&a.score)),
        Metric::Distance => hits.sort_by(|a, b| a.score.cmp(&b.score)),
    }
    hits
}

/// Rank `entries` against a classified query with the given metric.
pub fn rank_with<'a>(query: &Query, entries: &'a [IndexedEntry], metric: Metric) -> Vec<SearchHit<'a>> {
    match query {
        Query::Name(needle) => name_search(needle, entries),
        Query::Type(tipe) => type_search(tipe, entries, metric),
    }
}

/// Rank `entries` against free-form query text using similarity.
pub fn rank<'a>(query: &str, entries: &'a [IndexedEntry]) -> Vec<SearchHit<'a>> {
    match Query::parse(query) {
        Some(query) => rank_with(&query, entries, Metric::Similarity),
        None => Vec::new(),
    }
}
