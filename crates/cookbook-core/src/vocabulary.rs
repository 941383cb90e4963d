//! Index builder: frequency-ranked ingredient and effect vocabularies.
//!
//! Frequencies count distinct grouped items, not variations, so an item
//! with many recorded variations is not over-weighted.

use ahash::AHashMap;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::model::GroupedItem;

/// A vocabulary term and the number of grouped items using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    /// Term.
    pub name: String,
    /// Number of grouped items using the term.
    pub count: usize,
}

/// Terms ordered by descending frequency, ties in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Ranks counts collected in first-encountered order.
    #[must_use]
    pub fn from_counts(counts: IndexMap<String, usize>) -> Self {
        let mut entries: Vec<VocabularyEntry> = counts
            .into_iter()
            .map(|(name, count)| VocabularyEntry { name, count })
            .collect();
        // Stable: ties keep first-encountered order
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();

        Self { entries, index }
    }

    /// Returns all entries in rank order.
    #[must_use]
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Returns the terms in rank order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns the frequency of a term, `0` when unknown.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.get(name).map_or(0, |e| e.count)
    }

    /// Looks up a term.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VocabularyEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Returns the rank of a term.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether the term is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Case-insensitive substring filter keeping rank order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&VocabularyEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The top `limit` entries, or all of them when `show_all` is set.
    #[must_use]
    pub fn popular(&self, limit: usize, show_all: bool) -> Vec<&VocabularyEntry> {
        take_popular(self.entries.iter().collect(), limit, show_all)
    }
}

/// Truncates a ranked list to `limit` unless `show_all` is set.
#[must_use]
pub fn take_popular<T>(mut items: Vec<T>, limit: usize, show_all: bool) -> Vec<T> {
    if !show_all {
        items.truncate(limit);
    }
    items
}

fn count_per_group<'a, F, I>(groups: &'a [GroupedItem], terms_of: F) -> Vocabulary
where
    F: Fn(&'a GroupedItem) -> I,
    I: Iterator<Item = &'a str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for group in groups {
        let distinct: IndexSet<&str> = terms_of(group).collect();
        for term in distinct {
            *counts.entry(term.to_string()).or_insert(0) += 1;
        }
    }
    Vocabulary::from_counts(counts)
}

/// Ranks ingredients by the number of grouped items using them.
#[must_use]
pub fn build_ingredient_vocabulary(groups: &[GroupedItem]) -> Vocabulary {
    count_per_group(groups, |group| {
        group
            .recipes()
            .iter()
            .flat_map(|r| r.ingredients.keys().map(String::as_str))
    })
}

/// Ranks effects by the number of grouped items granting them.
///
/// Effects with an empty name are ignored.
#[must_use]
pub fn build_effect_vocabulary(groups: &[GroupedItem]) -> Vocabulary {
    count_per_group(groups, |group| {
        group
            .recipes()
            .iter()
            .flat_map(|r| r.special_effects.iter().map(|e| e.effect.as_str()))
            .filter(|e| !e.is_empty())
    })
}
