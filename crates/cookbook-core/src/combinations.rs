//! Combination validator: which ingredient filters remain selectable and how
//! many grouped items each toggle would leave.
//!
//! A group counts toward a candidate when it matches the ingredient filter
//! set obtained by toggling that candidate: `active ∪ {c}` for an inactive
//! candidate, `active \ {c}` for an active one.

use std::sync::Arc;

use ahash::AHashSet;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::model::GroupedItem;
use crate::query::matches_ingredients;
use crate::vocabulary::Vocabulary;

/// Validity and projected counts for one active filter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationReport {
    active: Vec<String>,
    valid: Vec<String>,
    #[serde(skip)]
    valid_set: AHashSet<String>,
    projected: IndexMap<String, usize>,
}

impl CombinationReport {
    /// Computes the report for `active` over every vocabulary term.
    #[must_use]
    pub fn compute(groups: &[GroupedItem], vocabulary: &Vocabulary, active: &[String]) -> Self {
        let valid = valid_options(groups, vocabulary, active);
        let valid_set = valid.iter().cloned().collect();
        let projected = vocabulary
            .names()
            .map(|name| (name.to_string(), projected_count(groups, active, name)))
            .collect();

        Self {
            active: active.to_vec(),
            valid,
            valid_set,
            projected,
        }
    }

    /// Returns the active filters the report was computed for.
    #[must_use]
    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// Returns the selectable ingredients in vocabulary order.
    #[must_use]
    pub fn valid_options(&self) -> &[String] {
        &self.valid
    }

    /// Returns whether an ingredient is selectable.
    #[must_use]
    pub fn is_valid(&self, ingredient: &str) -> bool {
        self.valid_set.contains(ingredient)
    }

    /// Returns how many groups would match after toggling `ingredient`.
    ///
    /// Unknown ingredients report `0`.
    #[must_use]
    pub fn projected_count(&self, ingredient: &str) -> usize {
        self.projected.get(ingredient).copied().unwrap_or(0)
    }

    /// Returns the number of selectable ingredients.
    #[must_use]
    pub fn compatible_count(&self) -> usize {
        self.valid.len()
    }
}

/// Ingredients that can still be combined with `active`, in vocabulary
/// order.
///
/// With no active filters every known ingredient is valid; otherwise an
/// ingredient is valid when some single recipe variation contains it
/// together with every active filter.
#[must_use]
pub fn valid_options(groups: &[GroupedItem], vocabulary: &Vocabulary, active: &[String]) -> Vec<String> {
    if active.is_empty() {
        return vocabulary.names().map(str::to_string).collect();
    }

    let reachable: AHashSet<&str> = groups
        .iter()
        .flat_map(GroupedItem::recipes)
        .filter(|r| active.iter().all(|a| r.uses(a)))
        .flat_map(|r| r.ingredients.keys().map(String::as_str))
        .collect();

    vocabulary
        .names()
        .filter(|name| reachable.contains(name))
        .map(str::to_string)
        .collect()
}

/// Number of groups matching the filter set after toggling `candidate`.
#[must_use]
pub fn projected_count(groups: &[GroupedItem], active: &[String], candidate: &str) -> usize {
    let toggled: Vec<String> = if active.iter().any(|a| a == candidate) {
        active.iter().filter(|a| *a != candidate).cloned().collect()
    } else {
        active
            .iter()
            .cloned()
            .chain(std::iter::once(candidate.to_string()))
            .collect()
    };

    groups
        .iter()
        .filter(|g| matches_ingredients(g, &toggled))
        .count()
}

/// Default number of memoized reports.
pub const DEFAULT_MAX_CACHED_REPORTS: usize = 64;

/// Memoizing front for [`CombinationReport::compute`].
///
/// Reports are keyed by the sorted, de-duplicated active set, so the order
/// filters were toggled in does not matter. The oldest report is evicted
/// once `max_cached` reports are held.
#[derive(Debug)]
pub struct CombinationValidator {
    groups: Arc<[GroupedItem]>,
    vocabulary: Arc<Vocabulary>,
    cache: Mutex<IndexMap<Vec<String>, Arc<CombinationReport>>>,
    max_cached: usize,
}

impl CombinationValidator {
    /// Creates a validator over shared groups and ingredient vocabulary.
    #[must_use]
    pub fn new(groups: Arc<[GroupedItem]>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            groups,
            vocabulary,
            cache: Mutex::new(IndexMap::new()),
            max_cached: DEFAULT_MAX_CACHED_REPORTS,
        }
    }

    /// Sets the maximum number of memoized reports (at least one).
    #[must_use]
    pub fn with_max_cached(mut self, max: usize) -> Self {
        self.max_cached = max.max(1);
        self
    }

    /// Returns the maximum number of memoized reports.
    #[must_use]
    pub fn max_cached(&self) -> usize {
        self.max_cached
    }

    /// Returns the report for an active filter set, computing it on a miss.
    #[must_use]
    pub fn report(&self, active: &[String]) -> Arc<CombinationReport> {
        let mut key = active.to_vec();
        key.sort();
        key.dedup();

        if let Some(report) = self.cache.lock().get(&key) {
            debug!("Combination cache hit for {} filters", key.len());
            return Arc::clone(report);
        }

        let report = Arc::new(CombinationReport::compute(&self.groups, &self.vocabulary, &key));
        let mut cache = self.cache.lock();
        while cache.len() >= self.max_cached {
            cache.shift_remove_index(0);
        }
        cache.insert(key, Arc::clone(&report));
        report
    }

    /// Returns the number of memoized reports.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drops every memoized report.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::recipe;
    use crate::model::group_recipes;
    use crate::vocabulary::build_ingredient_vocabulary;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn setup() -> (Arc<[GroupedItem]>, Arc<Vocabulary>) {
        let groups = group_recipes(&[
            recipe("Broth", 0, &["Water", "Bone"]),
            recipe("Broth", 1, &["Water", "Salt"]),
            recipe("Ramen", 0, &["Broth", "Egg"]),
            recipe("Tea", 0, &["Water", "Leaf"]),
        ]);
        let vocabulary = build_ingredient_vocabulary(&groups);
        (groups.into(), Arc::new(vocabulary))
    }

    #[test]
    fn test_no_filters_all_valid() {
        let (groups, vocab) = setup();
        let report = CombinationReport::compute(&groups, &vocab, &[]);
        assert_eq!(report.compatible_count(), vocab.len());
        assert_eq!(report.projected_count("Water"), 2);
        assert_eq!(report.projected_count("Egg"), 1);
    }

    #[test]
    fn test_valid_options_need_one_recipe() {
        let (groups, vocab) = setup();
        let active = strings(&["Bone"]);
        let report = CombinationReport::compute(&groups, &vocab, &active);

        // Salt only appears in another variation of Broth
        assert!(!report.is_valid("Salt"));
        assert_eq!(valid_options(&groups, &vocab, &active), strings(&["Water", "Bone"]));
        assert!(report.is_valid("Water"));
        assert!(report.is_valid("Bone"));
        assert!(!report.is_valid("Egg"));
        assert!(!report.is_valid("Leaf"));

        assert_eq!(report.projected_count("Salt"), 1);
        assert_eq!(report.projected_count("Egg"), 0);
    }

    #[test]
    fn test_remove_count_drops_candidate() {
        let (groups, _) = setup();
        let active = strings(&["Water", "Leaf"]);
        assert_eq!(projected_count(&groups, &active, "Leaf"), 2);
        assert_eq!(projected_count(&groups, &active, "Water"), 1);
        assert_eq!(projected_count(&groups, &active, "Egg"), 0);
    }

    #[test]
    fn test_validator_memoizes_by_sorted_set() {
        let (groups, vocab) = setup();
        let validator = CombinationValidator::new(Arc::clone(&groups), Arc::clone(&vocab));

        let first = validator.report(&strings(&["Water", "Bone"]));
        let second = validator.report(&strings(&["Bone", "Water", "Bone"]));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(validator.cached_len(), 1);

        let fresh = CombinationReport::compute(&groups, &vocab, &strings(&["Bone", "Water"]));
        assert_eq!(*first, fresh);

        validator.clear();
        assert_eq!(validator.cached_len(), 0);
    }

    #[test]
    fn test_validator_evicts_oldest() {
        let (groups, vocab) = setup();
        let validator = CombinationValidator::new(groups, vocab).with_max_cached(2);
        assert_eq!(validator.max_cached(), 2);

        let water = validator.report(&strings(&["Water"]));
        let _bone = validator.report(&strings(&["Bone"]));
        let _salt = validator.report(&strings(&["Salt"]));
        assert_eq!(validator.cached_len(), 2);

        // Water was evicted and is recomputed
        let again = validator.report(&strings(&["Water"]));
        assert!(!Arc::ptr_eq(&water, &again));
        assert_eq!(*water, *again);
        assert_eq!(validator.cached_len(), 2);

        let zero = CombinationValidator::new(Arc::clone(&validator.groups), Arc::clone(&validator.vocabulary))
            .with_max_cached(0);
        assert_eq!(zero.max_cached(), 1);
    }
}
