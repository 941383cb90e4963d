//! Immutable browser state driven by discrete UI events.
//!
//! Every [`BrowserState::apply`] returns a successor with a higher
//! generation. Results computed from a state can be tagged with its
//! generation and handed to [`LatestResult`], which drops stale ones.

use indexmap::IndexSet;
use serde::Serialize;

use crate::query::{EffectScope, RecipeQuery, SortField, SortSpec};

/// A discrete UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Search text changed.
    Search(String),
    /// Category filter button clicked.
    ToggleCategory(String),
    /// Type badge clicked; only ever adds the category.
    AddCategory(String),
    /// Ingredient filter toggled.
    ToggleIngredient(String),
    /// Ingredient filters cleared.
    ClearIngredients,
    /// Effect filter toggled.
    ToggleEffect(String),
    /// Effect filters cleared.
    ClearEffects,
    /// Column header clicked.
    SortBy(SortField),
    /// Page requested; clamped when the view is built.
    GoToPage(usize),
    /// Row expanded or collapsed.
    ToggleExpanded(String),
    /// Ingredient quick-filter search changed.
    IngredientSearch(String),
    /// Effect quick-filter search changed.
    EffectSearch(String),
    /// Show every ingredient quick filter.
    ShowAllIngredients(bool),
    /// Show every effect quick filter.
    ShowAllEffects(bool),
}

/// Snapshot of everything the browser lets the user change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserState {
    generation: u64,
    search: String,
    categories: Vec<String>,
    ingredient_filters: Vec<String>,
    effect_filters: Vec<String>,
    sort: SortSpec,
    page: usize,
    expanded: IndexSet<String>,
    ingredient_search: String,
    effect_search: String,
    show_all_ingredients: bool,
    show_all_effects: bool,
    effect_scope: EffectScope,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            generation: 0,
            search: String::new(),
            categories: Vec::new(),
            ingredient_filters: Vec::new(),
            effect_filters: Vec::new(),
            sort: SortSpec::default(),
            page: 1,
            expanded: IndexSet::new(),
            ingredient_search: String::new(),
            effect_search: String::new(),
            show_all_ingredients: false,
            show_all_effects: false,
            effect_scope: EffectScope::default(),
        }
    }
}

/// Removes `item` when present, appends it otherwise.
fn toggled(items: &[String], item: &str) -> Vec<String> {
    if items.iter().any(|i| i == item) {
        items.iter().filter(|i| *i != item).cloned().collect()
    } else {
        let mut next = items.to_vec();
        next.push(item.to_string());
        next
    }
}

impl BrowserState {
    /// Creates the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the effect filter scope.
    #[must_use]
    pub fn with_effect_scope(mut self, scope: EffectScope) -> Self {
        self.effect_scope = scope;
        self
    }

    /// Sets the sort state.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the successor state after `event`.
    #[must_use]
    pub fn apply(&self, event: BrowserEvent) -> Self {
        let mut next = self.clone();
        next.generation = self.generation + 1;

        match event {
            BrowserEvent::Search(text) => {
                next.search = text;
                next.page = 1;
            },
            BrowserEvent::ToggleCategory(key) => {
                next.categories = toggled(&self.categories, &key);
                next.page = 1;
            },
            BrowserEvent::AddCategory(key) => {
                if !self.categories.contains(&key) {
                    next.categories.push(key);
                    next.page = 1;
                }
            },
            BrowserEvent::ToggleIngredient(name) => {
                next.ingredient_filters = toggled(&self.ingredient_filters, &name);
                next.page = 1;
            },
            BrowserEvent::ClearIngredients => {
                next.ingredient_filters.clear();
                next.page = 1;
            },
            BrowserEvent::ToggleEffect(name) => {
                next.effect_filters = toggled(&self.effect_filters, &name);
                next.page = 1;
            },
            BrowserEvent::ClearEffects => {
                next.effect_filters.clear();
                next.page = 1;
            },
            BrowserEvent::SortBy(field) => next.sort = self.sort.clicked(field),
            BrowserEvent::GoToPage(page) => next.page = page,
            BrowserEvent::ToggleExpanded(name) => {
                if !next.expanded.shift_remove(&name) {
                    next.expanded.insert(name);
                }
            },
            BrowserEvent::IngredientSearch(text) => next.ingredient_search = text,
            BrowserEvent::EffectSearch(text) => next.effect_search = text,
            BrowserEvent::ShowAllIngredients(show) => next.show_all_ingredients = show,
            BrowserEvent::ShowAllEffects(show) => next.show_all_effects = show,
        }

        next
    }

    /// Applies a sequence of events in order.
    #[must_use]
    pub fn apply_all<I: IntoIterator<Item = BrowserEvent>>(&self, events: I) -> Self {
        events
            .into_iter()
            .fold(self.clone(), |state, event| state.apply(event))
    }

    /// Returns the query this state describes.
    #[must_use]
    pub fn to_query(&self) -> RecipeQuery {
        RecipeQuery {
            search: self.search.clone(),
            categories: self.categories.clone(),
            ingredients: self.ingredient_filters.clone(),
            effects: self.effect_filters.clone(),
            sort: self.sort,
            effect_scope: self.effect_scope,
        }
    }

    /// Returns the generation counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the active category keys.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns the active ingredient filters in toggle order.
    #[must_use]
    pub fn ingredient_filters(&self) -> &[String] {
        &self.ingredient_filters
    }

    /// Returns the active effect filters in toggle order.
    #[must_use]
    pub fn effect_filters(&self) -> &[String] {
        &self.effect_filters
    }

    /// Returns the sort state.
    #[must_use]
    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Returns the requested page (unclamped).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns whether a row is expanded.
    #[must_use]
    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Returns the ingredient quick-filter search text.
    #[must_use]
    pub fn ingredient_search(&self) -> &str {
        &self.ingredient_search
    }

    /// Returns the effect quick-filter search text.
    #[must_use]
    pub fn effect_search(&self) -> &str {
        &self.effect_search
    }

    /// Returns whether every ingredient quick filter is shown.
    #[must_use]
    pub fn show_all_ingredients(&self) -> bool {
        self.show_all_ingredients
    }

    /// Returns whether every effect quick filter is shown.
    #[must_use]
    pub fn show_all_effects(&self) -> bool {
        self.show_all_effects
    }

    /// Returns the effect filter scope.
    #[must_use]
    pub fn effect_scope(&self) -> EffectScope {
        self.effect_scope
    }
}

/// Holds the newest result seen so far.
#[derive(Debug, Clone)]
pub struct LatestResult<T> {
    generation: Option<u64>,
    value: Option<T>,
}

impl<T> Default for LatestResult<T> {
    fn default() -> Self {
        Self {
            generation: None,
            value: None,
        }
    }
}

impl<T> LatestResult<T> {
    /// Creates an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` unless a newer generation is already held.
    ///
    /// Returns whether the value was accepted.
    pub fn offer(&mut self, generation: u64, value: T) -> bool {
        if self.generation.is_some_and(|held| generation < held) {
            return false;
        }
        self.generation = Some(generation);
        self.value = Some(value);
        true
    }

    /// Returns the held value.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the generation of the held value.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{HealthSortMode, SortDirection};

    #[test]
    fn test_generation_increments() {
        let state = BrowserState::new();
        let next = state.apply(BrowserEvent::Search("milk".into()));
        assert_eq!(state.generation(), 0);
        assert_eq!(next.generation(), 1);
        assert_eq!(state.search(), "");
        assert_eq!(next.search(), "milk");
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let state = BrowserState::new().apply(BrowserEvent::GoToPage(3));
        assert_eq!(state.page(), 3);

        for event in [
            BrowserEvent::Search("x".into()),
            BrowserEvent::ToggleCategory("cooked_throwables".into()),
            BrowserEvent::ToggleIngredient("Flour".into()),
            BrowserEvent::ClearIngredients,
            BrowserEvent::ToggleEffect("Speed".into()),
            BrowserEvent::ClearEffects,
        ] {
            assert_eq!(state.apply(event).page(), 1);
        }

        assert_eq!(state.apply(BrowserEvent::SortBy(SortField::Type)).page(), 3);
        assert_eq!(state.apply(BrowserEvent::IngredientSearch("mi".into())).page(), 3);
    }

    #[test]
    fn test_toggles() {
        let state = BrowserState::new().apply_all([
            BrowserEvent::ToggleIngredient("Flour".into()),
            BrowserEvent::ToggleIngredient("Milk".into()),
            BrowserEvent::ToggleIngredient("Flour".into()),
            BrowserEvent::ToggleExpanded("Broth".into()),
        ]);
        assert_eq!(state.ingredient_filters(), &["Milk".to_string()]);
        assert!(state.is_expanded("Broth"));
        assert_eq!(state.generation(), 4);

        let state = state.apply(BrowserEvent::ToggleExpanded("Broth".into()));
        assert!(!state.is_expanded("Broth"));
    }

    #[test]
    fn test_add_category_never_removes() {
        let state = BrowserState::new()
            .apply(BrowserEvent::AddCategory("cooked_equipment".into()))
            .apply(BrowserEvent::GoToPage(2))
            .apply(BrowserEvent::AddCategory("cooked_equipment".into()));
        assert_eq!(state.categories(), &["cooked_equipment".to_string()]);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_sort_events() {
        let state = BrowserState::new().apply_all([
            BrowserEvent::SortBy(SortField::Name),
            BrowserEvent::SortBy(SortField::Health),
        ]);
        let sort = state.sort();
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(sort.field, SortField::Health);
        assert_eq!(sort.health_mode, HealthSortMode::HpAsc);
        assert_eq!(state.to_query().sort, sort);
    }

    #[test]
    fn test_latest_result_rejects_stale() {
        let mut latest = LatestResult::new();
        assert!(latest.offer(2, "second"));
        assert!(!latest.offer(1, "first"));
        assert_eq!(latest.get(), Some(&"second"));
        assert!(latest.offer(2, "second again"));
        assert!(latest.offer(5, "fifth"));
        assert_eq!(latest.generation(), Some(5));
    }
}
