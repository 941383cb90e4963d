//! Query engine: search, category, ingredient and effect filters, sorting
//! and pagination over grouped items.
//!
//! Filters combine conjunctively. The ingredient filter accepts a group when
//! any variation contains each ingredient; the effect filter looks at the
//! primary recipe only unless [`EffectScope::AnyVariation`] is requested.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{GroupedItem, Recipe};

/// Default number of groups per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// Sort state
// ============================================================================

/// Which variations the effect filter inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectScope {
    /// Only the primary recipe.
    #[default]
    #[serde(rename = "primary", alias = "primary_recipe")]
    PrimaryRecipe,
    /// Any variation of the group.
    AnyVariation,
}

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Group name.
    #[default]
    Name,
    /// Category key.
    Type,
    /// HP/DMG compound column.
    Health,
    /// Duration.
    Duration,
    /// Ingredient count.
    Difficulty,
    /// Health per second.
    Hps,
}

/// Sort direction for plain columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Mode of the HP/DMG column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthSortMode {
    /// Healing first, highest first.
    #[default]
    HpDesc,
    /// Healing first, lowest first.
    HpAsc,
    /// Damage first, highest first.
    DmgDesc,
    /// Damage first, lowest first.
    DmgAsc,
}

impl HealthSortMode {
    /// Cycle order of the column header.
    pub const CYCLE: [Self; 4] = [Self::HpDesc, Self::HpAsc, Self::DmgDesc, Self::DmgAsc];

    /// Returns the next mode in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::HpDesc => Self::HpAsc,
            Self::HpAsc => Self::DmgDesc,
            Self::DmgDesc => Self::DmgAsc,
            Self::DmgAsc => Self::HpDesc,
        }
    }

    /// Returns true for ascending modes.
    #[must_use]
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::HpAsc | Self::DmgAsc)
    }

    /// Returns true when damage-type items come first.
    #[must_use]
    pub fn damage_first(self) -> bool {
        matches!(self, Self::DmgDesc | Self::DmgAsc)
    }
}

/// Sort column, direction and HP/DMG mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Active column.
    pub field: SortField,
    /// Direction for plain columns.
    pub direction: SortDirection,
    /// Mode of the HP/DMG column.
    pub health_mode: HealthSortMode,
}

impl SortSpec {
    /// Creates a spec sorting by `field` in `direction`.
    #[must_use]
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field,
            direction,
            health_mode: HealthSortMode::default(),
        }
    }

    /// Sets the HP/DMG mode.
    #[must_use]
    pub fn with_health_mode(mut self, mode: HealthSortMode) -> Self {
        self.health_mode = mode;
        self
    }

    /// Successor state after clicking a column header.
    ///
    /// The health column advances its mode; the active column flips its
    /// direction; any other column becomes active ascending.
    #[must_use]
    pub fn clicked(self, field: SortField) -> Self {
        if field == SortField::Health {
            return Self {
                field,
                health_mode: self.health_mode.next(),
                ..self
            };
        }

        if self.field == field {
            Self {
                direction: self.direction.flipped(),
                ..self
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
                ..self
            }
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// A compound query over grouped items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeQuery {
    /// Free-text search; empty matches everything.
    pub search: String,
    /// Category keys, OR'd; empty matches everything.
    pub categories: Vec<String>,
    /// Ingredient names, AND'd.
    pub ingredients: Vec<String>,
    /// Effect names, AND'd.
    pub effects: Vec<String>,
    /// Sort order.
    pub sort: SortSpec,
    /// Variations inspected by the effect filter.
    pub effect_scope: EffectScope,
}

impl RecipeQuery {
    /// Creates a query matching everything, sorted by name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Adds a category key.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Adds an ingredient filter.
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Adds an effect filter.
    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the effect filter scope.
    #[must_use]
    pub fn with_effect_scope(mut self, scope: EffectScope) -> Self {
        self.effect_scope = scope;
        self
    }

    /// Returns whether a group passes every filter.
    #[must_use]
    pub fn matches(&self, group: &GroupedItem) -> bool {
        matches_search(group, &self.search)
            && matches_categories(group, &self.categories)
            && matches_ingredients(group, &self.ingredients)
            && matches_effects(group, &self.effects, self.effect_scope)
    }
}

/// Filters and sorts groups.
#[must_use]
pub fn query<'a>(groups: &'a [GroupedItem], query: &RecipeQuery) -> Vec<&'a GroupedItem> {
    let mut results: Vec<&GroupedItem> = groups.iter().filter(|g| query.matches(g)).collect();
    results.sort_by(|a, b| compare_groups(a, b, &query.sort));
    results
}

/// Case-insensitive substring search over name, description, ingredients
/// and effects.
///
/// Description and effects come from the primary recipe; ingredients come
/// from every variation.
#[must_use]
pub fn matches_search(group: &GroupedItem, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);
    let primary = group.primary_recipe();

    hit(group.name())
        || hit(&primary.description)
        || primary.special_effects.iter().any(|e| hit(&e.effect))
        || group
            .recipes()
            .iter()
            .any(|r| r.ingredients.keys().any(|i| hit(i)))
}

/// The primary recipe's category must be one of `categories`.
#[must_use]
pub fn matches_categories(group: &GroupedItem, categories: &[String]) -> bool {
    categories.is_empty() || categories.contains(&group.primary_recipe().category)
}

/// Every ingredient must appear in at least one variation.
#[must_use]
pub fn matches_ingredients(group: &GroupedItem, ingredients: &[String]) -> bool {
    ingredients.iter().all(|i| group.contains_ingredient(i))
}

/// Every effect must appear in the scoped variations.
#[must_use]
pub fn matches_effects(group: &GroupedItem, effects: &[String], scope: EffectScope) -> bool {
    match scope {
        EffectScope::PrimaryRecipe => {
            let primary = group.primary_recipe();
            effects.iter().all(|e| primary.has_effect(e))
        },
        EffectScope::AnyVariation => effects.iter().all(|e| group.contains_effect(e)),
    }
}

// ============================================================================
// Comparators
// ============================================================================

/// Orders two groups by their primary recipes.
#[must_use]
pub fn compare_groups(a: &GroupedItem, b: &GroupedItem, sort: &SortSpec) -> Ordering {
    let (ra, rb) = (a.primary_recipe(), b.primary_recipe());
    match sort.field {
        SortField::Name => sort.direction.apply(compare_text(a.name(), b.name())),
        SortField::Type => sort.direction.apply(compare_text(&ra.category, &rb.category)),
        SortField::Health => compare_potency(ra, rb, sort.health_mode),
        SortField::Duration => sort.direction.apply(compare_numbers(ra.duration, rb.duration)),
        SortField::Difficulty => sort.direction.apply(ra.difficulty().cmp(&rb.difficulty())),
        SortField::Hps => compare_hps(ra, rb, sort.direction),
    }
}

/// Case-insensitive text order; on a case-only tie lowercase sorts first.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Puts `first` before `second` regardless of direction.
fn partition(a_first: bool, b_first: bool) -> Option<Ordering> {
    match (a_first, b_first) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}

/// HP/DMG ordering: the mode's primary type always comes first; within a
/// type, items are ordered by their own value in the mode's direction.
fn compare_potency(a: &Recipe, b: &Recipe, mode: HealthSortMode) -> Ordering {
    let first = |r: &Recipe| r.is_damage() == mode.damage_first();
    if let Some(ordering) = partition(first(a), first(b)) {
        return ordering;
    }

    let ordering = compare_numbers(
        a.effective_value().unwrap_or(0.0),
        b.effective_value().unwrap_or(0.0),
    );
    if mode.is_ascending() {
        ordering
    } else {
        ordering.reverse()
    }
}

/// HP/s ordering: healing items always precede damage items; damage items
/// are ordered by damage among themselves.
fn compare_hps(a: &Recipe, b: &Recipe, direction: SortDirection) -> Ordering {
    if let Some(ordering) = partition(!a.is_damage(), !b.is_damage()) {
        return ordering;
    }

    let value = |r: &Recipe| {
        r.health_per_second()
            .unwrap_or_else(|| r.damage.unwrap_or(0.0))
    };
    direction.apply(compare_numbers(value(a), value(b)))
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// One-based page number after clamping.
    pub page: usize,
    /// Number of pages (`0` for no results).
    pub total_pages: usize,
    /// Number of results across all pages.
    pub total_items: usize,
    /// Page size used.
    pub page_size: usize,
}

impl<T> Page<'_, T> {
    /// Returns true when there is a page after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns true when there is a page before this one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages for `total` items; a zero page size counts as one.
#[must_use]
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Clamps a requested page into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size).max(1))
}

/// Slices out one page, clamping the requested page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page = clamp_page(page, items.len(), page_size);
    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages: total_pages(items.len(), page_size),
        total_items: items.len(),
        page_size,
    }
}
