//! Browser view model: everything a presentation layer needs for one frame.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::GroupedItem;
use crate::query::{paginate, DEFAULT_PAGE_SIZE};
use crate::state::BrowserState;
use crate::vocabulary::take_popular;

/// Quick filters shown before "show all".
pub const DEFAULT_POPULAR_LIMIT: usize = 12;

/// Presentation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    /// Groups per page.
    pub page_size: usize,
    /// Quick filters shown when not showing all.
    pub popular_limit: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            popular_limit: DEFAULT_POPULAR_LIMIT,
        }
    }
}

/// A row of the results table.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow<'a> {
    /// The group.
    pub group: &'a GroupedItem,
    /// Whether the row shows every variation.
    pub expanded: bool,
}

/// An ingredient quick-filter button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientOption {
    /// Ingredient name.
    pub name: String,
    /// Grouped items using it.
    pub count: usize,
    /// Whether the filter is active.
    pub active: bool,
    /// Grouped items left after toggling it.
    pub projected_count: usize,
    /// Image URL, when the ingredient is known.
    pub image: Option<String>,
}

/// An effect quick-filter button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectOption {
    /// Effect name.
    pub name: String,
    /// Grouped items granting it.
    pub count: usize,
    /// Whether the filter is active.
    pub active: bool,
}

/// One rendered frame of the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserView<'a> {
    /// Generation of the state the view was built from.
    pub generation: u64,
    /// Rows on the current page.
    pub rows: Vec<GroupRow<'a>>,
    /// Clamped page number.
    pub page: usize,
    /// Number of pages.
    pub total_pages: usize,
    /// Number of matching groups.
    pub total_results: usize,
    /// Ingredient quick filters.
    pub ingredient_options: Vec<IngredientOption>,
    /// Effect quick filters.
    pub effect_options: Vec<EffectOption>,
    /// Ingredients that can still be combined with the active filters.
    pub compatible_ingredients: usize,
}

impl<'a> BrowserView<'a> {
    /// Builds the view for `state`.
    #[must_use]
    pub fn build(catalog: &'a Catalog, state: &BrowserState, options: &ViewOptions) -> Self {
        let results = catalog.query(&state.to_query());
        let page = paginate(&results, state.page(), options.page_size);
        let rows = page
            .items
            .iter()
            .map(|&group| GroupRow {
                group,
                expanded: state.is_expanded(group.name()),
            })
            .collect();

        let report = catalog.combinations(state.ingredient_filters());
        let compatible: Vec<_> = catalog
            .ingredient_vocabulary()
            .search(state.ingredient_search())
            .into_iter()
            .filter(|entry| report.is_valid(&entry.name))
            .collect();
        let compatible_ingredients = compatible.len();

        let ingredient_options = take_popular(
            compatible,
            options.popular_limit,
            state.show_all_ingredients(),
        )
        .into_iter()
        .map(|entry| IngredientOption {
            name: entry.name.clone(),
            count: entry.count,
            active: state.ingredient_filters().contains(&entry.name),
            projected_count: report.projected_count(&entry.name),
            image: catalog.ingredient(&entry.name).map(|i| i.image.clone()),
        })
        .collect();

        let effect_options = take_popular(
            catalog.effect_vocabulary().search(state.effect_search()),
            options.popular_limit,
            state.show_all_effects(),
        )
        .into_iter()
        .map(|entry| EffectOption {
            name: entry.name.clone(),
            count: entry.count,
            active: state.effect_filters().contains(&entry.name),
        })
        .collect();

        Self {
            generation: state.generation(),
            rows,
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_items,
            ingredient_options,
            effect_options,
            compatible_ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{recipe, with_effects};
    use crate::state::BrowserEvent;

    fn catalog() -> Catalog {
        let mut recipes: Vec<_> = (0..23)
            .map(|i| recipe(&format!("Item {i:02}"), 0, &["Water"]))
            .collect();
        recipes.push(with_effects(recipe("Broth", 0, &["Water", "Bone"]), &["Warmth"]));
        recipes.push(recipe("Broth", 1, &["Salt"]));
        recipes.push(recipe("Tea", 0, &["Leaf"]));
        Catalog::from_recipes(recipes, indexmap::IndexMap::new())
    }

    #[test]
    fn test_page_clamped() {
        let catalog = catalog();
        let state = BrowserState::new().apply(BrowserEvent::GoToPage(9999));
        let view = BrowserView::build(&catalog, &state, &ViewOptions::default());
        assert_eq!(view.total_results, 25);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.page, 3);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.generation, 1);
    }

    #[test]
    fn test_ingredient_options_follow_filters() {
        let catalog = catalog();
        let state = BrowserState::new().apply(BrowserEvent::ToggleIngredient("Bone".into()));
        let view = BrowserView::build(&catalog, &state, &ViewOptions::default());

        assert_eq!(view.total_results, 1);
        let names: Vec<&str> = view.ingredient_options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Water", "Bone"]);
        assert_eq!(view.compatible_ingredients, 2);

        let bone = &view.ingredient_options[1];
        assert!(bone.active);
        assert_eq!(bone.projected_count, 25);
        assert_eq!(bone.image, None);
    }

    #[test]
    fn test_popular_limit_and_search() {
        let catalog = catalog();
        let options = ViewOptions {
            page_size: 10,
            popular_limit: 2,
        };
        let state = BrowserState::new();
        let view = BrowserView::build(&catalog, &state, &options);
        assert_eq!(view.ingredient_options.len(), 2);
        assert_eq!(view.compatible_ingredients, 4);

        let state = state
            .apply(BrowserEvent::ShowAllIngredients(true))
            .apply(BrowserEvent::IngredientSearch("LEA".into()));
        let view = BrowserView::build(&catalog, &state, &options);
        assert_eq!(view.ingredient_options.len(), 1);
        assert_eq!(view.ingredient_options[0].name, "Leaf");

        let state = state.apply(BrowserEvent::ToggleEffect("Warmth".into()));
        let view = BrowserView::build(&catalog, &state, &options);
        assert_eq!(view.effect_options.len(), 1);
        assert!(view.effect_options[0].active);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].group.name(), "Broth");
    }
}
