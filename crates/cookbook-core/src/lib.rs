//! # Cookbook Core
//!
//! Normalization, indexing and querying of scraped Sulfur crafting recipes.
//!
//! This crate provides:
//! - Lenient readers for the scraped recipe and ingredient documents
//! - A normalizer producing one canonical [`Recipe`] per variation
//! - Frequency-ranked ingredient and effect vocabularies
//! - A query engine with search, conjunctive filters, sorting and pagination
//! - A combination validator for ingredient quick filters
//! - An immutable browser state machine and view model
//!
//! ## Data flow
//!
//! Raw JSON is read into [`ScrapedRecipesData`] / [`ScrapedIngredientsData`],
//! normalized and grouped by name into a [`Catalog`]. Queries and views
//! borrow from the catalog; nothing is mutated after load.
//!
//! ## Failure model
//!
//! Nothing in this crate returns an error. Malformed fields degrade to
//! typed defaults and unknown names resolve to synthesized image URLs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod category;
pub mod coerce;
pub mod combinations;
pub mod display;
pub mod images;
pub mod model;
pub mod normalize;
pub mod query;
pub mod raw;
pub mod state;
pub mod view;
pub mod vocabulary;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::category::*;
    pub use crate::combinations::*;
    pub use crate::display::*;
    pub use crate::images::*;
    pub use crate::model::*;
    pub use crate::normalize::*;
    pub use crate::query::*;
    pub use crate::raw::*;
    pub use crate::state::*;
    pub use crate::view::*;
    pub use crate::vocabulary::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_end_to_end_browse() {
        let recipes: ScrapedRecipesData = serde_json::from_value(json!({
            "recipes": {
                "cooked_consumables": [
                    {"name": "Potato Salad", "healing": {"amount": 30}, "recipes": [
                        {"ingredients": [{"item": "Potato", "quantity": 2}, {"item": "Any Milk", "quantity": 1}]}
                    ]},
                    {"name": "Ramen", "healing": {"amount": 50, "duration": 10}, "recipes": [
                        {"ingredients": [{"item": "Broth", "quantity": 1}]}
                    ]}
                ],
                "cooked_throwables": [
                    {"name": "Stick Grenade", "damage": 100}
                ]
            }
        }))
        .expect("recipes");

        let catalog = Catalog::from_raw(
            &recipes,
            &ScrapedIngredientsData::default(),
            &ImageTable::sulfur_wiki(),
        );

        let state = BrowserState::new().apply_all([
            BrowserEvent::SortBy(SortField::Hps),
            BrowserEvent::SortBy(SortField::Hps),
        ]);
        let view = BrowserView::build(&catalog, &state, &ViewOptions::default());
        let names: Vec<&str> = view.rows.iter().map(|r| r.group.name()).collect();
        assert_eq!(names, vec!["Potato Salad", "Ramen", "Stick Grenade"]);

        let salad = view.rows[0].group.primary_recipe();
        assert_eq!(hps_display(salad), "30.0");
        assert_eq!(health_display(salad), "30 HP");
        assert_eq!(badge_label(&salad.category), "Consumable");
        assert_eq!(
            any_category_hint(&ImageTable::sulfur_wiki(), "Any Milk").as_deref(),
            Some("Can use: Whole Milk, Low Fat Milk, Skimmed Milk")
        );
    }
}
