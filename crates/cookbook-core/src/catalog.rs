//! The loaded dataset: canonical records, groups and vocabularies, built
//! once and shared read-only.

use std::sync::Arc;

use ahash::AHashMap;
use cookbook_common::RecipeId;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::combinations::{CombinationReport, CombinationValidator};
use crate::images::ImageTable;
use crate::model::{group_recipes, GroupedItem, Ingredient, Recipe};
use crate::normalize::{normalize_ingredients, normalize_recipes};
use crate::query::{self, RecipeQuery};
use crate::raw::{ScrapeMetadata, ScrapedIngredientsData, ScrapedRecipesData};
use crate::vocabulary::{build_effect_vocabulary, build_ingredient_vocabulary, Vocabulary};

/// Catalog statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Number of recipe variations.
    pub recipes: usize,
    /// Number of grouped items.
    pub groups: usize,
    /// Number of ingredients.
    pub ingredients: usize,
    /// Number of distinct ingredient names used by recipes.
    pub ingredient_terms: usize,
    /// Number of distinct effect names.
    pub effect_terms: usize,
    /// Number of categories.
    pub categories: usize,
}

/// Normalized recipes and ingredients with derived indexes.
#[derive(Debug)]
pub struct Catalog {
    metadata: Option<ScrapeMetadata>,
    recipes: Vec<Recipe>,
    recipe_index: AHashMap<RecipeId, usize>,
    ingredients: IndexMap<String, Ingredient>,
    groups: Arc<[GroupedItem]>,
    group_index: AHashMap<String, usize>,
    ingredient_vocabulary: Arc<Vocabulary>,
    effect_vocabulary: Vocabulary,
    categories: Vec<String>,
    validator: CombinationValidator,
}

impl Catalog {
    /// Normalizes both documents and builds every index.
    #[must_use]
    pub fn from_raw(
        recipes: &ScrapedRecipesData,
        ingredients: &ScrapedIngredientsData,
        images: &ImageTable,
    ) -> Self {
        let mut catalog = Self::from_recipes(
            normalize_recipes(recipes, images),
            normalize_ingredients(ingredients, images),
        );
        catalog.metadata = recipes.metadata.clone();
        catalog
    }

    /// Builds the indexes over already-normalized records.
    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>, ingredients: IndexMap<String, Ingredient>) -> Self {
        let groups: Arc<[GroupedItem]> = group_recipes(&recipes).into();
        let ingredient_vocabulary = Arc::new(build_ingredient_vocabulary(&groups));
        let effect_vocabulary = build_effect_vocabulary(&groups);

        let recipe_index = recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let group_index = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name().to_string(), i))
            .collect();
        let categories: IndexSet<&str> = recipes.iter().map(|r| r.category.as_str()).collect();
        let categories = categories.into_iter().map(str::to_string).collect();

        let validator = CombinationValidator::new(Arc::clone(&groups), Arc::clone(&ingredient_vocabulary));

        let catalog = Self {
            metadata: None,
            recipes,
            recipe_index,
            ingredients,
            groups,
            group_index,
            ingredient_vocabulary,
            effect_vocabulary,
            categories,
            validator,
        };
        debug!("Built catalog: {:?}", catalog.stats());
        catalog
    }

    /// Returns the recipes document metadata, when present.
    #[must_use]
    pub fn metadata(&self) -> Option<&ScrapeMetadata> {
        self.metadata.as_ref()
    }

    /// Returns every variation in scrape order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Looks up a variation by id.
    #[must_use]
    pub fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipe_index.get(id).map(|&i| &self.recipes[i])
    }

    /// Returns the ingredients keyed by document key.
    #[must_use]
    pub fn ingredients(&self) -> &IndexMap<String, Ingredient> {
        &self.ingredients
    }

    /// Looks up an ingredient by key.
    #[must_use]
    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.get(name)
    }

    /// Returns the grouped items in first-encountered order.
    #[must_use]
    pub fn groups(&self) -> &[GroupedItem] {
        &self.groups
    }

    /// Looks up a grouped item by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupedItem> {
        self.group_index.get(name).map(|&i| &self.groups[i])
    }

    /// Returns the ingredient vocabulary.
    #[must_use]
    pub fn ingredient_vocabulary(&self) -> &Vocabulary {
        &self.ingredient_vocabulary
    }

    /// Returns the effect vocabulary.
    #[must_use]
    pub fn effect_vocabulary(&self) -> &Vocabulary {
        &self.effect_vocabulary
    }

    /// Returns the distinct category keys in scrape order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns every variation that requires `ingredient`.
    #[must_use]
    pub fn recipes_using(&self, ingredient: &str) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.uses(ingredient)).collect()
    }

    /// Returns the recipe that crafts `ingredient`, if recorded.
    #[must_use]
    pub fn crafted_by(&self, ingredient: &str) -> Option<&Recipe> {
        self.ingredient(ingredient)?
            .recipe_id
            .as_ref()
            .and_then(|id| self.recipe(id))
    }

    /// Runs a query over the grouped items.
    #[must_use]
    pub fn query(&self, query: &RecipeQuery) -> Vec<&GroupedItem> {
        query::query(&self.groups, query)
    }

    /// Returns the (memoized) combination report for an active filter set.
    #[must_use]
    pub fn combinations(&self, active: &[String]) -> Arc<CombinationReport> {
        self.validator.report(active)
    }

    /// Returns counts of every record kind.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            recipes: self.recipes.len(),
            groups: self.groups.len(),
            ingredients: self.ingredients.len(),
            ingredient_terms: self.ingredient_vocabulary.len(),
            effect_terms: self.effect_vocabulary.len(),
            categories: self.categories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        let recipes: ScrapedRecipesData = serde_json::from_value(json!({
            "metadata": {"name": "Sulfur recipes", "totalRecipes": 3},
            "recipes": {
                "cooked_consumables": [
                    {
                        "name": "Broth",
                        "healing": {"amount": 20, "duration": 10},
                        "effects": [{"type": "Warmth", "value": "+5", "duration": "10s"}],
                        "recipes": [
                            {"ingredients": [{"item": "Water", "quantity": 2}, {"item": "Bone", "quantity": 1}]},
                            {"ingredients": [{"item": "Water", "quantity": 1}, {"item": "Salt", "quantity": "1"}]}
                        ]
                    },
                    {
                        "name": "Ramen",
                        "healing": {"health": 50},
                        "recipes": [{"ingredients": [{"item": "Broth", "quantity": 1}, {"item": "Noodles", "quantity": 1}]}]
                    }
                ],
                "cooked_throwables": [
                    {"name": "Stick Grenade", "damage": "≥600", "effects": ["Explosion"]}
                ]
            }
        }))
        .expect("recipes");

        let ingredients: ScrapedIngredientsData = serde_json::from_value(json!({
            "ingredients": {
                "Broth": {"name": "Broth", "recipeId": "broth-v0"},
                "Water": {"name": "Water"},
                "Salt": {"recipeId": "missing-v0"}
            }
        }))
        .expect("ingredients");

        Catalog::from_raw(&recipes, &ingredients, &ImageTable::new("https://img.test"))
    }

    #[test]
    fn test_from_raw_builds_indexes() {
        let catalog = catalog();
        let stats = catalog.stats();
        assert_eq!(stats.recipes, 4);
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.ingredients, 3);
        assert_eq!(stats.effect_terms, 2);
        assert_eq!(catalog.categories(), &["cooked_consumables", "cooked_throwables"]);
        assert_eq!(catalog.metadata().and_then(|m| m.total), Some(3));

        let broth = catalog.group("Broth").expect("broth");
        assert_eq!(broth.total_variations(), 2);
        assert_eq!(catalog.ingredient_vocabulary().count("Water"), 1);

        let grenade = catalog.group("Stick Grenade").expect("grenade").primary_recipe();
        assert_eq!(grenade.damage, Some(600.0));
        assert_eq!(grenade.id.as_str(), "stick-grenade");
    }

    #[test]
    fn test_cross_references() {
        let catalog = catalog();
        let users: Vec<&str> = catalog.recipes_using("Water").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(users, vec!["broth-v0", "broth-v1"]);

        assert_eq!(
            catalog.crafted_by("Broth").map(|r| r.id.as_str()),
            Some("broth-v0")
        );
        assert!(catalog.crafted_by("Salt").is_none());
        assert!(catalog.crafted_by("Water").is_none());
        assert_eq!(catalog.ingredient("Salt").map(|i| i.name.as_str()), Some("Salt"));
    }

    #[test]
    fn test_query_and_combinations() {
        let catalog = catalog();
        let results = catalog.query(&RecipeQuery::new().with_ingredient("Salt"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), "Broth");

        let report = catalog.combinations(&["Salt".to_string()]);
        assert!(report.is_valid("Bone"));
        assert!(!report.is_valid("Noodles"));
        let again = catalog.combinations(&["Salt".to_string()]);
        assert!(Arc::ptr_eq(&report, &again));
    }

    #[test]
    fn test_empty_documents() {
        let catalog = Catalog::from_raw(
            &ScrapedRecipesData::default(),
            &ScrapedIngredientsData::default(),
            &ImageTable::default(),
        );
        assert!(catalog.groups().is_empty());
        assert!(catalog.query(&RecipeQuery::new()).is_empty());
        assert_eq!(catalog.combinations(&[]).compatible_count(), 0);
    }
}
