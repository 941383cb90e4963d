//! Canonical recipe and ingredient records.
//!
//! All records are built once at load time and never mutated afterwards.
//! Filtering and sorting borrow them.

use cookbook_common::RecipeId;
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Whether a recipe's effective value heals or damages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Effective value is a health amount.
    #[default]
    Health,
    /// Effective value is a damage amount.
    Damage,
}

/// One effect granted by a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEffect {
    /// Effect name, e.g. `"Speed"`.
    pub effect: String,
    /// Effect magnitude as written, e.g. `"+10%"`.
    pub value: String,
    /// Duration in seconds; `0` when unknown or instant.
    pub duration: f64,
    /// Duration unit, always `"seconds"`.
    pub unit: String,
}

impl SpecialEffect {
    /// Creates an effect measured in seconds.
    #[must_use]
    pub fn new(effect: impl Into<String>, value: impl Into<String>, duration: f64) -> Self {
        Self {
            effect: effect.into(),
            value: value.into(),
            duration,
            unit: "seconds".to_string(),
        }
    }
}

/// One craftable variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier.
    pub id: RecipeId,
    /// Display name, shared by all variations of the same item.
    pub name: String,
    /// Ingredient name to required quantity (always at least 1).
    pub ingredients: IndexMap<String, u32>,
    /// Healing amount, when the record heals.
    pub health: Option<f64>,
    /// Damage amount, when the record carries one.
    pub damage: Option<f64>,
    /// Discriminates the effective value.
    pub damage_type: DamageType,
    /// Duration in seconds; `0` means instant.
    pub duration: f64,
    /// Description text.
    pub description: String,
    /// Effects in scrape order.
    pub special_effects: Vec<SpecialEffect>,
    /// Vendor selling value.
    pub selling_value: Option<f64>,
    /// Vendor buying value.
    pub buying_value: Option<f64>,
    /// Inventory grid size, e.g. `"1x2"`.
    pub grid_size: Option<String>,
    /// Category key, e.g. `"cooked_consumables"`.
    #[serde(rename = "type")]
    pub category: String,
    /// Image URL; always present.
    pub image_url: String,
    /// Items produced per craft (at least 1).
    pub output_amount: u32,
}

impl Recipe {
    /// Damage when present, otherwise health.
    #[must_use]
    pub fn effective_value(&self) -> Option<f64> {
        self.damage.or(self.health)
    }

    /// Returns true for damage-type records.
    #[must_use]
    pub fn is_damage(&self) -> bool {
        self.damage_type == DamageType::Damage
    }

    /// Duration used for rate calculations; instant counts as one second.
    #[must_use]
    pub fn effective_duration(&self) -> f64 {
        if self.duration == 0.0 {
            1.0
        } else {
            self.duration
        }
    }

    /// Health delivered per second, `None` for damage-type records.
    #[must_use]
    pub fn health_per_second(&self) -> Option<f64> {
        if self.is_damage() {
            return None;
        }
        let health = self.effective_value().unwrap_or(0.0);
        Some(if health > 0.0 {
            health / self.effective_duration()
        } else {
            0.0
        })
    }

    /// Number of distinct ingredients.
    #[must_use]
    pub fn difficulty(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns whether the recipe requires the named ingredient.
    #[must_use]
    pub fn uses(&self, ingredient: &str) -> bool {
        self.ingredients.contains_key(ingredient)
    }

    /// Returns whether the recipe grants the named effect.
    #[must_use]
    pub fn has_effect(&self, effect: &str) -> bool {
        self.special_effects.iter().any(|e| e.effect == effect)
    }
}

/// A scraped ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Display name.
    pub name: String,
    /// Description text.
    pub description: String,
    /// Type label(s), comma-joined.
    #[serde(rename = "type")]
    pub category: String,
    /// Inventory grid size.
    pub grid_size: Option<String>,
    /// Vendor selling value.
    pub selling_value: Option<f64>,
    /// Vendor buying value.
    pub buying_value: Option<f64>,
    /// Vendors that sell it.
    pub sellers: Option<Vec<String>>,
    /// Items it is used in.
    pub used_in: Option<Vec<String>>,
    /// Recipe that crafts it, if any.
    pub recipe_id: Option<RecipeId>,
    /// Image URL; always present.
    pub image: String,
}

/// All variations sharing one output name.
///
/// Never empty: the first variation is the primary recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedItem {
    name: String,
    recipes: Vec<Recipe>,
}

impl GroupedItem {
    /// Creates a group, or `None` when `recipes` is empty.
    #[must_use]
    pub fn new(name: impl Into<String>, recipes: Vec<Recipe>) -> Option<Self> {
        if recipes.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            recipes,
        })
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all variations in scrape order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Returns the first-encountered variation.
    #[must_use]
    pub fn primary_recipe(&self) -> &Recipe {
        // Non-empty by construction
        &self.recipes[0]
    }

    /// Returns the number of variations.
    #[must_use]
    pub fn total_variations(&self) -> usize {
        self.recipes.len()
    }

    /// Returns whether any variation uses the ingredient.
    #[must_use]
    pub fn contains_ingredient(&self, ingredient: &str) -> bool {
        self.recipes.iter().any(|r| r.uses(ingredient))
    }

    /// Returns whether any variation grants the effect.
    #[must_use]
    pub fn contains_effect(&self, effect: &str) -> bool {
        self.recipes.iter().any(|r| r.has_effect(effect))
    }
}

impl Serialize for GroupedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GroupedItem", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("recipes", &self.recipes)?;
        state.serialize_field("primaryRecipe", self.primary_recipe())?;
        state.serialize_field("totalVariations", &self.total_variations())?;
        state.end()
    }
}

/// Groups recipes by name, in first-encountered order.
#[must_use]
pub fn group_recipes(recipes: &[Recipe]) -> Vec<GroupedItem> {
    let mut groups: IndexMap<&str, Vec<Recipe>> = IndexMap::new();
    for recipe in recipes {
        groups
            .entry(recipe.name.as_str())
            .or_default()
            .push(recipe.clone());
    }

    groups
        .into_iter()
        .filter_map(|(name, recipes)| GroupedItem::new(name, recipes))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a healing recipe with the given ingredients.
    pub fn recipe(name: &str, variation: usize, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: RecipeId::for_recipe(name, Some(variation)),
            name: name.to_string(),
            ingredients: ingredients.iter().map(|i| ((*i).to_string(), 1)).collect(),
            health: None,
            damage: None,
            damage_type: DamageType::Health,
            duration: 0.0,
            description: String::new(),
            special_effects: Vec::new(),
            selling_value: None,
            buying_value: None,
            grid_size: None,
            category: "cooked_consumables".to_string(),
            image_url: format!("https://img.test/{name}.png"),
            output_amount: 1,
        }
    }

    pub fn healing(mut recipe: Recipe, health: f64, duration: f64) -> Recipe {
        recipe.health = Some(health);
        recipe.duration = duration;
        recipe
    }

    pub fn damaging(mut recipe: Recipe, damage: f64) -> Recipe {
        recipe.damage = Some(damage);
        recipe.damage_type = DamageType::Damage;
        recipe
    }

    pub fn with_effects(mut recipe: Recipe, effects: &[&str]) -> Recipe {
        recipe.special_effects = effects
            .iter()
            .map(|e| SpecialEffect::new(*e, "", 0.0))
            .collect();
        recipe
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_instant_duration_hps() {
        let salad = healing(recipe("Potato Salad", 0, &[]), 30.0, 0.0);
        assert_eq!(salad.health_per_second(), Some(30.0));

        let ramen = healing(recipe("Ramen", 0, &[]), 50.0, 10.0);
        assert_eq!(ramen.health_per_second(), Some(5.0));
    }

    #[test]
    fn test_damage_overrides_health() {
        let mut grenade = damaging(recipe("Stick Grenade", 0, &[]), 100.0);
        grenade.health = Some(20.0);
        assert_eq!(grenade.effective_value(), Some(100.0));
        assert!(grenade.is_damage());
        assert_eq!(grenade.health_per_second(), None);
    }

    #[test]
    fn test_group_recipes_order() {
        let recipes = vec![
            recipe("Broth", 0, &["Water"]),
            recipe("Ramen", 0, &["Broth"]),
            recipe("Broth", 1, &["Bone"]),
        ];
        let groups = group_recipes(&recipes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name(), "Broth");
        assert_eq!(groups[0].total_variations(), 2);
        assert_eq!(groups[0].primary_recipe().id.as_str(), "broth-v0");
        assert!(groups[0].contains_ingredient("Bone"));
        assert!(!groups[1].contains_ingredient("Bone"));
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(GroupedItem::new("Nothing", Vec::new()).is_none());
    }

    #[test]
    fn test_grouped_item_serialization() {
        let group = GroupedItem::new("Broth", vec![recipe("Broth", 0, &["Water"])]).expect("group");
        let json = serde_json::to_value(&group).expect("serialize");
        assert_eq!(json["totalVariations"], 1);
        assert_eq!(json["primaryRecipe"]["id"], "broth-v0");
        assert_eq!(json["primaryRecipe"]["type"], "cooked_consumables");
        assert_eq!(json["primaryRecipe"]["damageType"], "health");
    }

    proptest! {
        #[test]
        fn test_grouping_round_trip(names in proptest::collection::vec(0usize..6, 0..40)) {
            let recipes: Vec<Recipe> = names
                .iter()
                .enumerate()
                .map(|(i, n)| recipe(&format!("Item {n}"), i, &[]))
                .collect();

            let groups = group_recipes(&recipes);
            let mut flattened: Vec<String> = groups
                .iter()
                .flat_map(|g| g.recipes().iter().map(|r| r.id.to_string()))
                .collect();
            let mut original: Vec<String> = recipes.iter().map(|r| r.id.to_string()).collect();
            flattened.sort();
            original.sort();
            prop_assert_eq!(flattened, original);

            for group in &groups {
                prop_assert!(group.recipes().iter().all(|r| r.name == group.name()));
            }
        }
    }
}
