//! Raw shapes of the scraped wiki documents.
//!
//! Every loosely-typed field is kept as a [`serde_json::Value`] and only
//! interpreted by the normalizer. Deserializing these types fails only on
//! JSON syntax errors, never on unexpected shapes.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::coerce;

/// Deserializes a list leniently: non-arrays read as empty, elements that do
/// not fit `T` are replaced by `T::default()`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

/// Scrape metadata shared by both documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapeMetadata {
    /// Dataset name.
    pub name: String,
    /// Dataset description.
    pub description: String,
    /// Scrape timestamp as written by the scraper.
    pub scraped_at: String,
    /// Source wiki.
    pub source: String,
    /// Base URL of the source wiki.
    pub base_url: String,
    /// Declared record count (`totalRecipes` / `totalIngredients`).
    pub total: Option<u64>,
}

impl ScrapeMetadata {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| obj.get(key).map(coerce::text).unwrap_or_default();
        let total = obj
            .get("totalRecipes")
            .or_else(|| obj.get("totalIngredients"))
            .and_then(Value::as_u64);

        Some(Self {
            name: field("name"),
            description: field("description"),
            scraped_at: field("scrapedAt"),
            source: field("source"),
            base_url: field("baseUrl"),
            total,
        })
    }
}

/// An effect entry: either a bare label or a `{type, value, duration}` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawEffect {
    /// Bare effect name, as used by throwables.
    Label(String),
    /// Structured effect.
    Detailed(RawEffectDetail),
    /// Any other shape; normalizes like an empty object.
    Other(Value),
}

impl Default for RawEffect {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

/// Structured effect fields, all optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEffectDetail {
    /// Effect name.
    #[serde(rename = "type")]
    pub kind: Value,
    /// Effect magnitude, often a string such as `"+20%"`.
    pub value: Value,
    /// Effect duration, number or string.
    pub duration: Value,
}

/// One ingredient line of a variation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawIngredientRef {
    /// Ingredient name (preferred key).
    pub item: Value,
    /// Ingredient name (fallback key).
    pub name: Value,
    /// Quantity, number or numeric string.
    pub quantity: Value,
}

impl RawIngredientRef {
    /// Returns the ingredient key: `item`, else `name`, else empty.
    #[must_use]
    pub fn key(&self) -> String {
        if coerce::is_truthy(&self.item) {
            coerce::text(&self.item)
        } else {
            coerce::text(&self.name)
        }
    }
}

/// One concrete recipe variation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawVariation {
    /// Ingredient lines.
    #[serde(deserialize_with = "lenient_list")]
    pub ingredients: Vec<RawIngredientRef>,
    /// Output description (`{item, quantity}`).
    pub output: Value,
}

/// A scraped craftable item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecipe {
    /// Display name.
    pub name: Value,
    /// Category as written in the record (the category key is authoritative).
    #[serde(rename = "type")]
    pub kind: Value,
    /// Inventory grid size, e.g. `"1x2"`.
    pub grid_size: Value,
    /// Image URL (camelCase spelling).
    pub image_url: Value,
    /// Image URL (snake_case spelling).
    #[serde(rename = "image_url")]
    pub image_url_snake: Value,
    /// Description text.
    pub description: Value,
    /// Effects list.
    #[serde(deserialize_with = "lenient_list")]
    pub effects: Vec<RawEffect>,
    /// Economic data (preferred spelling).
    pub economic: Value,
    /// Economic data (alternate spelling).
    pub economic_data: Value,
    /// Healing data (preferred spelling).
    pub healing: Value,
    /// Healing data (alternate spelling).
    pub healing_effects: Value,
    /// Damage: number, numeric string, glyph-prefixed string or `"Unknown"`.
    pub damage: Value,
    /// Variations.
    #[serde(deserialize_with = "lenient_list")]
    pub recipes: Vec<RawVariation>,
}

impl RawRecipe {
    /// Returns the first usable image URL of the record.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        coerce::usable_url(&self.image_url).or_else(|| coerce::usable_url(&self.image_url_snake))
    }

    /// Returns the healing object (`healing`, else `healingEffects`).
    #[must_use]
    pub fn healing_object(&self) -> Option<&serde_json::Map<String, Value>> {
        let healing = if coerce::is_truthy(&self.healing) {
            &self.healing
        } else {
            &self.healing_effects
        };
        healing.as_object()
    }

    /// Returns the economic object (`economic`, else `economicData`).
    #[must_use]
    pub fn economic_object(&self) -> Option<&serde_json::Map<String, Value>> {
        let economic = if coerce::is_truthy(&self.economic) {
            &self.economic
        } else {
            &self.economic_data
        };
        economic.as_object()
    }
}

/// The scraped recipes document, grouped by category key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ScrapedRecipesData {
    /// Scrape metadata, when present.
    pub metadata: Option<ScrapeMetadata>,
    /// Records per category key, in document order.
    pub recipes: IndexMap<String, Vec<RawRecipe>>,
}

impl ScrapedRecipesData {
    /// Returns the total number of raw records across categories.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.recipes.values().map(Vec::len).sum()
    }
}

impl From<Value> for ScrapedRecipesData {
    fn from(value: Value) -> Self {
        let metadata = value.get("metadata").and_then(ScrapeMetadata::from_value);
        let mut recipes = IndexMap::new();

        let Some(categories) = value.get("recipes").and_then(Value::as_object) else {
            warn!("Recipes document has no `recipes` object");
            return Self { metadata, recipes };
        };

        for (category, records) in categories {
            let Some(records) = records.as_array() else {
                warn!("Category {category} is not a list, skipping");
                continue;
            };

            let parsed: Vec<RawRecipe> = records
                .iter()
                .enumerate()
                .filter_map(|(i, record)| {
                    if !record.is_object() {
                        warn!("Skipping non-object record {i} in category {category}");
                        return None;
                    }
                    match serde_json::from_value(record.clone()) {
                        Ok(recipe) => Some(recipe),
                        Err(e) => {
                            warn!("Skipping malformed record {i} in category {category}: {e}");
                            None
                        },
                    }
                })
                .collect();

            recipes.insert(category.clone(), parsed);
        }

        Self { metadata, recipes }
    }
}

/// A scraped ingredient record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawIngredient {
    /// Display name; the map key is used when falsy.
    pub name: Value,
    /// Description text.
    pub description: Value,
    /// Type: a string or a list of strings.
    #[serde(rename = "type")]
    pub kind: Value,
    /// Inventory grid size.
    pub grid_size: Value,
    /// Selling value.
    pub selling_value: Value,
    /// Buying value.
    pub buying_value: Value,
    /// Vendors that sell the ingredient.
    pub sellers: Value,
    /// Items the ingredient is used in.
    pub used_in: Value,
    /// Image URL (camelCase spelling).
    pub image_url: Value,
    /// Image URL (snake_case spelling).
    #[serde(rename = "image_url")]
    pub image_url_snake: Value,
    /// Image URL (short spelling).
    pub image: Value,
    /// Id of the recipe that crafts this ingredient.
    pub recipe_id: Value,
}

impl RawIngredient {
    /// Returns the first usable image URL of the record.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        coerce::usable_url(&self.image_url)
            .or_else(|| coerce::usable_url(&self.image_url_snake))
            .or_else(|| coerce::usable_url(&self.image))
    }
}

/// The scraped ingredients document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ScrapedIngredientsData {
    /// Scrape metadata, when present.
    pub metadata: Option<ScrapeMetadata>,
    /// Records by key, in document order.
    pub ingredients: IndexMap<String, RawIngredient>,
}

impl From<Value> for ScrapedIngredientsData {
    fn from(value: Value) -> Self {
        let metadata = value.get("metadata").and_then(ScrapeMetadata::from_value);

        let ingredients = match value.get("ingredients").and_then(Value::as_object) {
            Some(entries) => entries
                .iter()
                .map(|(key, record)| {
                    let raw = serde_json::from_value(record.clone()).unwrap_or_default();
                    (key.clone(), raw)
                })
                .collect(),
            None => {
                warn!("Ingredients document has no `ingredients` object");
                IndexMap::new()
            },
        };

        Self {
            metadata,
            ingredients,
        }
    }
}
