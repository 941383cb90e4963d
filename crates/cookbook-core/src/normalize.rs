//! Normalizer: raw scraped records into canonical [`Recipe`]s and
//! [`Ingredient`]s.
//!
//! One [`Recipe`] is emitted per variation; records without variations
//! still produce one recipe with no ingredients. Nothing here fails: every
//! malformed field degrades to a typed default.

use ahash::AHashSet;
use cookbook_common::RecipeId;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce;
use crate::images::ImageTable;
use crate::model::{DamageType, Ingredient, Recipe, SpecialEffect};
use crate::raw::{
    RawEffect, RawIngredient, RawIngredientRef, RawRecipe, ScrapedIngredientsData,
    ScrapedRecipesData,
};

/// Damage placeholder the scraper writes for unknown values.
const UNKNOWN_DAMAGE: &str = "Unknown";

/// Health and damage of a record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Potency {
    /// Healing amount.
    pub health: Option<f64>,
    /// Damage amount.
    pub damage: Option<f64>,
    /// Which of the two is effective.
    pub damage_type: DamageType,
}

/// Normalizes every record of a recipes document, in category then record
/// order.
///
/// Ids are made unique by suffixing later collisions with `-2`, `-3`, ...
#[must_use]
pub fn normalize_recipes(raw: &ScrapedRecipesData, images: &ImageTable) -> Vec<Recipe> {
    let mut recipes = Vec::with_capacity(raw.record_count());
    let mut used_ids = AHashSet::new();

    for (category, records) in &raw.recipes {
        for record in records {
            for mut recipe in normalize_record(record, category, images) {
                recipe.id = unique_id(recipe.id, &mut used_ids);
                recipes.push(recipe);
            }
        }
    }

    debug!(
        "Normalized {} records into {} recipes",
        raw.record_count(),
        recipes.len()
    );
    recipes
}

fn unique_id(id: RecipeId, used: &mut AHashSet<RecipeId>) -> RecipeId {
    if used.insert(id.clone()) {
        return id;
    }

    let mut n = 2;
    loop {
        let candidate = id.disambiguated(n);
        if used.insert(candidate.clone()) {
            warn!("Duplicate recipe id {id}, using {candidate}");
            return candidate;
        }
        n += 1;
    }
}

/// Normalizes one raw record into one recipe per variation.
#[must_use]
pub fn normalize_record(record: &RawRecipe, category: &str, images: &ImageTable) -> Vec<Recipe> {
    let name = coerce::text(&record.name);
    let special_effects: Vec<SpecialEffect> = record.effects.iter().map(normalize_effect).collect();
    let potency = resolve_potency(record);
    let (selling_value, buying_value) = resolve_economics(record);
    let grid_size = Some(coerce::text(&record.grid_size)).filter(|g| !g.is_empty());

    let base = Recipe {
        id: RecipeId::for_recipe(&name, None),
        ingredients: IndexMap::new(),
        health: potency.health,
        damage: potency.damage,
        damage_type: potency.damage_type,
        duration: resolve_duration(record),
        description: coerce::text(&record.description),
        special_effects,
        selling_value,
        buying_value,
        grid_size,
        category: category.to_string(),
        image_url: images.resolve_or(&name, record.image()),
        output_amount: 1,
        name,
    };

    if record.recipes.is_empty() {
        return vec![base];
    }

    record
        .recipes
        .iter()
        .enumerate()
        .map(|(index, variation)| Recipe {
            id: RecipeId::for_recipe(&base.name, Some(index)),
            ingredients: normalize_ingredient_lines(&variation.ingredients),
            output_amount: output_amount(&variation.output),
            ..base.clone()
        })
        .collect()
}

/// Converts a raw effect into its canonical shape.
#[must_use]
pub fn normalize_effect(effect: &RawEffect) -> SpecialEffect {
    match effect {
        RawEffect::Label(label) => SpecialEffect::new(label.as_str(), "", 0.0),
        RawEffect::Detailed(detail) => SpecialEffect::new(
            coerce::text(&detail.kind),
            coerce::text(&detail.value),
            coerce::parse_numeric(&detail.duration),
        ),
        RawEffect::Other(_) => SpecialEffect::new("", "", 0.0),
    }
}

/// Resolves health and damage.
///
/// Health is `healing.health`, else `healing.amount`. A numeric damage is
/// kept as-is; a string damage is stripped to digits and dots and kept only
/// when positive. Damage, when found, makes the record damage-type.
#[must_use]
pub fn resolve_potency(record: &RawRecipe) -> Potency {
    let health = record.healing_object().and_then(|healing| {
        healing
            .get("health")
            .and_then(coerce::truthy_number)
            .or_else(|| healing.get("amount").and_then(coerce::truthy_number))
    });

    let damage = match &record.damage {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s != UNKNOWN_DAMAGE => {
            coerce::parse_float_prefix(&coerce::strip_to_numeric(s)).filter(|d| *d > 0.0)
        },
        _ => None,
    };

    let damage_type = if damage.is_some() {
        DamageType::Damage
    } else {
        DamageType::Health
    };

    Potency {
        health,
        damage,
        damage_type,
    }
}

/// Resolves the duration in seconds.
///
/// `healing.duration` wins when present and non-zero; otherwise the longest
/// positive effect duration; otherwise `0`.
#[must_use]
pub fn resolve_duration(record: &RawRecipe) -> f64 {
    let healing = record
        .healing_object()
        .and_then(|h| h.get("duration"))
        .filter(|d| coerce::is_truthy(d))
        .map_or(0.0, coerce::duration_value);

    if healing != 0.0 {
        return healing;
    }

    record
        .effects
        .iter()
        .map(|effect| match effect {
            RawEffect::Detailed(detail) => coerce::duration_value(&detail.duration),
            RawEffect::Label(_) | RawEffect::Other(_) => 0.0,
        })
        .filter(|d| *d > 0.0)
        .fold(0.0, f64::max)
}

fn resolve_economics(record: &RawRecipe) -> (Option<f64>, Option<f64>) {
    let Some(economic) = record.economic_object() else {
        return (None, None);
    };
    let value = |key: &str| economic.get(key).and_then(coerce::truthy_number);
    (value("sellingValue"), value("buyingValue"))
}

/// Builds the ingredient map of a variation.
///
/// Lines with an empty key are skipped; a repeated key keeps its first
/// position and takes the last quantity.
#[must_use]
pub fn normalize_ingredient_lines(lines: &[RawIngredientRef]) -> IndexMap<String, u32> {
    let mut ingredients = IndexMap::with_capacity(lines.len());
    for line in lines {
        let key = line.key();
        if key.is_empty() {
            continue;
        }
        ingredients.insert(key, coerce::parse_quantity(&line.quantity));
    }
    ingredients
}

fn output_amount(output: &Value) -> u32 {
    output
        .as_object()
        .and_then(|o| o.get("quantity"))
        .and_then(coerce::truthy_number)
        .map_or(1, coerce::clamp_count)
}

/// Normalizes an ingredients document, keyed by the document's map keys.
#[must_use]
pub fn normalize_ingredients(
    raw: &ScrapedIngredientsData,
    images: &ImageTable,
) -> IndexMap<String, Ingredient> {
    let ingredients: IndexMap<String, Ingredient> = raw
        .ingredients
        .iter()
        .map(|(key, record)| (key.clone(), normalize_ingredient(key, record, images)))
        .collect();

    debug!("Normalized {} ingredients", ingredients.len());
    ingredients
}

/// Normalizes one ingredient record; `key` names it when the record does not.
#[must_use]
pub fn normalize_ingredient(key: &str, record: &RawIngredient, images: &ImageTable) -> Ingredient {
    let name = if coerce::is_truthy(&record.name) {
        coerce::text(&record.name)
    } else {
        key.to_string()
    };

    let category = match &record.kind {
        Value::Array(items) => items
            .iter()
            .map(coerce::display)
            .collect::<Vec<_>>()
            .join(", "),
        other => coerce::text(other),
    };

    let recipe_id = Some(coerce::text(&record.recipe_id))
        .filter(|id| !id.is_empty())
        .map(RecipeId::from_raw);

    Ingredient {
        name,
        description: coerce::text(&record.description),
        category,
        grid_size: Some(coerce::text(&record.grid_size)).filter(|g| !g.is_empty()),
        selling_value: coerce::number_if_truthy(&record.selling_value),
        buying_value: coerce::number_if_truthy(&record.buying_value),
        sellers: coerce::string_list(&record.sellers),
        used_in: coerce::string_list(&record.used_in),
        recipe_id,
        image: images.resolve_or(key, record.image()),
    }
}
