//! Display strings for table cells.

use indexmap::IndexMap;

use crate::coerce::format_number;
use crate::images::ImageTable;
use crate::model::Recipe;
use crate::query::HealthSortMode;

/// Ingredients shown before the summary is elided.
const SUMMARY_LIMIT: usize = 3;

/// HP/DMG cell: `"100 DMG"`, `"45 HP"` or `"0 HP"`.
#[must_use]
pub fn health_display(recipe: &Recipe) -> String {
    if recipe.is_damage() {
        if let Some(damage) = recipe.damage.filter(|d| *d > 0.0) {
            return format!("{} DMG", format_number(damage));
        }
    }

    match recipe.effective_value() {
        Some(value) if value != 0.0 => format!("{} HP", format_number(value)),
        _ => "0 HP".to_string(),
    }
}

/// Duration cell: `"Instant"` or `"30s"`.
#[must_use]
pub fn duration_display(duration: f64) -> String {
    if duration == 0.0 {
        "Instant".to_string()
    } else {
        format!("{}s", format_number(duration))
    }
}

/// HP/s cell with one decimal; `"-"` for damage items.
#[must_use]
pub fn hps_display(recipe: &Recipe) -> String {
    let value = recipe.effective_value().unwrap_or(0.0);
    if value == 0.0 {
        return "0".to_string();
    }
    if recipe.is_damage() {
        return "-".to_string();
    }

    let rate = value / recipe.effective_duration();
    // Round half away from zero before fixing the precision
    format!("{:.1}", (rate * 10.0).round() / 10.0)
}

/// `"Flour (2), Butter (1), Milk (1)..."`, or `"None"`.
#[must_use]
pub fn ingredient_summary(ingredients: &IndexMap<String, u32>) -> String {
    if ingredients.is_empty() {
        return "None".to_string();
    }

    let mut summary = ingredients
        .iter()
        .take(SUMMARY_LIMIT)
        .map(|(name, qty)| format!("{name} ({qty})"))
        .collect::<Vec<_>>()
        .join(", ");
    if ingredients.len() > SUMMARY_LIMIT {
        summary.push_str("...");
    }
    summary
}

/// Header label of the HP/DMG column.
#[must_use]
pub fn health_sort_label(mode: HealthSortMode) -> &'static str {
    if mode.damage_first() {
        "DMG"
    } else {
        "HP"
    }
}

/// `"Can use: Whole Milk, Low Fat Milk"` for generic ingredient names.
#[must_use]
pub fn any_category_hint(images: &ImageTable, name: &str) -> Option<String> {
    images
        .any_category(name)
        .map(|items| format!("Can use: {}", items.join(", ")))
}
