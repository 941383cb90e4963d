//! Recipe category keys and their display labels.

use serde::Serialize;

/// Display labels for a known category key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// Key as it appears in the recipes document.
    pub key: &'static str,
    /// Plural label used on filter buttons.
    pub filter_label: &'static str,
    /// Singular label used on type badges.
    pub badge_label: &'static str,
}

/// Categories the wiki scraper emits.
pub const KNOWN_CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        key: "cooked_consumables",
        filter_label: "Consumables",
        badge_label: "Consumable",
    },
    CategoryInfo {
        key: "cooked_throwables",
        filter_label: "Throwables",
        badge_label: "Throwable",
    },
    CategoryInfo {
        key: "cooked_equipment",
        filter_label: "Equipment",
        badge_label: "Equipment",
    },
];

/// Looks up a known category by key.
#[must_use]
pub fn category_info(key: &str) -> Option<&'static CategoryInfo> {
    KNOWN_CATEGORIES.iter().find(|c| c.key == key)
}

/// Filter-button label for a key; unknown keys display verbatim.
#[must_use]
pub fn filter_label(key: &str) -> &str {
    category_info(key).map_or(key, |c| c.filter_label)
}

/// Badge label for a key; unknown keys display verbatim.
#[must_use]
pub fn badge_label(key: &str) -> &str {
    category_info(key).map_or(key, |c| c.badge_label)
}

/// Maps a filter-button label back to its key.
#[must_use]
pub fn category_for_label(label: &str) -> Option<&'static str> {
    KNOWN_CATEGORIES
        .iter()
        .find(|c| c.filter_label == label)
        .map(|c| c.key)
}
