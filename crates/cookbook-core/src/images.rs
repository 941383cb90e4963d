//! Image URL fallback table.
//!
//! Scraped records often lack an image or carry a broken one. [`ImageTable`]
//! maps display names to known-good wiki URLs and synthesizes a
//! `{base_url}/{Name_With_Underscores}.png` URL for everything else, so image
//! resolution never fails.
//!
//! The table is an injected resource: the CLI builds it from configuration
//! and tests build synthetic ones.

use indexmap::IndexMap;
use serde::Serialize;

/// Base URL of the wiki's image store.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://sulfur.wiki.gg/images";

/// Prefix marking generic ingredient categories ("Any Milk").
const ANY_PREFIX: &str = "Any ";

const CRAW_FLESH: &str = "https://sulfur.wiki.gg/images/4/49/Craw_Flesh.png?f76748";
const WHOLE_MILK: &str = "https://sulfur.wiki.gg/images/0/0f/Whole_Milk.png?4df06b";
const LOW_FAT_MILK: &str = "https://sulfur.wiki.gg/images/e/ef/Low_Fat_Milk.png?be88f5";
const FALSE_SULFCAP: &str = "https://sulfur.wiki.gg/images/4/41/False_Sulfcap.png?ef15fc";
const SHAVWA_SKIN: &str = "https://sulfur.wiki.gg/images/b/bd/Shav%27Wa_Skin.png?8cf32d";
const WATER: &str = "https://sulfur.wiki.gg/images/4/41/Scroll_of_Water.png?164167";

/// Known working image URLs, including case variants seen in the data.
const KNOWN_IMAGES: &[(&str, &str)] = &[
    ("Dynamite", "https://sulfur.wiki.gg/images/f/fc/Dynamite.png?f05a78"),
    ("Flour", "https://sulfur.wiki.gg/images/e/e8/Flour.png?2047f8"),
    ("Butter", "https://sulfur.wiki.gg/images/f/f1/Butter.png?2d78e6"),
    ("Whole Milk", WHOLE_MILK),
    ("Used Rubber", "https://sulfur.wiki.gg/images/7/73/Used_Rubber.png?ae1964"),
    ("Low Fat Milk", LOW_FAT_MILK),
    ("Skimmed Milk", "https://sulfur.wiki.gg/images/d/d2/Skimmed_Milk.png?ca4cfe"),
    ("Hot Sauce", "https://sulfur.wiki.gg/images/0/02/Hot_Sauce.png?a776ff"),
    ("False Sulfcap", FALSE_SULFCAP),
    ("Velvet Bell", "https://sulfur.wiki.gg/images/5/50/Velvet_Bell.png?3617b4"),
    ("Potato Salad", "https://sulfur.wiki.gg/images/2/24/Potato_Salad.png?f78e45"),
    ("Stick Grenade", "https://sulfur.wiki.gg/images/c/c7/Stick_Grenade.png?227fad"),
    ("Sashimi", "https://sulfur.wiki.gg/images/4/41/Sashimi.png?cb4a45"),
    ("Shoe", "https://sulfur.wiki.gg/images/6/66/Shoe.png?7bbfb0"),
    ("Ramen", "https://sulfur.wiki.gg/images/f/f8/Ramen.png?c50742"),
    ("Broth", "https://sulfur.wiki.gg/images/9/9c/Broth.png?37f671"),
    // Generic categories
    ("Any Flesh", CRAW_FLESH),
    ("Flesh", CRAW_FLESH),
    ("Various Flesh", CRAW_FLESH),
    ("Any Milk", WHOLE_MILK),
    ("Milk", WHOLE_MILK),
    ("Any Milk (except buttermilk)", WHOLE_MILK),
    ("Milk (any except buttermilk & whole milk)", LOW_FAT_MILK),
    ("Any Milk (except Whole Milk)", LOW_FAT_MILK),
    ("Any mulk (except buttermilk)", WHOLE_MILK),
    ("Any 1x1 mushroom", FALSE_SULFCAP),
    ("Mushroom", FALSE_SULFCAP),
    ("any mushroom", FALSE_SULFCAP),
    ("any other 1x1 mushroom", FALSE_SULFCAP),
    ("different mushrooms", FALSE_SULFCAP),
    ("mushrooms", FALSE_SULFCAP),
    ("Any Skin", SHAVWA_SKIN),
    ("any skin", SHAVWA_SKIN),
    // Organs have no image of their own
    ("bladder", CRAW_FLESH),
    ("Bladder", CRAW_FLESH),
    ("shav'wa bladder", CRAW_FLESH),
    ("Shav'Wa Bladder", CRAW_FLESH),
    ("water", WATER),
    ("any water", WATER),
    // Lowercase variants
    ("shoe", "https://sulfur.wiki.gg/images/6/66/Shoe.png?7bbfb0"),
    ("velvet bell", "https://sulfur.wiki.gg/images/5/50/Velvet_Bell.png?3617b4"),
    ("potato salad", "https://sulfur.wiki.gg/images/2/24/Potato_Salad.png?f78e45"),
    ("stick grenade", "https://sulfur.wiki.gg/images/c/c7/Stick_Grenade.png?227fad"),
    ("sashimi", "https://sulfur.wiki.gg/images/4/41/Sashimi.png?cb4a45"),
    ("hot sauce", "https://sulfur.wiki.gg/images/0/02/Hot_Sauce.png?a776ff"),
];

const MILKS: &[&str] = &["Whole Milk", "Low Fat Milk", "Skimmed Milk"];
const THIN_MILKS: &[&str] = &["Low Fat Milk", "Skimmed Milk"];
const FLESHES: &[&str] = &[
    "Craw Flesh",
    "Dog Flesh",
    "Goblin Flesh",
    "Human Flesh",
    "Shav'Wa Flesh",
];
const MUSHROOMS: &[&str] = &["False Sulfcap", "Rödsopp"];
const SKINS: &[&str] = &["Craw Skin", "Dog Skin", "Goblin Skin", "Human Skin", "Shav'Wa Skin"];
const WATERS: &[&str] = &["Water", "Purified Water", "Bottle of Water"];

/// Concrete items accepted by generic ingredient names.
const ANY_CATEGORIES: &[(&str, &[&str])] = &[
    ("Any Milk", MILKS),
    ("Any Milk (except buttermilk)", MILKS),
    ("Milk (any except buttermilk & whole milk)", THIN_MILKS),
    ("Any Milk (except Whole Milk)", THIN_MILKS),
    ("Milk", MILKS),
    ("Any Flesh", FLESHES),
    ("Flesh", FLESHES),
    ("Various Flesh", FLESHES),
    ("Any 1x1 mushroom", MUSHROOMS),
    ("Mushroom", MUSHROOMS),
    ("any mushroom", MUSHROOMS),
    ("any other 1x1 mushroom", MUSHROOMS),
    ("different mushrooms", MUSHROOMS),
    ("mushrooms", MUSHROOMS),
    ("Any Skin", SKINS),
    ("any skin", SKINS),
    ("any water", WATERS),
    ("water", WATERS),
];

/// Name-to-URL fallback table with a synthesis rule for unknown names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageTable {
    /// Base URL used to synthesize image URLs.
    base_url: String,
    /// Exact-name lookup table.
    known: IndexMap<String, String>,
    /// Generic names and the concrete items they accept.
    any_categories: IndexMap<String, Vec<String>>,
}

impl Default for ImageTable {
    fn default() -> Self {
        Self::sulfur_wiki()
    }
}

impl ImageTable {
    /// Creates an empty table synthesizing URLs under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            known: IndexMap::new(),
            any_categories: IndexMap::new(),
        }
    }

    /// Creates the built-in table for the Sulfur wiki.
    #[must_use]
    pub fn sulfur_wiki() -> Self {
        let mut table = Self::new(DEFAULT_IMAGE_BASE_URL);
        for (name, url) in KNOWN_IMAGES {
            table.known.insert((*name).to_string(), (*url).to_string());
        }
        for (name, items) in ANY_CATEGORIES {
            table.any_categories.insert(
                (*name).to_string(),
                items.iter().map(|s| (*s).to_string()).collect(),
            );
        }
        table
    }

    /// Replaces the base URL used for synthesized URLs.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Adds or replaces a known URL.
    #[must_use]
    pub fn with_known(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.known.insert(name.into(), url.into());
        self
    }

    /// Adds or replaces a generic ingredient category.
    #[must_use]
    pub fn with_any_category(mut self, name: impl Into<String>, items: Vec<String>) -> Self {
        self.any_categories.insert(name.into(), items);
        self
    }

    /// Merges known URLs over the existing entries.
    pub fn extend_known<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.known
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Merges generic categories over the existing entries.
    pub fn extend_any_categories<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        self.any_categories.extend(entries);
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the number of known URLs.
    #[must_use]
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Resolves an image URL for a display name. Never fails.
    ///
    /// Lookup order: exact name, lowercase name, then for names starting
    /// with `"Any "` the stripped name (synthesized from the stripped name
    /// when unknown), otherwise a synthesized URL.
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        if let Some(url) = self.known.get(name) {
            return url.clone();
        }

        if let Some(url) = self.known.get(&name.to_lowercase()) {
            return url.clone();
        }

        if let Some(base) = name.strip_prefix(ANY_PREFIX) {
            return self
                .known
                .get(base)
                .cloned()
                .unwrap_or_else(|| self.synthesize(base));
        }

        self.synthesize(name)
    }

    /// Uses `original` when it is a usable URL, otherwise [`Self::resolve`].
    #[must_use]
    pub fn resolve_or(&self, name: &str, original: Option<&str>) -> String {
        match original {
            Some(url) if !url.trim().is_empty() && url != "undefined" => url.to_string(),
            _ => self.resolve(name),
        }
    }

    /// Returns the concrete items accepted by a generic ingredient name.
    #[must_use]
    pub fn any_category(&self, name: &str) -> Option<&[String]> {
        self.any_categories.get(name).map(Vec::as_slice)
    }

    fn synthesize(&self, name: &str) -> String {
        let mut file = String::with_capacity(name.len());
        let mut in_whitespace = false;
        for c in name.chars() {
            if c.is_whitespace() {
                if !in_whitespace {
                    file.push('_');
                }
                in_whitespace = true;
            } else {
                file.push(c);
                in_whitespace = false;
            }
        }
        format!("{}/{file}.png", self.base_url)
    }
}
