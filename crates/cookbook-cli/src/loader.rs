//! Scraped document loading.
//!
//! This module provides:
//! - Reading the recipes and ingredients JSON documents from disk
//! - Building a [`Catalog`] from them
//! - Load statistics for logging

use std::fs;
use std::path::{Path, PathBuf};

use cookbook_common::{CookbookError, CookbookResult};
use cookbook_core::{Catalog, ImageTable, ScrapedIngredientsData, ScrapedRecipesData};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Default path of the scraped recipes document.
pub const DEFAULT_RECIPES_PATH: &str = "data/recipes.json";

/// Default path of the scraped ingredients document.
pub const DEFAULT_INGREDIENTS_PATH: &str = "data/ingredients.json";

/// Reads and parses one JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> CookbookResult<T> {
    if !path.exists() {
        return Err(CookbookError::NotFound(path.to_path_buf()));
    }

    debug!("Reading document: {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Statistics for the data loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Raw recipe records read.
    pub records_read: usize,
    /// Recipe variations after normalization.
    pub recipes: usize,
    /// Grouped items.
    pub groups: usize,
    /// Ingredients with metadata.
    pub ingredients: usize,
}

/// Loads the scraped documents into a catalog.
#[derive(Debug)]
pub struct DataLoader {
    recipes_path: PathBuf,
    ingredients_path: PathBuf,
    stats: LoaderStats,
}

impl DataLoader {
    /// Creates a loader for the two documents.
    pub fn new(recipes_path: impl Into<PathBuf>, ingredients_path: impl Into<PathBuf>) -> Self {
        Self {
            recipes_path: recipes_path.into(),
            ingredients_path: ingredients_path.into(),
            stats: LoaderStats::default(),
        }
    }

    /// Returns the recipes document path.
    #[must_use]
    pub fn recipes_path(&self) -> &Path {
        &self.recipes_path
    }

    /// Returns the ingredients document path.
    #[must_use]
    pub fn ingredients_path(&self) -> &Path {
        &self.ingredients_path
    }

    /// Returns load statistics.
    #[must_use]
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Reads the recipes document. A missing file is an error.
    pub fn load_recipes(&mut self) -> CookbookResult<ScrapedRecipesData> {
        let data: ScrapedRecipesData = read_document(&self.recipes_path)?;
        self.stats.files_loaded += 1;
        self.stats.records_read = data.record_count();
        Ok(data)
    }

    /// Reads the ingredients document. A missing file yields no metadata.
    pub fn load_ingredients(&mut self) -> CookbookResult<ScrapedIngredientsData> {
        match read_document(&self.ingredients_path) {
            Ok(data) => {
                self.stats.files_loaded += 1;
                Ok(data)
            },
            Err(CookbookError::NotFound(path)) => {
                warn!(
                    "Ingredients file not found: {}, continuing without ingredient metadata",
                    path.display()
                );
                Ok(ScrapedIngredientsData::default())
            },
            Err(e) => Err(e),
        }
    }

    /// Reads both documents and builds the catalog.
    pub fn load_catalog(&mut self, images: &ImageTable) -> CookbookResult<Catalog> {
        let recipes = self.load_recipes()?;
        let ingredients = self.load_ingredients()?;
        let catalog = Catalog::from_raw(&recipes, &ingredients, images);

        let stats = catalog.stats();
        self.stats.recipes = stats.recipes;
        self.stats.groups = stats.groups;
        self.stats.ingredients = stats.ingredients;

        info!(
            "Loaded {} recipes in {} groups, {} ingredients from {} file(s)",
            self.stats.recipes, self.stats.groups, self.stats.ingredients, self.stats.files_loaded
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECIPES: &str = r#"{
        "metadata": {"total": 2},
        "recipes": {
            "cooked_consumables": [
                {"name": "Ramen", "healing": {"amount": 50, "duration": 10}, "recipes": [
                    {"ingredients": [{"item": "Broth", "quantity": 1}, {"item": "Noodles", "quantity": 2}]},
                    {"ingredients": [{"item": "Broth", "quantity": 1}]}
                ]}
            ],
            "cooked_throwables": [
                {"name": "Stick Grenade", "damage": 100}
            ]
        }
    }"#;

    const INGREDIENTS: &str = r#"{
        "ingredients": {
            "Broth": {"type": ["Liquid"], "sellingValue": 4},
            "Noodles": {"description": "Long."}
        }
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let recipes = write(&dir, "recipes.json", RECIPES);
        let ingredients = write(&dir, "ingredients.json", INGREDIENTS);

        let mut loader = DataLoader::new(recipes, ingredients);
        let catalog = loader
            .load_catalog(&ImageTable::sulfur_wiki())
            .expect("load catalog");

        let stats = loader.stats();
        assert_eq!(stats.files_loaded, 2);
        assert_eq!(stats.records_read, 2);
        assert_eq!(stats.recipes, 3);
        assert_eq!(stats.groups, 2);
        assert_eq!(stats.ingredients, 2);
        assert!(catalog.group("Ramen").is_some());
        assert!(catalog.ingredient("Broth").is_some());
    }

    #[test]
    fn test_missing_recipes_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut loader = DataLoader::new(dir.path().join("none.json"), dir.path().join("none2.json"));

        let result = loader.load_catalog(&ImageTable::sulfur_wiki());
        assert!(matches!(result, Err(CookbookError::NotFound(_))));
    }

    #[test]
    fn test_missing_ingredients_is_tolerated() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let recipes = write(&dir, "recipes.json", RECIPES);

        let mut loader = DataLoader::new(recipes, dir.path().join("missing.json"));
        let catalog = loader
            .load_catalog(&ImageTable::sulfur_wiki())
            .expect("load catalog");

        assert_eq!(loader.stats().files_loaded, 1);
        assert!(catalog.ingredients().is_empty());
        assert_eq!(catalog.groups().len(), 2);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let recipes = write(&dir, "recipes.json", "{\"recipes\": ");

        let mut loader = DataLoader::new(recipes, dir.path().join("missing.json"));
        assert!(matches!(loader.load_recipes(), Err(CookbookError::Json(_))));
    }

    #[test]
    fn test_missing_member_yields_empty_catalog() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let recipes = write(&dir, "recipes.json", "{\"something\": 1}");
        let ingredients = write(&dir, "ingredients.json", "[]");

        let mut loader = DataLoader::new(recipes, ingredients);
        let catalog = loader
            .load_catalog(&ImageTable::sulfur_wiki())
            .expect("load catalog");
        assert!(catalog.groups().is_empty());
        assert!(catalog.ingredients().is_empty());
    }

    #[test]
    fn test_paths_and_fresh_stats() {
        let loader = DataLoader::new(DEFAULT_RECIPES_PATH, DEFAULT_INGREDIENTS_PATH);
        assert_eq!(loader.recipes_path(), Path::new(DEFAULT_RECIPES_PATH));
        assert_eq!(loader.ingredients_path(), Path::new(DEFAULT_INGREDIENTS_PATH));
        assert_eq!(loader.stats(), LoaderStats::default());
    }
}
