//! Cookbook configuration.
//!
//! Provides data locations, browsing limits and image overrides.
//! Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cookbook_core::{EffectScope, ImageTable, ViewOptions, DEFAULT_IMAGE_BASE_URL};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::loader::{DEFAULT_INGREDIENTS_PATH, DEFAULT_RECIPES_PATH};

/// Configuration file name.
const CONFIG_FILE: &str = "cookbook.toml";

/// Cookbook configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookbookConfig {
    // === Data Settings ===
    /// Scraped recipes document
    pub recipes_path: PathBuf,
    /// Scraped ingredients document
    pub ingredients_path: PathBuf,

    // === Browsing Settings ===
    /// Grouped items per page (1-100)
    pub page_size: usize,
    /// Quick filters shown before "show all" (1-200)
    pub popular_limit: usize,
    /// Variations inspected by the effect filter
    pub effect_scope: EffectScope,

    // === Image Settings ===
    /// Image URL overrides
    pub images: ImageConfig,
}

impl Default for CookbookConfig {
    fn default() -> Self {
        let view = ViewOptions::default();
        Self {
            // Data
            recipes_path: PathBuf::from(DEFAULT_RECIPES_PATH),
            ingredients_path: PathBuf::from(DEFAULT_INGREDIENTS_PATH),

            // Browsing
            page_size: view.page_size,
            popular_limit: view.popular_limit,
            effect_scope: EffectScope::default(),

            // Images
            images: ImageConfig::default(),
        }
    }
}

/// `[images]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base URL for synthesized image URLs
    pub base_url: String,
    /// Drop the built-in known table before applying `known`
    pub replace_defaults: bool,
    /// Name to URL overrides
    pub known: IndexMap<String, String>,
    /// "Any X" name to concrete items
    pub any_categories: IndexMap<String, Vec<String>>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            replace_defaults: false,
            known: IndexMap::new(),
            any_categories: IndexMap::new(),
        }
    }
}

impl ImageConfig {
    /// Builds the image table these settings describe.
    #[must_use]
    pub fn to_table(&self) -> ImageTable {
        let mut table = if self.replace_defaults {
            ImageTable::new(self.base_url.as_str())
        } else {
            ImageTable::sulfur_wiki().with_base_url(&self.base_url)
        };
        table.extend_known(self.known.clone());
        table.extend_any_categories(self.any_categories.clone());
        table
    }
}

impl CookbookConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("cookbook").join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.page_size = self.page_size.clamp(1, 100);
        self.popular_limit = self.popular_limit.clamp(1, 200);
    }

    /// View limits for the browser.
    #[must_use]
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            page_size: self.page_size,
            popular_limit: self.popular_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CookbookConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.popular_limit, 12);
        assert_eq!(config.effect_scope, EffectScope::PrimaryRecipe);
        assert_eq!(config.recipes_path, PathBuf::from("data/recipes.json"));
        assert_eq!(config.images.base_url, DEFAULT_IMAGE_BASE_URL);
    }

    #[test]
    fn test_config_validation() {
        let mut config = CookbookConfig::default();
        config.page_size = 0;
        config.popular_limit = 5000;

        config.validate();

        assert_eq!(config.page_size, 1);
        assert_eq!(config.popular_limit, 200);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("cookbook.toml");

        let mut config = CookbookConfig::default();
        config.page_size = 25;
        config.effect_scope = EffectScope::AnyVariation;
        config
            .images
            .known
            .insert("Flour".to_string(), "https://img.test/flour.png".to_string());
        config
            .images
            .any_categories
            .insert("Any Fish".to_string(), vec!["Carp".to_string(), "Pike".to_string()]);

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = CookbookConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = CookbookConfig::load_from("/nonexistent/path/cookbook.toml");
        assert_eq!(config, CookbookConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("cookbook.toml");
        fs::write(&config_path, "page_size = [not toml").expect("write");

        let config = CookbookConfig::load_from(&config_path);
        assert_eq!(config, CookbookConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CookbookConfig = toml::from_str(
            r#"
            page_size = 5
            effect_scope = "any_variation"

            [images]
            base_url = "https://mirror.test/img/"
            "#,
        )
        .expect("parse");

        assert_eq!(config.page_size, 5);
        assert_eq!(config.popular_limit, 12);
        assert_eq!(config.effect_scope, EffectScope::AnyVariation);
        assert!(!config.images.replace_defaults);

        let table = config.images.to_table();
        assert_eq!(table.resolve("New Thing"), "https://mirror.test/img/New_Thing.png");
    }

    #[test]
    fn test_effect_scope_spelling() {
        let config: CookbookConfig = toml::from_str(r#"effect_scope = "primary""#).expect("parse");
        assert_eq!(config.effect_scope, EffectScope::PrimaryRecipe);

        let text = toml::to_string_pretty(&CookbookConfig::default()).expect("serialize");
        assert!(text.contains(r#"effect_scope = "primary""#));
    }

    #[test]
    fn test_replace_defaults_drops_builtin_table() {
        let mut images = ImageConfig::default();
        images.replace_defaults = true;
        images
            .known
            .insert("Flour".to_string(), "https://img.test/flour.png".to_string());

        let table = images.to_table();
        assert_eq!(table.known_len(), 1);
        assert_eq!(table.resolve("Flour"), "https://img.test/flour.png");
        assert_eq!(table.any_category("Any Milk"), None);
    }
}
