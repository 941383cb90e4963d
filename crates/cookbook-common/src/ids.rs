//! Identifier types for recipes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one recipe variation.
///
/// Built from a slug of the recipe name, suffixed with `-v{index}` when the
/// scraped record lists variations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    /// Creates a recipe ID for a named recipe.
    ///
    /// `variation` is the zero-based index of the variation, or `None` when the
    /// record has no variation list.
    #[must_use]
    pub fn for_recipe(name: &str, variation: Option<usize>) -> Self {
        let slug = slugify(name);
        match variation {
            Some(index) => Self(format!("{slug}-v{index}")),
            None => Self(slug),
        }
    }

    /// Creates a recipe ID from a raw value (for deserialization and tests).
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns a copy of this ID with a numeric disambiguator appended.
    #[must_use]
    pub fn disambiguated(&self, n: usize) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecipeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercases a name, turns whitespace runs into hyphens and drops every
/// character outside `[a-z0-9-]`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut in_whitespace = false;

    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}
