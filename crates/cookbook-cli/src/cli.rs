//! CLI argument parsing using clap

use std::path::PathBuf;

use clap::Parser;
use cookbook_core::{
    category_for_label, BrowserEvent, BrowserState, EffectScope, HealthSortMode, SortDirection,
    SortField, SortSpec, KNOWN_CATEGORIES,
};

/// cookbook - Sulfur crafting recipe browser
///
/// Loads the scraped recipe and ingredient documents, runs one query and
/// prints a page of grouped items.
#[derive(Parser, Debug)]
#[command(name = "cookbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scraped recipes document
    #[arg(long)]
    pub recipes: Option<PathBuf>,

    /// Scraped ingredients document
    #[arg(long)]
    pub ingredients: Option<PathBuf>,

    /// Free-text search over names, ingredients and effects
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category key or label (repeatable, OR'd)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Required ingredient (repeatable, AND'd)
    #[arg(short, long = "ingredient")]
    pub ingredients_filter: Vec<String>,

    /// Required effect (repeatable, AND'd)
    #[arg(short, long = "effect")]
    pub effects: Vec<String>,

    /// Sort column
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort descending (plain columns)
    #[arg(long)]
    pub desc: bool,

    /// HP/DMG column mode
    #[arg(long, value_enum, default_value_t = HealthModeArg::HpDesc)]
    pub health_mode: HealthModeArg,

    /// Page number (clamped to the available pages)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Expand a grouped item to list its variations (repeatable)
    #[arg(long)]
    pub expand: Vec<String>,

    /// Match effects on any variation instead of the primary recipe
    #[arg(long)]
    pub any_variation_effects: bool,

    /// Print the ingredient and effect quick filters
    #[arg(long)]
    pub vocab: bool,

    /// Show every quick filter instead of the most popular
    #[arg(long)]
    pub show_all: bool,

    /// Emit JSON instead of a text table
    #[arg(long)]
    pub json: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortArg {
    /// Group name
    #[default]
    Name,
    /// Category
    Type,
    /// HP/DMG column (see --health-mode)
    Health,
    /// Effect duration
    Duration,
    /// Ingredient count of the primary recipe
    Difficulty,
    /// Health per second
    Hps,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Type => Self::Type,
            SortArg::Health => Self::Health,
            SortArg::Duration => Self::Duration,
            SortArg::Difficulty => Self::Difficulty,
            SortArg::Hps => Self::Hps,
        }
    }
}

/// HP/DMG column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HealthModeArg {
    /// Healing first, highest first
    #[default]
    HpDesc,
    /// Healing first, lowest first
    HpAsc,
    /// Damage first, highest first
    DmgDesc,
    /// Damage first, lowest first
    DmgAsc,
}

impl From<HealthModeArg> for HealthSortMode {
    fn from(arg: HealthModeArg) -> Self {
        match arg {
            HealthModeArg::HpDesc => Self::HpDesc,
            HealthModeArg::HpAsc => Self::HpAsc,
            HealthModeArg::DmgDesc => Self::DmgDesc,
            HealthModeArg::DmgAsc => Self::DmgAsc,
        }
    }
}

/// Maps a filter label or badge label to its key; anything else is a key.
fn category_key(arg: &str) -> String {
    category_for_label(arg)
        .or_else(|| {
            KNOWN_CATEGORIES
                .iter()
                .find(|c| c.badge_label == arg)
                .map(|c| c.key)
        })
        .unwrap_or(arg)
        .to_string()
}

impl Cli {
    /// Sort state described by `--sort`, `--desc` and `--health-mode`.
    #[must_use]
    pub fn sort_spec(&self) -> SortSpec {
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        SortSpec::new(self.sort.unwrap_or_default().into(), direction)
            .with_health_mode(self.health_mode.into())
    }

    /// Effect scope, with `--any-variation-effects` overriding `configured`.
    #[must_use]
    pub fn effect_scope(&self, configured: EffectScope) -> EffectScope {
        if self.any_variation_effects {
            EffectScope::AnyVariation
        } else {
            configured
        }
    }

    /// Replays the flags as browser events.
    #[must_use]
    pub fn browser_state(&self, scope: EffectScope) -> BrowserState {
        let mut events = Vec::new();

        if let Some(search) = &self.search {
            events.push(BrowserEvent::Search(search.clone()));
        }
        events.extend(
            self.categories
                .iter()
                .map(|c| BrowserEvent::AddCategory(category_key(c))),
        );

        let mut state = BrowserState::new()
            .with_effect_scope(scope)
            .with_sort(self.sort_spec())
            .apply_all(events);

        // Repeated names must not toggle a filter back off
        for name in &self.ingredients_filter {
            if !state.ingredient_filters().contains(name) {
                state = state.apply(BrowserEvent::ToggleIngredient(name.clone()));
            }
        }
        for name in &self.effects {
            if !state.effect_filters().contains(name) {
                state = state.apply(BrowserEvent::ToggleEffect(name.clone()));
            }
        }
        for name in &self.expand {
            if !state.is_expanded(name) {
                state = state.apply(BrowserEvent::ToggleExpanded(name.clone()));
            }
        }

        if self.show_all {
            state = state.apply_all([
                BrowserEvent::ShowAllIngredients(true),
                BrowserEvent::ShowAllEffects(true),
            ]);
        }

        state.apply(BrowserEvent::GoToPage(self.page))
    }
}
