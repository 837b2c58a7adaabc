//! Application configuration loading from config.toml
//!
//! This module loads the tracker settings: where the database lives, which view the
//! items table opens with, and the item types offered to a user who has not defined
//! any yet.

use crate::{
    core::{
        filter::{ItemFilter, StatusFilter},
        sort::SortColumn,
        table::ViewParams,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    #[serde(default)]
    pub database_url: Option<String>,
    /// Initial table view
    #[serde(default)]
    pub view: ViewConfig,
    /// Types seeded for a user with an empty vocabulary
    #[serde(default = "default_item_types")]
    pub item_types: Vec<String>,
}

/// Sort direction as written in the config file
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

/// Initial table view settings
#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Column name, validated by [`AppConfig::default_view`]
    #[serde(default = "default_sort_column")]
    pub sort_column: String,
    /// Sort direction
    #[serde(default)]
    pub order: SortOrder,
    /// Optional status filter (`sold`, `on-sale`, `to-sell`)
    #[serde(default)]
    pub status: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort_column: default_sort_column(),
            order: SortOrder::default(),
            status: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            view: ViewConfig::default(),
            item_types: default_item_types(),
        }
    }
}

fn default_sort_column() -> String {
    "purchaseDate".to_string()
}

fn default_item_types() -> Vec<String> {
    vec!["Jeu".to_string(), "Livre".to_string(), "Autre".to_string()]
}

impl AppConfig {
    /// Builds the initial view parameters from the `[view]` section.
    ///
    /// # Errors
    /// Returns `UnknownColumn` or `UnknownStatus` when the config names a column or
    /// status that does not exist.
    pub fn default_view(&self) -> Result<ViewParams> {
        let column: SortColumn = self.view.sort_column.parse()?;
        let status = self
            .view
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()?;

        Ok(ViewParams {
            filter: ItemFilter::default(),
            status,
            column,
            reverse: self.view.order == SortOrder::Desc,
        })
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}
