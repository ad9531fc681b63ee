//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the rule-set
//! reference data from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Heir, HeirCategory};

use super::types::{
    CategoryConfig, EngineConfig, HeirsConfig, MonetarySettings, RuleSetMetadata, SettingsConfig,
};

const BUILTIN_RULE_SET: &str = include_str!("../../config/default/rule_set.yaml");
const BUILTIN_HEIRS: &str = include_str!("../../config/default/heirs.yaml");
const BUILTIN_SETTINGS: &str = include_str!("../../config/default/settings.yaml");

/// Loads and provides access to the rule-set reference data.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// provides methods to query the heir catalogue and monetary settings.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── rule_set.yaml   # Rule-set metadata
/// ├── heirs.yaml      # Heir catalogue: labels and maximum counts
/// └── settings.yaml   # Monetary rounding settings
/// ```
///
/// # Example
///
/// ```no_run
/// use faraid_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let wife = loader.get_category("wife").unwrap();
/// println!("{} ({}), at most {}", wife.name, wife.arabic_name, wife.max_count);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML or unknown fields
    /// - The heir catalogue does not list every category exactly once
    ///
    /// # Example
    ///
    /// ```no_run
    /// use faraid_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), faraid_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rule_set_path = path.join("rule_set.yaml");
        let metadata = Self::load_yaml::<RuleSetMetadata>(&rule_set_path)?;

        let heirs_path = path.join("heirs.yaml");
        let heirs = Self::load_yaml::<HeirsConfig>(&heirs_path)?;

        let settings_path = path.join("settings.yaml");
        let settings = Self::load_yaml::<SettingsConfig>(&settings_path)?;

        let categories = Self::validate_catalogue(heirs, &heirs_path.display().to_string())?;

        Ok(Self {
            config: EngineConfig::new(metadata, categories, settings.monetary),
        })
    }

    /// Loads the default configuration embedded in the binary.
    ///
    /// # Example
    ///
    /// ```
    /// use faraid_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// assert_eq!(loader.monetary().decimal_places, 2);
    /// assert_eq!(loader.get_category("wife").unwrap().max_count, 4);
    /// ```
    pub fn builtin() -> EngineResult<Self> {
        let metadata = Self::parse_yaml::<RuleSetMetadata>(BUILTIN_RULE_SET, "builtin:rule_set.yaml")?;
        let heirs = Self::parse_yaml::<HeirsConfig>(BUILTIN_HEIRS, "builtin:heirs.yaml")?;
        let settings = Self::parse_yaml::<SettingsConfig>(BUILTIN_SETTINGS, "builtin:settings.yaml")?;
        let categories = Self::validate_catalogue(heirs, "builtin:heirs.yaml")?;

        Ok(Self {
            config: EngineConfig::new(metadata, categories, settings.monetary),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Keys the catalogue by category, requiring every category exactly once.
    fn validate_catalogue(
        heirs: HeirsConfig,
        path: &str,
    ) -> EngineResult<BTreeMap<HeirCategory, CategoryConfig>> {
        let parse_error = |message: String| EngineError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        let mut categories = BTreeMap::new();
        for (code, entry) in heirs.heirs {
            let category: HeirCategory = code
                .parse()
                .map_err(|_| parse_error(format!("unknown heir category '{}'", code)))?;
            if entry.max_count == 0 {
                return Err(parse_error(format!("max_count for '{}' must be at least 1", code)));
            }
            if categories.insert(category, entry).is_some() {
                return Err(parse_error(format!("heir category '{}' is listed twice", code)));
            }
        }

        let missing: Vec<&str> = HeirCategory::ALL
            .iter()
            .filter(|c| !categories.contains_key(*c))
            .map(|c| c.code())
            .collect();
        if !missing.is_empty() {
            return Err(parse_error(format!(
                "missing heir categories: {}",
                missing.join(", ")
            )));
        }

        Ok(categories)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the rule-set metadata.
    pub fn rule_set(&self) -> &RuleSetMetadata {
        self.config.rule_set()
    }

    /// Returns the monetary settings.
    pub fn monetary(&self) -> &MonetarySettings {
        self.config.monetary()
    }

    /// Gets a category's reference data by its code.
    ///
    /// # Arguments
    ///
    /// * `code` - The category code (e.g., "full_sister")
    ///
    /// # Returns
    ///
    /// Returns the category details if found, or `UnknownHeirCategory` error.
    pub fn get_category(&self, code: &str) -> EngineResult<&CategoryConfig> {
        let category: HeirCategory = code.parse()?;
        self.category(category)
    }

    /// Gets a category's reference data.
    pub fn category(&self, category: HeirCategory) -> EngineResult<&CategoryConfig> {
        self.config
            .category(category)
            .ok_or_else(|| EngineError::UnknownHeirCategory {
                code: category.code().to_string(),
            })
    }

    /// Builds a labelled [`Heir`] from a category code and head count.
    ///
    /// # Arguments
    ///
    /// * `code` - The category code
    /// * `count` - Number of people in the category
    ///
    /// # Returns
    ///
    /// Returns the heir, or an error if:
    /// - The code is not a known category (`UnknownHeirCategory`)
    /// - The count is zero or above the category's `max_count` (`InvalidHeir`)
    ///
    /// # Example
    ///
    /// ```
    /// use faraid_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin()?;
    /// let wives = loader.heir("wife", 2)?;
    /// assert_eq!(wives.count, 2);
    /// assert!(loader.heir("wife", 5).is_err());
    /// # Ok::<(), faraid_engine::error::EngineError>(())
    /// ```
    pub fn heir(&self, code: &str, count: u32) -> EngineResult<Heir> {
        let category: HeirCategory = code.parse()?;
        let entry = self.category(category)?;

        if count == 0 {
            return Err(EngineError::InvalidHeir {
                category: category.code().to_string(),
                message: "count must be at least 1".to_string(),
            });
        }
        if count > entry.max_count {
            return Err(EngineError::InvalidHeir {
                category: category.code().to_string(),
                message: format!("count {} exceeds the maximum of {}", count, entry.max_count),
            });
        }

        Ok(Heir::new(category, count)
            .with_labels(entry.name.clone(), Some(entry.arabic_name.clone())))
    }
}
