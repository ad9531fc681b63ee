//! Configuration loading and management for the Fara'id engine.
//!
//! This module provides functionality to load the rule-set reference data
//! from YAML files: rule-set metadata, the heir catalogue (labels and
//! maximum counts) and monetary rounding settings. The same files are also
//! embedded at compile time and available through [`ConfigLoader::builtin`].
//!
//! # Example
//!
//! ```no_run
//! use faraid_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded rule set: {}", config.rule_set().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CategoryConfig, EngineConfig, HeirsConfig, MonetarySettings, RuleSetMetadata, SettingsConfig,
};
