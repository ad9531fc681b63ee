//! Configuration types for the rule set.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::HeirCategory;

/// Metadata about the rule set.
///
/// Identifies which school's rules the engine applies and which version of
/// the reference data is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetMetadata {
    /// Short code recorded on every result (e.g., "classical_sunni").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version of the reference data.
    pub version: String,
    /// A description of the rule set.
    pub description: String,
}

/// Reference data for one heir category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// English display name.
    pub name: String,
    /// Arabic display name.
    pub arabic_name: String,
    /// A description of who belongs to the category.
    pub description: String,
    /// The most members the category may have (e.g., 4 wives, 1 father).
    pub max_count: u32,
}

/// Heir catalogue file structure (heirs.yaml).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeirsConfig {
    /// Map of category code to category details.
    pub heirs: BTreeMap<String, CategoryConfig>,
}

/// Monetary rounding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonetarySettings {
    /// Decimal places for amounts.
    pub decimal_places: u32,
    /// Decimal places for percentages.
    pub percentage_decimal_places: u32,
    /// Largest remainder accepted without a warning.
    pub remainder_tolerance: Decimal,
}

impl Default for MonetarySettings {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            percentage_decimal_places: 4,
            remainder_tolerance: Decimal::new(10, 2),
        }
    }
}

/// Settings file structure (settings.yaml).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Monetary rounding settings.
    pub monetary: MonetarySettings,
}

/// The complete configuration loaded from YAML files.
///
/// Aggregates the rule-set metadata, the heir catalogue keyed by category
/// and the monetary settings. Built once and never modified.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: RuleSetMetadata,
    categories: BTreeMap<HeirCategory, CategoryConfig>,
    monetary: MonetarySettings,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: RuleSetMetadata,
        categories: BTreeMap<HeirCategory, CategoryConfig>,
        monetary: MonetarySettings,
    ) -> Self {
        Self {
            metadata,
            categories,
            monetary,
        }
    }

    /// Returns the rule-set metadata.
    pub fn rule_set(&self) -> &RuleSetMetadata {
        &self.metadata
    }

    /// Returns the heir catalogue.
    pub fn categories(&self) -> &BTreeMap<HeirCategory, CategoryConfig> {
        &self.categories
    }

    /// Returns the reference data for one category.
    pub fn category(&self, category: HeirCategory) -> Option<&CategoryConfig> {
        self.categories.get(&category)
    }

    /// Returns the monetary settings.
    pub fn monetary(&self) -> &MonetarySettings {
        &self.monetary
    }
}
