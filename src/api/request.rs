//! Request types for the Fara'id engine API.
//!
//! This module defines the JSON request structures for the `/calculate` endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{DeceasedInfo, Estate, Gender, Heir};

/// Request body for the `/calculate` endpoint.
///
/// Contains the deceased's gender, the selected heirs and the estate figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The deceased person.
    pub deceased: DeceasedRequest,
    /// The selected heirs, one entry per category.
    #[serde(default)]
    pub heirs: Vec<HeirRequest>,
    /// The estate figures.
    pub estate: EstateRequest,
}

/// Deceased information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeceasedRequest {
    /// Gender of the deceased.
    pub gender: Gender,
}

/// One heir selection in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeirRequest {
    /// The heir category code (e.g., "full_sister").
    pub category: String,
    /// Number of people in the category.
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Estate figures in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateRequest {
    /// Gross value of the estate.
    pub gross_value: Decimal,
    /// Outstanding debts.
    #[serde(default)]
    pub debts: Decimal,
    /// Funeral and burial costs.
    #[serde(default)]
    pub funeral_expenses: Decimal,
    /// Bequest requested in the will.
    #[serde(default)]
    pub requested_bequest: Decimal,
    /// Currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl CalculationRequest {
    /// Resolves the heir selections against the catalogue.
    ///
    /// Fails on the first unknown category code or out-of-range count.
    pub fn resolve_heirs(&self, config: &ConfigLoader) -> EngineResult<Vec<Heir>> {
        self.heirs
            .iter()
            .map(|heir| config.heir(&heir.category, heir.count))
            .collect()
    }
}

impl From<DeceasedRequest> for DeceasedInfo {
    fn from(req: DeceasedRequest) -> Self {
        DeceasedInfo::new(req.gender)
    }
}

impl From<EstateRequest> for Estate {
    fn from(req: EstateRequest) -> Self {
        Estate {
            gross_value: req.gross_value,
            debts: req.debts,
            funeral_expenses: req.funeral_expenses,
            requested_bequest: req.requested_bequest,
            currency: req.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::HeirCategory;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_calculation_request() {
        let json = r#"{
            "deceased": { "gender": "female" },
            "heirs": [
                { "category": "husband", "count": 1 },
                { "category": "daughter" }
            ],
            "estate": {
                "gross_value": "100000.00",
                "debts": "2500",
                "funeral_expenses": 1500,
                "requested_bequest": "10000",
                "currency": "GBP"
            }
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.deceased.gender, Gender::Female);
        assert_eq!(request.heirs.len(), 2);
        assert_eq!(request.heirs[1].count, 1);
        assert_eq!(request.estate.gross_value, dec("100000"));
        assert_eq!(request.estate.funeral_expenses, dec("1500"));
        assert_eq!(request.estate.currency, "GBP");
    }

    #[test]
    fn test_estate_defaults() {
        let json = r#"{
            "deceased": { "gender": "male" },
            "estate": { "gross_value": 5000 }
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert!(request.heirs.is_empty());

        let estate: Estate = request.estate.into();
        assert_eq!(estate.debts, Decimal::ZERO);
        assert_eq!(estate.requested_bequest, Decimal::ZERO);
        assert_eq!(estate.currency, "USD");
    }

    #[test]
    fn test_resolve_heirs_uses_catalogue() {
        let config = ConfigLoader::builtin().unwrap();
        let request = CalculationRequest {
            deceased: DeceasedRequest {
                gender: Gender::Male,
            },
            heirs: vec![HeirRequest {
                category: "Wife".to_string(),
                count: 3,
            }],
            estate: EstateRequest {
                gross_value: dec("1000"),
                debts: Decimal::ZERO,
                funeral_expenses: Decimal::ZERO,
                requested_bequest: Decimal::ZERO,
                currency: "USD".to_string(),
            },
        };

        let heirs = request.resolve_heirs(&config).unwrap();
        assert_eq!(heirs[0].category, HeirCategory::Wife);
        assert_eq!(heirs[0].count, 3);
    }

    #[test]
    fn test_resolve_heirs_rejects_unknown_category() {
        let config = ConfigLoader::builtin().unwrap();
        let mut request: CalculationRequest = serde_json::from_str(
            r#"{ "deceased": { "gender": "male" }, "estate": { "gross_value": 1 } }"#,
        )
        .unwrap();
        request.heirs.push(HeirRequest {
            category: "uncle".to_string(),
            count: 1,
        });

        assert!(matches!(
            request.resolve_heirs(&config),
            Err(EngineError::UnknownHeirCategory { .. })
        ));
    }
}
