//! Inheritance result models for the Fara'id engine.
//!
//! This module contains the [`InheritanceResult`] type and its associated
//! structures that capture every output of one distribution: per-heir shares,
//! excluded heirs, totals, adjustment flags and a complete audit trace.

use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::Fraction;
use crate::error::EngineResult;

use super::{Estate, Heir, HeirCategory};

/// How an heir's share was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareBasis {
    /// A Qur'anic fixed fraction only.
    Fixed,
    /// A portion of the residue only.
    Residuary,
    /// A fixed fraction plus the residue (father or grandfather alongside
    /// female descendants only).
    FixedAndResiduary,
}

/// The share received by one heir category.
///
/// When `is_per_person` is true, `fraction` is the share of a single member
/// and must be multiplied by `heir.count` for the category total; otherwise
/// it is already the category total.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::Fraction;
/// use faraid_engine::models::{Heir, HeirCategory, HeirShare, ShareBasis};
/// use rust_decimal::Decimal;
///
/// let share = HeirShare {
///     heir: Heir::new(HeirCategory::Son, 2),
///     fraction: Fraction::reduce(7, 16).unwrap(),
///     is_per_person: true,
///     basis: ShareBasis::Residuary,
///     amount: Decimal::from(875),
///     amount_per_person: Decimal::new(4375, 1),
///     percentage: Decimal::new(875, 1),
///     explanation: "Residuary".to_string(),
/// };
/// assert_eq!(share.total_fraction().to_string(), "7/8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeirShare {
    /// The heir category receiving the share.
    pub heir: Heir,
    /// The exact share, per person or per category (see `is_per_person`).
    pub fraction: Fraction,
    /// Whether `fraction` is the share of one member of the category.
    pub is_per_person: bool,
    /// How the share was obtained.
    pub basis: ShareBasis,
    /// Monetary amount for the whole category.
    pub amount: Decimal,
    /// Monetary amount for each member of the category.
    pub amount_per_person: Decimal,
    /// Category total as a percentage of the net estate.
    pub percentage: Decimal,
    /// Human-readable explanation of the rules applied.
    pub explanation: String,
}

impl HeirShare {
    /// The share of the whole category.
    pub fn total_fraction(&self) -> Fraction {
        if self.is_per_person {
            self.fraction.mul_int(self.heir.count)
        } else {
            self.fraction.clone()
        }
    }

    /// The share of a single member of the category.
    pub fn per_person_fraction(&self) -> EngineResult<Fraction> {
        if self.is_per_person {
            Ok(self.fraction.clone())
        } else {
            self.fraction.div_int(self.heir.count)
        }
    }
}

/// An heir category excluded entirely because a closer relative is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedHeir {
    /// The excluded heir category.
    pub heir: Heir,
    /// The category whose presence causes the exclusion.
    pub blocked_by: HeirCategory,
    /// Human-readable reason.
    pub reason: String,
}

/// A single step in the audit trace recording a rule decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The Qur'anic verse or classical rule the step relies on.
    pub reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete, immutable output of one distribution.
///
/// Contains everything a presentation layer needs to render or export a
/// distribution report without re-deriving any rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceResult {
    /// Code of the rule set that produced the result.
    pub rule_set: String,
    /// The estate as supplied.
    pub estate: Estate,
    /// Gross value less debts and funeral expenses.
    pub deduction_base: Decimal,
    /// The bequest actually deducted (after the one-third cap).
    pub bequest: Decimal,
    /// The estate distributed among the heirs.
    pub net_estate: Decimal,
    /// One entry per inheriting heir category.
    pub heir_shares: Vec<HeirShare>,
    /// One entry per excluded heir category.
    pub blocked_heirs: Vec<BlockedHeir>,
    /// Sum of all share amounts.
    pub total_distributed: Decimal,
    /// `net_estate - total_distributed`; rounding dust in a correct run.
    pub remainder: Decimal,
    /// Least common multiple of the denominators of every `fraction` in
    /// `heir_shares`.
    #[serde(with = "bigint_string")]
    pub common_denominator: BigInt,
    /// Whether fixed shares were scaled down (awl).
    pub awl_applied: bool,
    /// Whether a surplus was returned to the heirs (radd).
    pub radd_applied: bool,
    /// Human-readable notes about the distribution.
    pub notes: Vec<String>,
    /// Every rule decision taken.
    pub audit_trace: AuditTrace,
}

impl InheritanceResult {
    /// Returns the share for `category`, if it inherits.
    pub fn share_for(&self, category: HeirCategory) -> Option<&HeirShare> {
        self.heir_shares
            .iter()
            .find(|share| share.heir.category == category)
    }

    /// Returns the exclusion record for `category`, if it was blocked.
    pub fn blocked(&self, category: HeirCategory) -> Option<&BlockedHeir> {
        self.blocked_heirs
            .iter()
            .find(|blocked| blocked.heir.category == category)
    }

    /// Sum of every category's total fraction.
    pub fn total_fraction(&self) -> Fraction {
        self.heir_shares.iter().map(HeirShare::total_fraction).sum()
    }
}

/// Serializes big integers as decimal strings.
mod bigint_string {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
