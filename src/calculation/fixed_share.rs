//! Fixed-share (fard) assignment.
//!
//! Each eligible heir category receives its Qur'anic fraction from a small
//! decision table keyed on who else is present: whether the deceased left
//! descendants, how many siblings there are, and how many members the
//! category itself has. Categories without a fixed fraction are marked as
//! residuary candidates and receive a zero fixed share here.
//!
//! Fractions are always recorded as the total for the whole category.

use crate::error::EngineResult;
use crate::models::{AuditStep, Heir, HeirCategory, ShareBasis};

use super::context::FamilyContext;
use super::fraction::Fraction;

/// An heir's share as it moves through the pipeline.
///
/// Every fraction held here is a category total; splitting per person only
/// happens when the final result is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDraft {
    /// The heir category.
    pub heir: Heir,
    /// The fixed fraction assigned to the category (zero if none).
    pub fixed: Fraction,
    /// The category's current total share.
    pub total: Fraction,
    /// Whether the category may take the residue.
    pub residuary: bool,
    /// Whether the category received part of the residue.
    pub received_residue: bool,
    /// Whether the final fraction is reported per person.
    pub per_person: bool,
    /// Explanations accumulated by each stage.
    pub explanation: Vec<String>,
}

impl ShareDraft {
    /// How the share was obtained.
    pub fn basis(&self) -> ShareBasis {
        match (self.fixed.is_positive(), self.received_residue) {
            (true, true) => ShareBasis::FixedAndResiduary,
            (true, false) => ShareBasis::Fixed,
            (false, _) => ShareBasis::Residuary,
        }
    }

    /// Returns true for husband and wife, who never receive radd.
    pub fn is_spouse(&self) -> bool {
        self.heir.category.is_spouse()
    }
}

/// The fixed-share decision for one heir category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedShareRule {
    /// The fixed fraction for the whole category (zero if none).
    pub fraction: Fraction,
    /// Whether the category may also take the residue.
    pub residuary: bool,
    /// Whether the final fraction is reported per person.
    pub per_person: bool,
    /// Human-readable explanation of the decision.
    pub explanation: String,
    /// The verse or rule the decision relies on.
    pub reference: &'static str,
}

impl FixedShareRule {
    fn fixed(fraction: Fraction, explanation: impl Into<String>, reference: &'static str) -> Self {
        Self {
            fraction,
            residuary: false,
            per_person: false,
            explanation: explanation.into(),
            reference,
        }
    }

    fn residuary(explanation: impl Into<String>, reference: &'static str) -> Self {
        Self {
            fraction: Fraction::zero(),
            residuary: true,
            per_person: true,
            explanation: explanation.into(),
            reference,
        }
    }

    fn fixed_and_residuary(
        fraction: Fraction,
        explanation: impl Into<String>,
        reference: &'static str,
    ) -> Self {
        Self {
            fraction,
            residuary: true,
            per_person: false,
            explanation: explanation.into(),
            reference,
        }
    }
}

const NISA_11: &str = "An-Nisa 4:11";
const NISA_12: &str = "An-Nisa 4:12";
const NISA_176: &str = "An-Nisa 4:176";
const GRANDMOTHER_REF: &str = "Sunnah (report of al-Mughira ibn Shu'ba); consensus";
const ASABA_REF: &str = "Hadith: give the shares to those entitled, the rest to the nearest male";

/// Half for one, two-thirds pooled for two or more: the rule shared by
/// daughters, son's daughters, full sisters and paternal half-sisters.
fn half_or_two_thirds(heir: &Heir, reference: &'static str) -> FixedShareRule {
    if heir.count == 1 {
        FixedShareRule::fixed(
            Fraction::half(),
            format!("A single {} takes 1/2", heir.category.to_string().to_lowercase()),
            reference,
        )
    } else {
        FixedShareRule::fixed(
            Fraction::two_thirds(),
            format!(
                "{} {}s share 2/3 equally",
                heir.count,
                heir.category.to_string().to_lowercase()
            ),
            reference,
        )
    }
}

/// Father and grandfather: 1/6 with a male descendant, 1/6 plus the residue
/// with female descendants only, the residue alone otherwise.
fn ascendant_male(heir: &Heir, context: &FamilyContext) -> FixedShareRule {
    let name = heir.category.to_string();
    if context.has_male_descendant() {
        FixedShareRule::fixed(
            Fraction::sixth(),
            format!("{} takes 1/6 because the deceased left a male descendant", name),
            NISA_11,
        )
    } else if context.has_female_descendant() {
        FixedShareRule::fixed_and_residuary(
            Fraction::sixth(),
            format!(
                "{} takes 1/6 and is residuary because the deceased left only female descendants",
                name
            ),
            NISA_11,
        )
    } else {
        FixedShareRule::residuary(
            format!("{} is residuary because the deceased left no descendant", name),
            ASABA_REF,
        )
    }
}

/// Looks up the fixed share of one eligible heir category.
///
/// # Arguments
///
/// * `heir` - The heir category (already known not to be blocked)
/// * `context` - Presence predicates over the original heir selection
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{FamilyContext, Fraction, fixed_share_rule};
/// use faraid_engine::models::{Heir, HeirCategory};
///
/// let heirs = vec![Heir::new(HeirCategory::Husband, 1), Heir::new(HeirCategory::Daughter, 1)];
/// let context = FamilyContext::new(&heirs);
///
/// let husband = fixed_share_rule(&heirs[0], &context).unwrap();
/// assert_eq!(husband.fraction, Fraction::quarter());
///
/// let daughter = fixed_share_rule(&heirs[1], &context).unwrap();
/// assert_eq!(daughter.fraction, Fraction::half());
/// ```
pub fn fixed_share_rule(heir: &Heir, context: &FamilyContext) -> EngineResult<FixedShareRule> {
    let rule = match heir.category {
        HeirCategory::Husband => {
            if context.has_descendant() {
                FixedShareRule::fixed(
                    Fraction::quarter(),
                    "Husband takes 1/4 because the deceased left descendants",
                    NISA_12,
                )
            } else {
                FixedShareRule::fixed(
                    Fraction::half(),
                    "Husband takes 1/2 because the deceased left no descendant",
                    NISA_12,
                )
            }
        }
        HeirCategory::Wife => {
            let (fraction, reason) = if context.has_descendant() {
                (Fraction::eighth(), "because the deceased left descendants")
            } else {
                (Fraction::quarter(), "because the deceased left no descendant")
            };
            let who = if heir.count == 1 {
                "Wife takes".to_string()
            } else {
                format!("{} wives share equally", heir.count)
            };
            FixedShareRule::fixed(fraction.clone(), format!("{} {} {}", who, fraction, reason), NISA_12)
        }
        HeirCategory::Father | HeirCategory::Grandfather => ascendant_male(heir, context),
        HeirCategory::Mother => {
            if context.has_descendant() {
                FixedShareRule::fixed(
                    Fraction::sixth(),
                    "Mother takes 1/6 because the deceased left descendants",
                    NISA_11,
                )
            } else if context.sibling_count() >= 2 {
                FixedShareRule::fixed(
                    Fraction::sixth(),
                    format!(
                        "Mother takes 1/6 because the deceased left {} siblings",
                        context.sibling_count()
                    ),
                    NISA_11,
                )
            } else {
                FixedShareRule::fixed(
                    Fraction::third(),
                    "Mother takes 1/3: no descendant and fewer than two siblings",
                    NISA_11,
                )
            }
        }
        HeirCategory::Grandmother => FixedShareRule::fixed(
            Fraction::sixth(),
            if heir.count == 1 {
                "Grandmother takes 1/6".to_string()
            } else {
                format!("{} grandmothers share 1/6 equally", heir.count)
            },
            GRANDMOTHER_REF,
        ),
        HeirCategory::Son => FixedShareRule::residuary(
            "Son is residuary and takes the remainder, twice the share of a daughter",
            NISA_11,
        ),
        HeirCategory::Daughter => {
            if context.has(HeirCategory::Son) {
                FixedShareRule::residuary(
                    "Daughter is residuary alongside a son, half the share of a son",
                    NISA_11,
                )
            } else {
                half_or_two_thirds(heir, NISA_11)
            }
        }
        HeirCategory::Grandson => FixedShareRule::residuary(
            "Son's son is residuary and takes the remainder",
            ASABA_REF,
        ),
        HeirCategory::Granddaughter => {
            let daughters = context.count(HeirCategory::Daughter);
            if context.has(HeirCategory::Grandson) {
                FixedShareRule::residuary(
                    "Son's daughter is residuary alongside a son's son, half the share of a son's son",
                    NISA_11,
                )
            } else if daughters >= 2 {
                // Only reachable when called directly: `blocking_rule` excludes
                // her first in a full calculation.
                FixedShareRule::fixed(
                    Fraction::zero(),
                    "Son's daughter takes nothing: the daughters exhaust the two-thirds",
                    NISA_11,
                )
            } else if daughters == 1 {
                FixedShareRule::fixed(
                    Fraction::sixth(),
                    "Son's daughter takes 1/6 to complete the two-thirds with the single daughter",
                    NISA_11,
                )
            } else {
                half_or_two_thirds(heir, NISA_11)
            }
        }
        HeirCategory::FullBrother => FixedShareRule::residuary(
            "Full brother is residuary and takes the remainder",
            NISA_176,
        ),
        HeirCategory::FullSister => {
            if context.has(HeirCategory::FullBrother) {
                FixedShareRule::residuary(
                    "Full sister is residuary alongside a full brother, half the share of a brother",
                    NISA_176,
                )
            } else {
                half_or_two_thirds(heir, NISA_176)
            }
        }
        HeirCategory::PaternalHalfBrother => FixedShareRule::residuary(
            "Paternal half-brother is residuary and takes the remainder",
            NISA_176,
        ),
        HeirCategory::PaternalHalfSister => {
            let full_sisters = context.count(HeirCategory::FullSister);
            if context.has(HeirCategory::PaternalHalfBrother) {
                FixedShareRule::residuary(
                    "Paternal half-sister is residuary alongside a paternal half-brother",
                    NISA_176,
                )
            } else if full_sisters >= 2 {
                // Only reachable when called directly: `blocking_rule` excludes
                // her first in a full calculation.
                FixedShareRule::fixed(
                    Fraction::zero(),
                    "Paternal half-sister takes nothing: the full sisters exhaust the two-thirds",
                    NISA_176,
                )
            } else if full_sisters == 1 {
                FixedShareRule::fixed(
                    Fraction::sixth(),
                    "Paternal half-sister takes 1/6 to complete the two-thirds with the full sister",
                    NISA_176,
                )
            } else {
                half_or_two_thirds(heir, NISA_176)
            }
        }
        HeirCategory::MaternalHalfBrother | HeirCategory::MaternalHalfSister => {
            let heads = context.maternal_sibling_count().max(heir.count);
            let pooled = if heads == 1 {
                Fraction::sixth()
            } else {
                Fraction::third()
            };
            let explanation = if heads == 1 {
                format!("A single maternal half-sibling takes {}", pooled)
            } else {
                format!(
                    "{} maternal half-siblings share {} equally per head regardless of gender",
                    heads, pooled
                )
            };
            FixedShareRule {
                fraction: pooled.mul_int(heir.count).div_int(heads)?,
                residuary: false,
                per_person: true,
                explanation,
                reference: NISA_12,
            }
        }
    };

    Ok(rule)
}

/// The fixed shares of every eligible heir.
#[derive(Debug, Clone)]
pub struct FixedShareAssignment {
    /// One draft per eligible heir, in input order.
    pub drafts: Vec<ShareDraft>,
    /// Sum of all fixed fractions.
    pub fixed_total: Fraction,
    /// One audit step per heir.
    pub audit_steps: Vec<AuditStep>,
}

/// Assigns fixed shares to every eligible heir.
///
/// # Arguments
///
/// * `active` - Heirs that survived blocking resolution
/// * `context` - Presence predicates over the original heir selection
/// * `step_number_start` - The starting step number for audit trail sequencing
pub fn assign_fixed_shares(
    active: &[Heir],
    context: &FamilyContext,
    step_number_start: u32,
) -> EngineResult<FixedShareAssignment> {
    let mut drafts = Vec::with_capacity(active.len());
    let mut audit_steps = Vec::with_capacity(active.len());
    let mut step_number = step_number_start;

    for heir in active {
        let rule = fixed_share_rule(heir, context)?;

        audit_steps.push(AuditStep {
            step_number,
            rule_id: format!("fixed_share_{}", heir.category.code()),
            rule_name: format!("Fixed Share: {}", heir.category),
            reference: rule.reference.to_string(),
            input: serde_json::json!({
                "category": heir.category.code(),
                "count": heir.count,
                "has_descendant": context.has_descendant(),
                "has_male_descendant": context.has_male_descendant(),
                "sibling_count": context.sibling_count()
            }),
            output: serde_json::json!({
                "fraction": rule.fraction.to_string(),
                "residuary": rule.residuary
            }),
            reasoning: rule.explanation.clone(),
        });
        step_number += 1;

        drafts.push(ShareDraft {
            heir: heir.clone(),
            fixed: rule.fraction.clone(),
            total: rule.fraction,
            residuary: rule.residuary,
            received_residue: false,
            per_person: rule.per_person,
            explanation: vec![rule.explanation],
        });
    }

    let fixed_total = drafts.iter().map(|d| &d.fixed).sum();

    Ok(FixedShareAssignment {
        drafts,
        fixed_total,
        audit_steps,
    })
}
