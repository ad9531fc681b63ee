//! Awl and radd adjustment.
//!
//! When no residuary group absorbed the residue, the fixed shares may not
//! add up to the whole estate. Over-subscription is corrected by awl, which
//! divides every share by the total. Under-subscription is corrected by
//! radd, which returns the surplus to the non-spousal heirs in proportion
//! to their existing shares.

use tracing::debug;

use crate::error::EngineResult;
use crate::models::AuditStep;

use super::fixed_share::ShareDraft;
use super::fraction::Fraction;

/// The correction applied to the shares, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// Shares already sum to one (or there is nobody to adjust).
    None,
    /// Every share was divided by `total`.
    Awl {
        /// The over-subscribed total before scaling.
        total: Fraction,
    },
    /// `surplus` was returned to the heirs.
    Radd {
        /// The undistributed part of the estate before redistribution.
        surplus: Fraction,
        /// Whether the spouses received the surplus because no other heir could.
        to_spouses: bool,
    },
}

/// Outcome of the adjustment stage.
#[derive(Debug, Clone)]
pub struct AdjustmentResult {
    /// The correction applied.
    pub adjustment: Adjustment,
    /// Human-readable notes for the result.
    pub notes: Vec<String>,
    /// The audit step, present only when a correction was applied.
    pub audit_step: Option<AuditStep>,
}

impl AdjustmentResult {
    /// Whether awl was applied.
    pub fn awl_applied(&self) -> bool {
        matches!(self.adjustment, Adjustment::Awl { .. })
    }

    /// Whether radd was applied.
    pub fn radd_applied(&self) -> bool {
        matches!(self.adjustment, Adjustment::Radd { .. })
    }
}

/// Applies awl or radd so that the shares sum to exactly one.
///
/// Nothing is changed when the residuary group absorbed the residue or when
/// the shares already sum to one.
///
/// # Arguments
///
/// * `drafts` - The shares after residuary distribution, updated in place
/// * `residue_absorbed` - Whether a residuary group took a positive residue
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{
///     FamilyContext, Fraction, apply_awl_or_radd, assign_fixed_shares,
/// };
/// use faraid_engine::models::{Heir, HeirCategory};
///
/// let heirs = vec![Heir::new(HeirCategory::Husband, 1), Heir::new(HeirCategory::FullSister, 2)];
/// let context = FamilyContext::new(&heirs);
/// let mut fixed = assign_fixed_shares(&heirs, &context, 1).unwrap();
///
/// let result = apply_awl_or_radd(&mut fixed.drafts, false, 4).unwrap();
/// assert!(result.awl_applied());
/// assert_eq!(fixed.drafts[0].total, Fraction::reduce(3, 7).unwrap());
/// ```
pub fn apply_awl_or_radd(
    drafts: &mut [ShareDraft],
    residue_absorbed: bool,
    step_number: u32,
) -> EngineResult<AdjustmentResult> {
    let total: Fraction = drafts.iter().map(|d| &d.total).sum();
    let one = Fraction::one();

    if residue_absorbed || drafts.is_empty() || total == one || total.is_zero() {
        return Ok(AdjustmentResult {
            adjustment: Adjustment::None,
            notes: Vec::new(),
            audit_step: None,
        });
    }

    if total > one {
        apply_awl(drafts, total, step_number)
    } else {
        apply_radd(drafts, total, step_number)
    }
}

fn apply_awl(
    drafts: &mut [ShareDraft],
    total: Fraction,
    step_number: u32,
) -> EngineResult<AdjustmentResult> {
    let mut changes = Vec::new();

    for draft in drafts.iter_mut().filter(|d| d.total.is_positive()) {
        let scaled = draft.total.checked_div(&total)?;
        draft.explanation.push(format!(
            "Reduced proportionally by awl from {} to {}",
            draft.total, scaled
        ));
        changes.push(serde_json::json!({
            "category": draft.heir.category.code(),
            "before": draft.total.to_string(),
            "after": scaled.to_string()
        }));
        draft.total = scaled;
    }

    debug!(total = %total, "Awl applied");

    let note = format!(
        "Awl applied: fixed shares totalled {}, so every share was reduced in proportion (the estate is divided into {} parts instead of {})",
        total,
        total.numerator(),
        total.denominator()
    );

    Ok(AdjustmentResult {
        audit_step: Some(AuditStep {
            step_number,
            rule_id: "awl".to_string(),
            rule_name: "Awl (Proportional Reduction)".to_string(),
            reference: "Classical consensus (ruling of Umar ibn al-Khattab)".to_string(),
            input: serde_json::json!({ "fixed_total": total.to_string() }),
            output: serde_json::json!({ "shares": changes }),
            reasoning: note.clone(),
        }),
        adjustment: Adjustment::Awl { total },
        notes: vec![note],
    })
}

fn apply_radd(
    drafts: &mut [ShareDraft],
    total: Fraction,
    step_number: u32,
) -> EngineResult<AdjustmentResult> {
    let surplus = &Fraction::one() - &total;

    let non_spousal: Fraction = drafts
        .iter()
        .filter(|d| !d.is_spouse())
        .map(|d| &d.total)
        .sum();
    let to_spouses = !non_spousal.is_positive();
    let eligible_total = if to_spouses { total.clone() } else { non_spousal };

    let mut changes = Vec::new();
    for draft in drafts
        .iter_mut()
        .filter(|d| d.is_spouse() == to_spouses && d.total.is_positive())
    {
        let increase = (&draft.total * &surplus).checked_div(&eligible_total)?;
        let adjusted = &draft.total + &increase;
        draft.explanation.push(format!(
            "Increased by radd from {} to {}",
            draft.total, adjusted
        ));
        changes.push(serde_json::json!({
            "category": draft.heir.category.code(),
            "before": draft.total.to_string(),
            "after": adjusted.to_string()
        }));
        draft.total = adjusted;
    }

    debug!(surplus = %surplus, to_spouses, "Radd applied");

    let note = if to_spouses {
        format!(
            "Radd applied: no other heir is present, so the surplus of {} returns to the spouse",
            surplus
        )
    } else {
        let spouse_present = drafts.iter().any(ShareDraft::is_spouse);
        format!(
            "Radd applied: the surplus of {} was returned to the heirs in proportion to their shares{}",
            surplus,
            if spouse_present { ", excluding the spouse" } else { "" }
        )
    };

    Ok(AdjustmentResult {
        audit_step: Some(AuditStep {
            step_number,
            rule_id: "radd".to_string(),
            rule_name: "Radd (Return of Surplus)".to_string(),
            reference: "Classical rule of radd; spouses excluded while any other heir remains"
                .to_string(),
            input: serde_json::json!({
                "share_total": total.to_string(),
                "surplus": surplus.to_string(),
                "eligible_total": eligible_total.to_string()
            }),
            output: serde_json::json!({ "shares": changes, "to_spouses": to_spouses }),
            reasoning: note.clone(),
        }),
        adjustment: Adjustment::Radd {
            surplus,
            to_spouses,
        },
        notes: vec![note],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{FamilyContext, assign_fixed_shares, distribute_residue, resolve_blocking};
    use crate::models::{Heir, HeirCategory};

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::reduce(n, d).unwrap()
    }

    fn run(family: &[(HeirCategory, u32)]) -> (Vec<ShareDraft>, AdjustmentResult) {
        let heirs: Vec<Heir> = family.iter().map(|(c, n)| Heir::new(*c, *n)).collect();
        let context = FamilyContext::new(&heirs);
        let blocking = resolve_blocking(&heirs, &context, 1);
        let mut fixed = assign_fixed_shares(&blocking.active, &context, 2).unwrap();
        let residue = distribute_residue(&mut fixed.drafts, &fixed.fixed_total, 10).unwrap();
        let result = apply_awl_or_radd(&mut fixed.drafts, residue.absorbed, 11).unwrap();
        (fixed.drafts, result)
    }

    fn total_of(drafts: &[ShareDraft], category: HeirCategory) -> Fraction {
        drafts
            .iter()
            .find(|d| d.heir.category == category)
            .map(|d| d.total.clone())
            .unwrap()
    }

    fn sum(drafts: &[ShareDraft]) -> Fraction {
        drafts.iter().map(|d| &d.total).sum()
    }

    /// AR-001: husband and two full sisters
    #[test]
    fn test_awl_husband_and_two_full_sisters() {
        let (drafts, result) = run(&[(HeirCategory::Husband, 1), (HeirCategory::FullSister, 2)]);
        assert!(result.awl_applied());
        assert!(!result.radd_applied());
        assert_eq!(result.adjustment, Adjustment::Awl { total: frac(7, 6) });
        assert_eq!(total_of(&drafts, HeirCategory::Husband), frac(3, 7));
        assert_eq!(total_of(&drafts, HeirCategory::FullSister), frac(4, 7));
        assert_eq!(sum(&drafts), Fraction::one());
        assert_eq!(result.audit_step.unwrap().rule_id, "awl");
    }

    /// AR-002: husband and daughter
    #[test]
    fn test_radd_husband_and_daughter() {
        let (drafts, result) = run(&[(HeirCategory::Husband, 1), (HeirCategory::Daughter, 1)]);
        assert!(result.radd_applied());
        assert_eq!(total_of(&drafts, HeirCategory::Husband), Fraction::quarter());
        assert_eq!(total_of(&drafts, HeirCategory::Daughter), frac(3, 4));
        assert_eq!(sum(&drafts), Fraction::one());
    }

    #[test]
    fn test_radd_proportional_among_several_heirs() {
        // Mother 1/6, daughter 1/2: surplus 1/3 returned 1:3
        let (drafts, result) = run(&[(HeirCategory::Mother, 1), (HeirCategory::Daughter, 1)]);
        assert!(result.radd_applied());
        assert_eq!(total_of(&drafts, HeirCategory::Mother), Fraction::quarter());
        assert_eq!(total_of(&drafts, HeirCategory::Daughter), frac(3, 4));
    }

    #[test]
    fn test_radd_wife_keeps_her_share() {
        let (drafts, _) = run(&[(HeirCategory::Wife, 2), (HeirCategory::Mother, 1)]);
        assert_eq!(total_of(&drafts, HeirCategory::Wife), Fraction::quarter());
        assert_eq!(total_of(&drafts, HeirCategory::Mother), frac(3, 4));
    }

    #[test]
    fn test_radd_to_spouse_when_alone() {
        let (drafts, result) = run(&[(HeirCategory::Wife, 1)]);
        assert_eq!(
            result.adjustment,
            Adjustment::Radd {
                surplus: frac(3, 4),
                to_spouses: true
            }
        );
        assert_eq!(total_of(&drafts, HeirCategory::Wife), Fraction::one());
        assert!(result.notes[0].contains("spouse"));
    }

    #[test]
    fn test_no_adjustment_when_residue_absorbed() {
        let (drafts, result) = run(&[(HeirCategory::Wife, 1), (HeirCategory::Son, 2)]);
        assert_eq!(result.adjustment, Adjustment::None);
        assert!(result.audit_step.is_none());
        assert_eq!(sum(&drafts), Fraction::one());
    }

    #[test]
    fn test_no_adjustment_when_exact() {
        let (_, result) = run(&[
            (HeirCategory::Husband, 1),
            (HeirCategory::Mother, 1),
            (HeirCategory::MaternalHalfSister, 2),
        ]);
        assert_eq!(result.adjustment, Adjustment::None);
    }

    #[test]
    fn test_awl_with_residuary_group_left_empty() {
        // Husband 1/4, mother 1/6, father 1/6 (+residue), daughters 2/3: 5/4 in total
        let (drafts, result) = run(&[
            (HeirCategory::Husband, 1),
            (HeirCategory::Father, 1),
            (HeirCategory::Mother, 1),
            (HeirCategory::Daughter, 2),
        ]);
        assert!(result.awl_applied());
        assert_eq!(total_of(&drafts, HeirCategory::Husband), frac(3, 15));
        assert_eq!(total_of(&drafts, HeirCategory::Daughter), frac(8, 15));
        assert_eq!(sum(&drafts), Fraction::one());
    }
}
