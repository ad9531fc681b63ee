//! Residuary (asaba) distribution.
//!
//! After fixed shares are paid, whatever remains of the estate goes to a
//! single residuary group chosen by strict priority. Within the group each
//! male head counts as two units and each female head as one when both
//! genders are present; otherwise every head counts as one unit.

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AuditStep, Gender, HeirCategory};

use super::fixed_share::ShareDraft;
use super::fraction::Fraction;

/// Residuary groups in priority order: the leading category followed by the
/// category that rides alongside it.
const RESIDUARY_PRIORITY: [&[HeirCategory]; 6] = [
    &[HeirCategory::Son, HeirCategory::Daughter],
    &[HeirCategory::Grandson, HeirCategory::Granddaughter],
    &[HeirCategory::Father],
    &[HeirCategory::Grandfather],
    &[HeirCategory::FullBrother, HeirCategory::FullSister],
    &[HeirCategory::PaternalHalfBrother, HeirCategory::PaternalHalfSister],
];

/// Outcome of the residuary stage.
#[derive(Debug, Clone)]
pub struct ResiduaryDistribution {
    /// The categories of the active residuary group, if any.
    pub group: Vec<HeirCategory>,
    /// `1 - sum(fixed shares)`; may be zero or negative.
    pub residue: Fraction,
    /// Whether the group actually took a positive residue.
    pub absorbed: bool,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// Selects the active residuary group among the eligible drafts.
///
/// The leading category of a group must be present and flagged residuary
/// (a father with a son is not). Returns the categories of the group that
/// are actually present, leading category first.
pub fn select_residuary_group(drafts: &[ShareDraft]) -> Vec<HeirCategory> {
    let residuary = |category: HeirCategory| {
        drafts
            .iter()
            .any(|d| d.heir.category == category && d.residuary)
    };

    RESIDUARY_PRIORITY
        .iter()
        .find(|group| residuary(group[0]))
        .map(|group| {
            group
                .iter()
                .copied()
                .filter(|category| residuary(*category))
                .collect()
        })
        .unwrap_or_default()
}

/// Units carried by one head of `gender` in a group that may mix genders.
fn unit_weight(gender: Gender, mixed: bool) -> u32 {
    match (mixed, gender) {
        (true, Gender::Male) => 2,
        _ => 1,
    }
}

/// Distributes the residue among the highest-priority residuary group.
///
/// Residuary drafts outside the chosen group keep a zero share with an
/// explanation naming the group that outranks them.
///
/// # Arguments
///
/// * `drafts` - The fixed-share drafts, updated in place
/// * `fixed_total` - Sum of every fixed share
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{FamilyContext, Fraction, assign_fixed_shares, distribute_residue};
/// use faraid_engine::models::{Heir, HeirCategory};
///
/// let heirs = vec![Heir::new(HeirCategory::Wife, 1), Heir::new(HeirCategory::Son, 2)];
/// let context = FamilyContext::new(&heirs);
/// let mut fixed = assign_fixed_shares(&heirs, &context, 1).unwrap();
///
/// let residue = distribute_residue(&mut fixed.drafts, &fixed.fixed_total, 3).unwrap();
/// assert!(residue.absorbed);
/// assert_eq!(fixed.drafts[1].total, Fraction::reduce(7, 8).unwrap());
/// ```
pub fn distribute_residue(
    drafts: &mut [ShareDraft],
    fixed_total: &Fraction,
    step_number: u32,
) -> EngineResult<ResiduaryDistribution> {
    let residue = &Fraction::one() - fixed_total;
    let group = select_residuary_group(drafts);

    let in_group = |category: HeirCategory| group.contains(&category);
    let mixed = {
        let mut genders = drafts
            .iter()
            .filter(|d| in_group(d.heir.category))
            .map(|d| d.heir.category.gender());
        match genders.next() {
            Some(first) => genders.any(|g| g != first),
            None => false,
        }
    };

    let total_units: u32 = drafts
        .iter()
        .filter(|d| in_group(d.heir.category))
        .map(|d| unit_weight(d.heir.category.gender(), mixed) * d.heir.count)
        .sum();

    let absorbed = !group.is_empty() && residue.is_positive() && total_units > 0;
    let mut allocations = Vec::new();

    for draft in drafts.iter_mut() {
        if in_group(draft.heir.category) {
            if !absorbed {
                draft
                    .explanation
                    .push("No residue remains after the fixed shares".to_string());
                continue;
            }

            let weight = unit_weight(draft.heir.category.gender(), mixed);
            let units = weight * draft.heir.count;
            let portion = residue.mul_int(units).div_int(total_units)?;

            draft.explanation.push(if mixed {
                format!(
                    "Takes {} of the residue {} ({} units of {}, {} per head)",
                    portion, residue, units, total_units, weight
                )
            } else {
                format!("Takes {} of the residue {}", portion, residue)
            });
            allocations.push(serde_json::json!({
                "category": draft.heir.category.code(),
                "units": units,
                "share": portion.to_string()
            }));

            draft.total = &draft.total + &portion;
            draft.received_residue = true;
        } else if draft.residuary && !draft.fixed.is_positive() {
            if let Some(leader) = group.first() {
                draft.explanation.push(format!(
                    "Receives nothing: the residue goes to the closer residuary heir ({})",
                    leader.to_string().to_lowercase()
                ));
            }
        }
    }

    debug!(
        residue = %residue,
        group = ?group,
        mixed,
        total_units,
        absorbed,
        "Residuary distribution"
    );

    let reasoning = match (group.first(), absorbed) {
        (None, _) => format!("No residuary heir present; residue of {} left for adjustment", residue),
        (Some(leader), false) => format!(
            "{} leads the residuary group but no residue remains (fixed shares total {})",
            leader, fixed_total
        ),
        (Some(leader), true) => format!(
            "{} leads the residuary group and takes the residue of {}{}",
            leader,
            residue,
            if mixed {
                " at two units per male and one per female"
            } else {
                ""
            }
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "residuary_distribution".to_string(),
        rule_name: "Residuary (Asaba) Distribution".to_string(),
        reference: "An-Nisa 4:11; hadith: the rest to the nearest male relative".to_string(),
        input: serde_json::json!({
            "fixed_total": fixed_total.to_string(),
            "residue": residue.to_string()
        }),
        output: serde_json::json!({
            "group": group.iter().map(|c| c.code()).collect::<Vec<_>>(),
            "mixed_gender": mixed,
            "total_units": total_units,
            "absorbed": absorbed,
            "allocations": allocations
        }),
        reasoning,
    };

    Ok(ResiduaryDistribution {
        group,
        residue,
        absorbed,
        audit_step,
    })
}
