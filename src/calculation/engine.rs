//! Distribution pipeline.
//!
//! [`calculate_inheritance`] validates the input and runs the stages in
//! order: estate deductions, blocking, fixed shares, residue, awl or radd,
//! and monetisation. Each stage appends to the audit trace; nothing is
//! shared between calls.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, DeceasedInfo, Estate, Gender, Heir, HeirCategory, InheritanceResult,
};

use super::adjustment::apply_awl_or_radd;
use super::assembler::assemble_shares;
use super::blocking::resolve_blocking;
use super::context::FamilyContext;
use super::fixed_share::assign_fixed_shares;
use super::residuary::distribute_residue;

/// Checks the heir selection for shapes no rule can interpret.
///
/// Rejects zero counts, a category listed twice, an heir whose gender
/// disagrees with its category, and a spouse inconsistent with the
/// deceased's gender. Maximum counts are catalogue data and are enforced by
/// [`ConfigLoader::heir`](crate::config::ConfigLoader::heir).
pub fn validate_heirs(deceased: &DeceasedInfo, heirs: &[Heir]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();

    for heir in heirs {
        let invalid = |message: String| EngineError::InvalidHeir {
            category: heir.category.code().to_string(),
            message,
        };

        if heir.count == 0 {
            return Err(invalid("count must be at least 1".to_string()));
        }
        if !seen.insert(heir.category) {
            return Err(invalid("category listed more than once".to_string()));
        }
        if heir.gender != heir.category.gender() {
            return Err(invalid(format!(
                "gender {} does not match the category",
                heir.gender
            )));
        }

        let required = match heir.category {
            HeirCategory::Husband => Some(Gender::Female),
            HeirCategory::Wife => Some(Gender::Male),
            _ => None,
        };
        if required.is_some_and(|gender| gender != deceased.gender) {
            return Err(invalid(format!(
                "a {} deceased cannot leave a {}",
                deceased.gender,
                heir.category.code()
            )));
        }
    }

    Ok(())
}

/// Distributes an estate among the given heirs.
///
/// The computation is pure: the same input always yields the same result,
/// and concurrent calls share nothing.
///
/// # Arguments
///
/// * `deceased` - The deceased person
/// * `heirs` - One entry per selected heir category
/// * `estate` - Gross value, deductions and requested bequest
/// * `config` - Rule-set metadata and monetary settings
///
/// # Returns
///
/// Returns the complete [`InheritanceResult`], or an error if the heir
/// selection is invalid or an amount cannot be represented.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{Fraction, calculate_inheritance};
/// use faraid_engine::config::ConfigLoader;
/// use faraid_engine::models::{DeceasedInfo, Estate, Gender, Heir, HeirCategory};
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let heirs = vec![Heir::new(HeirCategory::Husband, 1), Heir::new(HeirCategory::Daughter, 1)];
/// let estate = Estate::new(Decimal::from(1000), "USD");
///
/// let result = calculate_inheritance(
///     &DeceasedInfo::new(Gender::Female),
///     &heirs,
///     &estate,
///     config.config(),
/// )
/// .unwrap();
///
/// assert!(result.radd_applied);
/// let daughter = result.share_for(HeirCategory::Daughter).unwrap();
/// assert_eq!(daughter.fraction, Fraction::reduce(3, 4).unwrap());
/// assert_eq!(daughter.amount, Decimal::from(750));
/// ```
pub fn calculate_inheritance(
    deceased: &DeceasedInfo,
    heirs: &[Heir],
    estate: &Estate,
    config: &EngineConfig,
) -> EngineResult<InheritanceResult> {
    validate_heirs(deceased, heirs)?;

    let monetary = config.monetary();
    let dp = monetary.decimal_places;
    let mut trace = AuditTrace::default();
    let mut notes = Vec::new();
    let mut step_number: u32 = 1;

    // Estate deductions
    let deduction_base = estate.deduction_base();
    let bequest = estate.allowed_bequest(dp);
    let net_estate = estate.net_estate(dp);
    let capped = estate.bequest_is_capped(dp);
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "estate_deductions".to_string(),
        rule_name: "Estate Deductions".to_string(),
        reference: "An-Nisa 4:11-12 (after any bequest or debt); hadith of Sa'd: a third, and a third is much".to_string(),
        input: serde_json::json!({
            "gross_value": estate.gross_value.to_string(),
            "debts": estate.debts.to_string(),
            "funeral_expenses": estate.funeral_expenses.to_string(),
            "requested_bequest": estate.requested_bequest.to_string()
        }),
        output: serde_json::json!({
            "deduction_base": deduction_base.to_string(),
            "bequest": bequest.to_string(),
            "bequest_capped": capped,
            "net_estate": net_estate.to_string()
        }),
        reasoning: format!(
            "Debts and funeral expenses leave {}; bequest of {} deducted, leaving {} for the heirs",
            deduction_base, bequest, net_estate
        ),
    });
    step_number += 1;
    if capped {
        notes.push(format!(
            "Requested bequest of {} exceeds one third of the estate and was reduced to {}",
            estate.requested_bequest, bequest
        ));
    }

    // Blocking
    let context = FamilyContext::new(heirs);
    let blocking = resolve_blocking(heirs, &context, step_number);
    trace.steps.push(blocking.audit_step);
    step_number += 1;
    debug!(
        active = blocking.active.len(),
        blocked = blocking.blocked.len(),
        "Blocking resolved"
    );

    // Fixed shares
    let mut fixed = assign_fixed_shares(&blocking.active, &context, step_number)?;
    step_number += fixed.audit_steps.len() as u32;
    trace.steps.extend(fixed.audit_steps);
    debug!(fixed_total = %fixed.fixed_total, "Fixed shares assigned");

    // Residue
    let residuary = distribute_residue(&mut fixed.drafts, &fixed.fixed_total, step_number)?;
    trace.steps.push(residuary.audit_step);
    step_number += 1;

    // Awl or radd
    let adjustment = apply_awl_or_radd(&mut fixed.drafts, residuary.absorbed, step_number)?;
    let awl_applied = adjustment.awl_applied();
    let radd_applied = adjustment.radd_applied();
    if let Some(step) = adjustment.audit_step {
        trace.steps.push(step);
        step_number += 1;
    }
    notes.extend(adjustment.notes);

    // Monetisation
    let assembled = assemble_shares(&fixed.drafts, net_estate, monetary, step_number)?;
    trace.steps.push(assembled.audit_step);
    trace.warnings.extend(assembled.warnings);

    if heirs.is_empty() {
        notes.push(
            "No heir was selected: the whole net estate passes to the public treasury (bayt al-mal)"
                .to_string(),
        );
    }

    info!(
        rule_set = %config.rule_set().code,
        net_estate = %net_estate,
        heirs = heirs.len(),
        blocked = blocking.blocked.len(),
        awl_applied,
        radd_applied,
        remainder = %assembled.remainder,
        "Inheritance calculated"
    );

    Ok(InheritanceResult {
        rule_set: config.rule_set().code.clone(),
        estate: estate.clone(),
        deduction_base,
        bequest,
        net_estate,
        heir_shares: assembled.heir_shares,
        blocked_heirs: blocking.blocked,
        total_distributed: assembled.total_distributed,
        remainder: assembled.remainder,
        common_denominator: assembled.common_denominator,
        awl_applied,
        radd_applied,
        notes,
        audit_trace: trace,
    })
}
