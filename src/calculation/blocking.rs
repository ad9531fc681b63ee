//! Blocking (hajb) resolution.
//!
//! This module decides which heir categories are excluded from inheritance
//! entirely because a closer relative is present. Every rule depends only on
//! the presence (or head count) of other categories in the original heir
//! selection, so the resolver runs exactly once and is never iterated: an
//! heir excluded here still counts as present when other rules are checked.

use crate::models::{AuditStep, BlockedHeir, Heir, HeirCategory};

use super::context::FamilyContext;

/// Why a category is excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocker {
    /// The category whose presence causes the exclusion.
    pub blocked_by: HeirCategory,
    /// Human-readable reason.
    pub reason: String,
}

/// The outcome of blocking resolution.
#[derive(Debug, Clone)]
pub struct BlockingResolution {
    /// Heirs that remain eligible, in input order.
    pub active: Vec<Heir>,
    /// Heirs that are excluded, in input order.
    pub blocked: Vec<BlockedHeir>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Closer relatives that exclude each category, in the order they are named
/// in the exclusion reason.
fn excluding_relatives(category: HeirCategory) -> &'static [HeirCategory] {
    use HeirCategory::*;

    match category {
        Husband | Wife | Father | Mother | Son | Daughter => &[],
        Grandfather => &[Father],
        Grandmother => &[Mother],
        Grandson | Granddaughter => &[Son],
        FullBrother | FullSister => &[Father, Son, Grandson],
        PaternalHalfBrother | PaternalHalfSister => &[Father, Son, Grandson, FullBrother],
        MaternalHalfBrother | MaternalHalfSister => {
            &[Father, Grandfather, Son, Daughter, Grandson, Granddaughter]
        }
    }
}

/// Returns the reason `category` is excluded, or `None` if it inherits.
///
/// Besides exclusion by a closer relative, two head-count rules apply: two
/// or more daughters exhaust the two-thirds available to female descendants
/// and so exclude son's daughters, and two or more full sisters do the same
/// for paternal half-sisters. In both cases a male of the excluded heir's own
/// degree (son's son, paternal half-brother) lifts the exclusion by making
/// her a residuary.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{FamilyContext, blocking_rule};
/// use faraid_engine::models::{Heir, HeirCategory};
///
/// let heirs = vec![
///     Heir::new(HeirCategory::Father, 1),
///     Heir::new(HeirCategory::FullBrother, 2),
/// ];
/// let context = FamilyContext::new(&heirs);
///
/// let blocker = blocking_rule(HeirCategory::FullBrother, &context).unwrap();
/// assert_eq!(blocker.blocked_by, HeirCategory::Father);
/// assert!(blocking_rule(HeirCategory::Father, &context).is_none());
/// ```
pub fn blocking_rule(category: HeirCategory, context: &FamilyContext) -> Option<Blocker> {
    if let Some(relative) = context.first_present(excluding_relatives(category)) {
        return Some(Blocker {
            blocked_by: relative,
            reason: format!(
                "{} is excluded by the presence of the {}",
                category,
                relative.to_string().to_lowercase()
            ),
        });
    }

    match category {
        HeirCategory::Granddaughter
            if context.count(HeirCategory::Daughter) >= 2
                && !context.has(HeirCategory::Grandson) =>
        {
            Some(Blocker {
                blocked_by: HeirCategory::Daughter,
                reason: "Son's daughter is excluded because two or more daughters take the \
                         full two-thirds and no son's son makes her a residuary"
                    .to_string(),
            })
        }
        HeirCategory::PaternalHalfSister
            if context.count(HeirCategory::FullSister) >= 2
                && !context.has(HeirCategory::PaternalHalfBrother) =>
        {
            Some(Blocker {
                blocked_by: HeirCategory::FullSister,
                reason: "Paternal half-sister is excluded because two or more full sisters \
                         take the full two-thirds and no paternal half-brother makes her a \
                         residuary"
                    .to_string(),
            })
        }
        _ => None,
    }
}

/// Splits the heir selection into eligible and excluded heirs.
///
/// # Arguments
///
/// * `heirs` - The full heir selection
/// * `context` - Presence predicates built from the same selection
/// * `step_number` - The step number for audit trail sequencing
pub fn resolve_blocking(
    heirs: &[Heir],
    context: &FamilyContext,
    step_number: u32,
) -> BlockingResolution {
    let mut active = Vec::new();
    let mut blocked = Vec::new();

    for heir in heirs {
        match blocking_rule(heir.category, context) {
            Some(blocker) => blocked.push(BlockedHeir {
                heir: heir.clone(),
                blocked_by: blocker.blocked_by,
                reason: blocker.reason,
            }),
            None => active.push(heir.clone()),
        }
    }

    let reasoning = if blocked.is_empty() {
        "No heir is excluded".to_string()
    } else {
        format!(
            "{} of {} heir categories excluded: {}",
            blocked.len(),
            heirs.len(),
            blocked
                .iter()
                .map(|b| format!("{} (by {})", b.heir.category, b.blocked_by.to_string().to_lowercase()))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "blocking_resolution".to_string(),
        rule_name: "Blocking (Hajb) Resolution".to_string(),
        reference: "Classical hajb rules; An-Nisa 4:11, 4:12, 4:176".to_string(),
        input: serde_json::json!({
            "heirs": heirs
                .iter()
                .map(|h| serde_json::json!({ "category": h.category.code(), "count": h.count }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "active": active.iter().map(|h| h.category.code()).collect::<Vec<_>>(),
            "blocked": blocked
                .iter()
                .map(|b| serde_json::json!({
                    "category": b.heir.category.code(),
                    "blocked_by": b.blocked_by.code()
                }))
                .collect::<Vec<_>>()
        }),
        reasoning,
    };

    BlockingResolution {
        active,
        blocked,
        audit_step,
    }
}
