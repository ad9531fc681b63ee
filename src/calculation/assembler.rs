//! Result assembly.
//!
//! Converts the final share fractions into monetary amounts against the net
//! estate, splits them per person where required, and computes the totals
//! reported on the result.

use num_bigint::BigInt;
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::MonetarySettings;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, HeirShare};

use super::fixed_share::ShareDraft;
use super::fraction::Fraction;

/// Warning code raised when the remainder is larger than rounding explains.
pub const REMAINDER_WARNING: &str = "REMAINDER_EXCEEDS_TOLERANCE";

/// The monetised shares and totals.
#[derive(Debug, Clone)]
pub struct AssembledShares {
    /// One share per heir category, in input order.
    pub heir_shares: Vec<HeirShare>,
    /// Sum of all share amounts.
    pub total_distributed: Decimal,
    /// Net estate less the total distributed.
    pub remainder: Decimal,
    /// LCM of the denominators of every reported share fraction.
    pub common_denominator: BigInt,
    /// The audit step recording the monetisation.
    pub audit_step: AuditStep,
    /// Warnings raised while assembling.
    pub warnings: Vec<AuditWarning>,
}

/// Monetises the final shares.
///
/// Every amount is computed exactly from the fraction and rounded once,
/// half-to-even, to `settings.decimal_places`.
///
/// # Arguments
///
/// * `drafts` - The final shares, each holding its category total
/// * `net_estate` - The estate available to the heirs
/// * `settings` - Monetary rounding settings
/// * `step_number` - The step number for audit trail sequencing
pub fn assemble_shares(
    drafts: &[ShareDraft],
    net_estate: Decimal,
    settings: &MonetarySettings,
    step_number: u32,
) -> EngineResult<AssembledShares> {
    let dp = settings.decimal_places;
    let mut heir_shares = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let per_person = draft.total.div_int(draft.heir.count)?;
        let fraction = if draft.per_person {
            per_person.clone()
        } else {
            draft.total.clone()
        };

        heir_shares.push(HeirShare {
            heir: draft.heir.clone(),
            fraction,
            is_per_person: draft.per_person,
            basis: draft.basis(),
            amount: draft.total.apply_to(net_estate, dp)?,
            amount_per_person: per_person.apply_to(net_estate, dp)?,
            percentage: draft
                .total
                .mul_int(100)
                .to_decimal(settings.percentage_decimal_places)?,
            explanation: draft.explanation.join(". "),
        });
    }

    let total_distributed: Decimal = heir_shares.iter().map(|s| s.amount).sum();
    let remainder = net_estate - total_distributed;
    let common_denominator =
        Fraction::lcm_of_denominators(heir_shares.iter().map(|s| &s.fraction));

    let mut warnings = Vec::new();
    if !heir_shares.is_empty() && remainder.abs() > settings.remainder_tolerance {
        warn!(
            remainder = %remainder,
            tolerance = %settings.remainder_tolerance,
            "Remainder exceeds rounding tolerance"
        );
        warnings.push(AuditWarning {
            code: REMAINDER_WARNING.to_string(),
            message: format!(
                "Remainder of {} exceeds the rounding tolerance of {}",
                remainder, settings.remainder_tolerance
            ),
            severity: "high".to_string(),
        });
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "result_assembly".to_string(),
        rule_name: "Monetary Distribution".to_string(),
        reference: "amount = net estate x category share".to_string(),
        input: serde_json::json!({
            "net_estate": net_estate.to_string(),
            "decimal_places": dp
        }),
        output: serde_json::json!({
            "amounts": heir_shares
                .iter()
                .map(|s| serde_json::json!({
                    "category": s.heir.category.code(),
                    "share": s.total_fraction().to_string(),
                    "amount": s.amount.to_string()
                }))
                .collect::<Vec<_>>(),
            "total_distributed": total_distributed.to_string(),
            "remainder": remainder.to_string(),
            "common_denominator": common_denominator.to_string()
        }),
        reasoning: format!(
            "Distributed {} of {} across {} heir categories; common denominator {}",
            total_distributed,
            net_estate,
            heir_shares.len(),
            common_denominator
        ),
    };

    Ok(AssembledShares {
        heir_shares,
        total_distributed,
        remainder,
        common_denominator,
        audit_step,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Heir, HeirCategory, ShareBasis};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::reduce(n, d).unwrap()
    }

    fn draft(category: HeirCategory, count: u32, total: Fraction, per_person: bool) -> ShareDraft {
        ShareDraft {
            heir: Heir::new(category, count),
            fixed: total.clone(),
            total,
            residuary: false,
            received_residue: false,
            per_person,
            explanation: vec!["rule".to_string()],
        }
    }

    /// AS-001: two sons after a wife
    #[test]
    fn test_per_person_shares_report_one_members_fraction() {
        let drafts = vec![
            draft(HeirCategory::Wife, 1, Fraction::eighth(), false),
            draft(HeirCategory::Son, 2, frac(7, 8), true),
        ];
        let assembled =
            assemble_shares(&drafts, dec("1000"), &MonetarySettings::default(), 7).unwrap();

        let sons = &assembled.heir_shares[1];
        assert_eq!(sons.fraction, frac(7, 16));
        assert_eq!(sons.amount, dec("875.00"));
        assert_eq!(sons.amount_per_person, dec("437.50"));
        assert_eq!(sons.percentage, dec("87.5"));

        assert_eq!(assembled.total_distributed, dec("1000"));
        assert_eq!(assembled.remainder, Decimal::ZERO);
        assert_eq!(assembled.common_denominator, BigInt::from(16));
        assert!(assembled.warnings.is_empty());
    }

    /// AS-002: the common denominator expresses every reported fraction
    #[test]
    fn test_common_denominator_covers_per_person_fractions() {
        let drafts = vec![
            draft(HeirCategory::Wife, 3, Fraction::eighth(), false),
            draft(HeirCategory::Mother, 1, Fraction::sixth(), false),
            draft(HeirCategory::Son, 3, frac(14, 24), true),
            draft(HeirCategory::Daughter, 2, frac(3, 24), true),
        ];
        let assembled =
            assemble_shares(&drafts, dec("7200"), &MonetarySettings::default(), 1).unwrap();

        assert_eq!(assembled.heir_shares[2].fraction, frac(7, 36));
        assert_eq!(assembled.heir_shares[3].fraction, frac(1, 16));
        assert_eq!(assembled.common_denominator, BigInt::from(144));
        for share in &assembled.heir_shares {
            assert_eq!(
                &assembled.common_denominator % share.fraction.denominator(),
                BigInt::from(0)
            );
            assert_eq!(
                &assembled.common_denominator % share.total_fraction().denominator(),
                BigInt::from(0)
            );
        }
    }

    #[test]
    fn test_pooled_shares_report_category_total() {
        let drafts = vec![draft(HeirCategory::Wife, 2, Fraction::one(), false)];
        let assembled =
            assemble_shares(&drafts, dec("1000"), &MonetarySettings::default(), 1).unwrap();
        let wives = &assembled.heir_shares[0];
        assert_eq!(wives.fraction, Fraction::one());
        assert_eq!(wives.amount_per_person, dec("500"));
        assert_eq!(wives.basis, ShareBasis::Fixed);
    }

    #[test]
    fn test_rounding_dust_stays_in_remainder() {
        // 1/3 and 2/3 of 100 round to 33.33 and 66.67.
        let drafts = vec![
            draft(HeirCategory::Mother, 1, Fraction::third(), false),
            draft(HeirCategory::FullBrother, 2, Fraction::two_thirds(), true),
        ];
        let assembled =
            assemble_shares(&drafts, dec("100"), &MonetarySettings::default(), 1).unwrap();
        assert_eq!(assembled.heir_shares[0].amount, dec("33.33"));
        assert_eq!(assembled.heir_shares[1].amount, dec("66.67"));
        assert_eq!(assembled.heir_shares[0].percentage, dec("33.3333"));
        assert_eq!(assembled.common_denominator, BigInt::from(3));
        assert_eq!(assembled.remainder, Decimal::ZERO);
    }

    #[test]
    fn test_large_remainder_raises_warning() {
        let drafts = vec![draft(HeirCategory::Husband, 1, Fraction::half(), false)];
        let assembled =
            assemble_shares(&drafts, dec("1000"), &MonetarySettings::default(), 1).unwrap();
        assert_eq!(assembled.remainder, dec("500"));
        assert_eq!(assembled.warnings.len(), 1);
        assert_eq!(assembled.warnings[0].code, REMAINDER_WARNING);
    }

    #[test]
    fn test_empty_drafts_distribute_nothing() {
        let assembled =
            assemble_shares(&[], dec("250"), &MonetarySettings::default(), 1).unwrap();
        assert!(assembled.heir_shares.is_empty());
        assert_eq!(assembled.remainder, dec("250"));
        assert!(assembled.warnings.is_empty());
    }
}
