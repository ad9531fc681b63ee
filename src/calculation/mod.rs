//! Calculation logic for the Fara'id engine.
//!
//! This module contains the exact rational arithmetic used for shares and
//! one function per pipeline stage: blocking resolution, fixed-share
//! assignment, residuary distribution, awl/radd adjustment and monetary
//! assembly. [`calculate_inheritance`] runs them in order.

mod adjustment;
mod assembler;
mod blocking;
mod context;
mod engine;
mod fixed_share;
mod fraction;
mod residuary;

pub use adjustment::{Adjustment, AdjustmentResult, apply_awl_or_radd};
pub use assembler::{AssembledShares, REMAINDER_WARNING, assemble_shares};
pub use blocking::{Blocker, BlockingResolution, blocking_rule, resolve_blocking};
pub use context::FamilyContext;
pub use engine::{calculate_inheritance, validate_heirs};
pub use fixed_share::{
    FixedShareAssignment, FixedShareRule, ShareDraft, assign_fixed_shares, fixed_share_rule,
};
pub use fraction::Fraction;
pub use residuary::{ResiduaryDistribution, distribute_residue, select_residuary_group};
