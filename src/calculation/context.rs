//! Presence predicates over the original heir selection.
//!
//! Blocking and fixed-share rules only ever ask whether a category is
//! present (and sometimes how many heads it has) in the heir set as the user
//! selected it. [`FamilyContext`] answers those questions and is built once,
//! before any heir is excluded.

use std::collections::BTreeMap;

use crate::models::{Heir, HeirCategory};

/// Head counts per category for the original heir selection.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::FamilyContext;
/// use faraid_engine::models::{Heir, HeirCategory};
///
/// let heirs = vec![
///     Heir::new(HeirCategory::Daughter, 2),
///     Heir::new(HeirCategory::FullBrother, 1),
/// ];
/// let context = FamilyContext::new(&heirs);
/// assert!(context.has_descendant());
/// assert!(!context.has_male_descendant());
/// assert_eq!(context.sibling_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyContext {
    counts: BTreeMap<HeirCategory, u32>,
}

impl FamilyContext {
    /// Builds the context from the full heir selection.
    pub fn new(heirs: &[Heir]) -> Self {
        let mut counts = BTreeMap::new();
        for heir in heirs.iter().filter(|h| h.count > 0) {
            *counts.entry(heir.category).or_insert(0) += heir.count;
        }
        Self { counts }
    }

    /// Number of heads in `category` (0 when absent).
    pub fn count(&self, category: HeirCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Returns true if at least one member of `category` is present.
    pub fn has(&self, category: HeirCategory) -> bool {
        self.count(category) > 0
    }

    /// Returns the first category of `categories` that is present.
    pub fn first_present(&self, categories: &[HeirCategory]) -> Option<HeirCategory> {
        categories.iter().copied().find(|c| self.has(*c))
    }

    /// Son or son's son present.
    pub fn has_male_descendant(&self) -> bool {
        self.has(HeirCategory::Son) || self.has(HeirCategory::Grandson)
    }

    /// Daughter or son's daughter present.
    pub fn has_female_descendant(&self) -> bool {
        self.has(HeirCategory::Daughter) || self.has(HeirCategory::Granddaughter)
    }

    /// Any child or son's child present.
    pub fn has_descendant(&self) -> bool {
        self.has_male_descendant() || self.has_female_descendant()
    }

    /// Total heads across the six sibling categories, blocked or not.
    pub fn sibling_count(&self) -> u32 {
        self.counts
            .iter()
            .filter(|(category, _)| category.is_sibling())
            .map(|(_, count)| *count)
            .sum()
    }

    /// Total heads across maternal half-brothers and half-sisters.
    pub fn maternal_sibling_count(&self) -> u32 {
        self.count(HeirCategory::MaternalHalfBrother) + self.count(HeirCategory::MaternalHalfSister)
    }

    /// Returns true when no heir at all was selected.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
