//! Heir model and related types.
//!
//! This module defines the [`HeirCategory`] enumeration covering every heir
//! the rule set recognises, together with the [`Heir`] record created from a
//! user's selection and the [`DeceasedInfo`] describing the deceased.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Gender of the deceased or of an heir category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Relationship group of an heir category, used for display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeirGroup {
    /// Husband or wife of the deceased.
    Spouse,
    /// Parents and grandparents.
    Ascendant,
    /// Children and son's children.
    Descendant,
    /// Full, paternal and maternal siblings.
    Sibling,
}

/// Every heir category recognised by the rule set.
///
/// The enumeration is exhaustive: blocking, fixed-share and residuary rules
/// all `match` on it, so a category without a rule is a compile error rather
/// than a silent zero share.
///
/// # Example
///
/// ```
/// use faraid_engine::models::{Gender, HeirCategory};
///
/// let category: HeirCategory = "full_sister".parse().unwrap();
/// assert_eq!(category, HeirCategory::FullSister);
/// assert_eq!(category.gender(), Gender::Female);
/// assert!("cousin".parse::<HeirCategory>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeirCategory {
    /// Husband of a deceased woman.
    Husband,
    /// Wife (or wives) of a deceased man.
    Wife,
    /// Father.
    Father,
    /// Mother.
    Mother,
    /// Paternal grandfather.
    Grandfather,
    /// Grandmother(s).
    Grandmother,
    /// Son.
    Son,
    /// Daughter.
    Daughter,
    /// Son's son.
    Grandson,
    /// Son's daughter.
    Granddaughter,
    /// Full brother.
    FullBrother,
    /// Full sister.
    FullSister,
    /// Brother sharing only the father.
    PaternalHalfBrother,
    /// Sister sharing only the father.
    PaternalHalfSister,
    /// Brother sharing only the mother.
    MaternalHalfBrother,
    /// Sister sharing only the mother.
    MaternalHalfSister,
}

impl HeirCategory {
    /// All categories in canonical display order.
    pub const ALL: [HeirCategory; 16] = [
        HeirCategory::Husband,
        HeirCategory::Wife,
        HeirCategory::Father,
        HeirCategory::Mother,
        HeirCategory::Grandfather,
        HeirCategory::Grandmother,
        HeirCategory::Son,
        HeirCategory::Daughter,
        HeirCategory::Grandson,
        HeirCategory::Granddaughter,
        HeirCategory::FullBrother,
        HeirCategory::FullSister,
        HeirCategory::PaternalHalfBrother,
        HeirCategory::PaternalHalfSister,
        HeirCategory::MaternalHalfBrother,
        HeirCategory::MaternalHalfSister,
    ];

    /// Returns the snake_case code used in requests and configuration.
    pub fn code(&self) -> &'static str {
        match self {
            HeirCategory::Husband => "husband",
            HeirCategory::Wife => "wife",
            HeirCategory::Father => "father",
            HeirCategory::Mother => "mother",
            HeirCategory::Grandfather => "grandfather",
            HeirCategory::Grandmother => "grandmother",
            HeirCategory::Son => "son",
            HeirCategory::Daughter => "daughter",
            HeirCategory::Grandson => "grandson",
            HeirCategory::Granddaughter => "granddaughter",
            HeirCategory::FullBrother => "full_brother",
            HeirCategory::FullSister => "full_sister",
            HeirCategory::PaternalHalfBrother => "paternal_half_brother",
            HeirCategory::PaternalHalfSister => "paternal_half_sister",
            HeirCategory::MaternalHalfBrother => "maternal_half_brother",
            HeirCategory::MaternalHalfSister => "maternal_half_sister",
        }
    }

    /// Returns the gender of every member of this category.
    pub fn gender(&self) -> Gender {
        match self {
            HeirCategory::Husband
            | HeirCategory::Father
            | HeirCategory::Grandfather
            | HeirCategory::Son
            | HeirCategory::Grandson
            | HeirCategory::FullBrother
            | HeirCategory::PaternalHalfBrother
            | HeirCategory::MaternalHalfBrother => Gender::Male,
            HeirCategory::Wife
            | HeirCategory::Mother
            | HeirCategory::Grandmother
            | HeirCategory::Daughter
            | HeirCategory::Granddaughter
            | HeirCategory::FullSister
            | HeirCategory::PaternalHalfSister
            | HeirCategory::MaternalHalfSister => Gender::Female,
        }
    }

    /// Returns the relationship group of this category.
    pub fn group(&self) -> HeirGroup {
        match self {
            HeirCategory::Husband | HeirCategory::Wife => HeirGroup::Spouse,
            HeirCategory::Father
            | HeirCategory::Mother
            | HeirCategory::Grandfather
            | HeirCategory::Grandmother => HeirGroup::Ascendant,
            HeirCategory::Son
            | HeirCategory::Daughter
            | HeirCategory::Grandson
            | HeirCategory::Granddaughter => HeirGroup::Descendant,
            HeirCategory::FullBrother
            | HeirCategory::FullSister
            | HeirCategory::PaternalHalfBrother
            | HeirCategory::PaternalHalfSister
            | HeirCategory::MaternalHalfBrother
            | HeirCategory::MaternalHalfSister => HeirGroup::Sibling,
        }
    }

    /// Returns true for husband and wife.
    pub fn is_spouse(&self) -> bool {
        self.group() == HeirGroup::Spouse
    }

    /// Returns true for any of the six sibling categories.
    pub fn is_sibling(&self) -> bool {
        self.group() == HeirGroup::Sibling
    }

    /// Returns true for the two maternal half-sibling categories.
    pub fn is_maternal_sibling(&self) -> bool {
        matches!(
            self,
            HeirCategory::MaternalHalfBrother | HeirCategory::MaternalHalfSister
        )
    }
}

impl fmt::Display for HeirCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeirCategory::Husband => "Husband",
            HeirCategory::Wife => "Wife",
            HeirCategory::Father => "Father",
            HeirCategory::Mother => "Mother",
            HeirCategory::Grandfather => "Grandfather",
            HeirCategory::Grandmother => "Grandmother",
            HeirCategory::Son => "Son",
            HeirCategory::Daughter => "Daughter",
            HeirCategory::Grandson => "Son's son",
            HeirCategory::Granddaughter => "Son's daughter",
            HeirCategory::FullBrother => "Full brother",
            HeirCategory::FullSister => "Full sister",
            HeirCategory::PaternalHalfBrother => "Paternal half-brother",
            HeirCategory::PaternalHalfSister => "Paternal half-sister",
            HeirCategory::MaternalHalfBrother => "Maternal half-brother",
            HeirCategory::MaternalHalfSister => "Maternal half-sister",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for HeirCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        HeirCategory::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or(EngineError::UnknownHeirCategory {
                code: s.to_string(),
            })
    }
}

/// One selected heir category with its head count.
///
/// Heirs are created from the user's selection and are never mutated while a
/// calculation runs; every pipeline stage derives new records instead.
///
/// # Example
///
/// ```
/// use faraid_engine::models::{Gender, Heir, HeirCategory};
///
/// let sons = Heir::new(HeirCategory::Son, 2);
/// assert_eq!(sons.count, 2);
/// assert_eq!(sons.gender, Gender::Male);
/// assert_eq!(sons.label, "Son");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heir {
    /// The heir category.
    pub category: HeirCategory,
    /// Number of people in this category (at least 1).
    pub count: u32,
    /// Gender of the members of this category.
    pub gender: Gender,
    /// Display label.
    pub label: String,
    /// Arabic display label, when the catalogue supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic_label: Option<String>,
}

impl Heir {
    /// Creates an heir entry with the category's default English label.
    pub fn new(category: HeirCategory, count: u32) -> Self {
        Self {
            category,
            count,
            gender: category.gender(),
            label: category.to_string(),
            arabic_label: None,
        }
    }

    /// Replaces the display labels.
    pub fn with_labels(mut self, label: impl Into<String>, arabic_label: Option<String>) -> Self {
        self.label = label.into();
        self.arabic_label = arabic_label;
        self
    }
}

/// Information about the deceased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeceasedInfo {
    /// Gender of the deceased.
    pub gender: Gender,
}

impl DeceasedInfo {
    /// Creates a new deceased record.
    pub fn new(gender: Gender) -> Self {
        Self { gender }
    }
}
