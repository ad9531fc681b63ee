//! Core data models for the Fara'id engine.
//!
//! This module contains all the domain models used throughout the engine.

mod estate;
mod heir;
mod inheritance_result;

pub use estate::Estate;
pub use heir::{DeceasedInfo, Gender, Heir, HeirCategory, HeirGroup};
pub use inheritance_result::{
    AuditStep, AuditTrace, AuditWarning, BlockedHeir, HeirShare, InheritanceResult, ShareBasis,
};
