//! Fara'id engine: Islamic estate distribution.
//!
//! This crate computes the exact share of every heir of a deceased person
//! under the classical fixed-share and residuary rules. It resolves which
//! heirs are excluded by closer relatives, assigns the Qur'anic fractions,
//! distributes the residue, applies awl or radd when the fixed shares over-
//! or under-subscribe the estate, and converts the shares into amounts of
//! the net estate. An axum HTTP surface is provided in [`api`].

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
