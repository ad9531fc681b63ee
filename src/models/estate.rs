//! Estate model.
//!
//! This module defines the [`Estate`] struct and the deductions applied to
//! it before distribution: debts, funeral expenses and a bequest capped at
//! one third of what remains.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The estate figures supplied by the caller.
///
/// # Example
///
/// ```
/// use faraid_engine::models::Estate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let estate = Estate::new(Decimal::from(120_000), "USD")
///     .with_debts(Decimal::from(15_000))
///     .with_funeral_expenses(Decimal::from(5_000))
///     .with_requested_bequest(Decimal::from(50_000));
///
/// // Deduction base is 100,000; the bequest is capped at a third of it.
/// assert_eq!(estate.allowed_bequest(2), Decimal::from_str("33333.33").unwrap());
/// assert_eq!(estate.net_estate(2), Decimal::from_str("66666.67").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    /// Gross value of everything the deceased left.
    pub gross_value: Decimal,
    /// Outstanding debts, settled first.
    #[serde(default)]
    pub debts: Decimal,
    /// Funeral and burial costs.
    #[serde(default)]
    pub funeral_expenses: Decimal,
    /// Bequest requested in the will, before the one-third cap.
    #[serde(default)]
    pub requested_bequest: Decimal,
    /// Currency code the figures are expressed in.
    pub currency: String,
}

impl Estate {
    /// Creates an estate with no deductions.
    pub fn new(gross_value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            gross_value,
            debts: Decimal::ZERO,
            funeral_expenses: Decimal::ZERO,
            requested_bequest: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    /// Sets the outstanding debts.
    pub fn with_debts(mut self, debts: Decimal) -> Self {
        self.debts = debts;
        self
    }

    /// Sets the funeral expenses.
    pub fn with_funeral_expenses(mut self, funeral_expenses: Decimal) -> Self {
        self.funeral_expenses = funeral_expenses;
        self
    }

    /// Sets the requested bequest.
    pub fn with_requested_bequest(mut self, requested_bequest: Decimal) -> Self {
        self.requested_bequest = requested_bequest;
        self
    }

    /// Gross value less debts and funeral expenses.
    pub fn deduction_base(&self) -> Decimal {
        self.gross_value - self.debts - self.funeral_expenses
    }

    /// One third of the deduction base, truncated to `decimal_places` so the
    /// cap never exceeds an exact third.
    pub fn bequest_cap(&self, decimal_places: u32) -> Decimal {
        (self.deduction_base() / Decimal::from(3))
            .round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero)
    }

    /// The bequest actually honoured: the lesser of the request and the cap.
    pub fn allowed_bequest(&self, decimal_places: u32) -> Decimal {
        self.requested_bequest.min(self.bequest_cap(decimal_places))
    }

    /// The estate left for the heirs.
    ///
    /// Negative inputs are not clamped; callers validate first with
    /// [`Estate::validate`].
    pub fn net_estate(&self, decimal_places: u32) -> Decimal {
        self.deduction_base() - self.allowed_bequest(decimal_places)
    }

    /// Returns true when the requested bequest exceeds the one-third cap.
    pub fn bequest_is_capped(&self, decimal_places: u32) -> bool {
        self.requested_bequest > self.bequest_cap(decimal_places)
    }

    /// Rejects negative figures, deductions exceeding the gross value and an
    /// empty currency code.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("gross_value", self.gross_value),
            ("debts", self.debts),
            ("funeral_expenses", self.funeral_expenses),
            ("requested_bequest", self.requested_bequest),
        ];

        for (field, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::InvalidEstate {
                    field: field.to_string(),
                    message: format!("must not be negative (got {})", value),
                });
            }
        }

        if self.deduction_base().is_sign_negative() && !self.deduction_base().is_zero() {
            return Err(EngineError::InvalidEstate {
                field: "debts".to_string(),
                message: format!(
                    "debts and funeral expenses ({}) exceed the gross value ({})",
                    self.debts + self.funeral_expenses,
                    self.gross_value
                ),
            });
        }

        if self.currency.trim().is_empty() {
            return Err(EngineError::InvalidEstate {
                field: "currency".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
