//! Exact rational arithmetic for inheritance shares.
//!
//! Shares are never computed in floating point. A [`Fraction`] keeps an
//! arbitrary-precision numerator and denominator in lowest terms, so repeated
//! additions and least-common-multiple operations cannot overflow. Monetary
//! values are only produced at the very end, by [`Fraction::apply_to`], which
//! rounds once (half to even) into a [`Decimal`].

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// An exact fraction in lowest terms with a positive denominator.
///
/// Invariants: `denominator > 0`, `gcd(numerator, denominator) == 1`, and
/// zero is always represented as `0/1`.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::Fraction;
///
/// let husband = Fraction::half();
/// let sisters = Fraction::two_thirds();
/// let total = &husband + &sisters;
/// assert_eq!(total.to_string(), "7/6");
///
/// let scaled = husband.checked_div(&total).unwrap();
/// assert_eq!(scaled.to_string(), "3/7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Builds a fraction from any numerator and denominator, reducing it to
    /// lowest terms and moving the sign onto the numerator.
    ///
    /// Returns a `CalculationError` for a zero denominator.
    pub fn reduce(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> EngineResult<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(EngineError::CalculationError {
                message: "fraction denominator must not be zero".to_string(),
            });
        }
        Ok(Self::normalized(numerator.into(), denominator))
    }

    /// Reduces a pair whose denominator is known to be non-zero.
    fn normalized(numerator: BigInt, denominator: BigInt) -> Self {
        if numerator.is_zero() {
            return Self::zero();
        }

        let divisor = numerator.gcd(&denominator);
        let mut numerator = numerator / &divisor;
        let mut denominator = denominator / &divisor;
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }

        Self {
            numerator,
            denominator,
        }
    }

    /// Constructs one of the fixed Qur'anic fractions, already in lowest terms.
    fn from_small(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator: BigInt::from(numerator),
            denominator: BigInt::from(denominator),
        }
    }

    /// The fraction 0/1.
    pub fn zero() -> Self {
        Self::from_small(0, 1)
    }

    /// The fraction 1/1.
    pub fn one() -> Self {
        Self::from_small(1, 1)
    }

    /// The fraction 1/2.
    pub fn half() -> Self {
        Self::from_small(1, 2)
    }

    /// The fraction 1/3.
    pub fn third() -> Self {
        Self::from_small(1, 3)
    }

    /// The fraction 2/3.
    pub fn two_thirds() -> Self {
        Self::from_small(2, 3)
    }

    /// The fraction 1/4.
    pub fn quarter() -> Self {
        Self::from_small(1, 4)
    }

    /// The fraction 1/6.
    pub fn sixth() -> Self {
        Self::from_small(1, 6)
    }

    /// The fraction 1/8.
    pub fn eighth() -> Self {
        Self::from_small(1, 8)
    }

    /// A whole number as a fraction.
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    /// The numerator (carries the sign).
    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    /// The denominator (always positive).
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Returns true for 0/1.
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Returns true when strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.numerator.is_positive()
    }

    /// Returns true when strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Multiplies by a whole number.
    pub fn mul_int(&self, k: u32) -> Self {
        Self::normalized(&self.numerator * BigInt::from(k), self.denominator.clone())
    }

    /// Divides by a whole number, e.g. to split a pooled share among the
    /// members of a category.
    ///
    /// Returns a `CalculationError` when `k` is zero.
    pub fn div_int(&self, k: u32) -> EngineResult<Self> {
        if k == 0 {
            return Err(EngineError::CalculationError {
                message: format!("cannot divide {} among zero heirs", self),
            });
        }
        Ok(Self::normalized(
            self.numerator.clone(),
            &self.denominator * BigInt::from(k),
        ))
    }

    /// Divides by another fraction.
    ///
    /// Returns a `CalculationError` when `divisor` is zero.
    pub fn checked_div(&self, divisor: &Fraction) -> EngineResult<Self> {
        if divisor.is_zero() {
            return Err(EngineError::CalculationError {
                message: format!("cannot divide {} by zero", self),
            });
        }
        Ok(Self::normalized(
            &self.numerator * &divisor.denominator,
            &self.denominator * &divisor.numerator,
        ))
    }

    /// Renders the fraction as a decimal with `scale` places, rounding half
    /// to even.
    pub fn to_decimal(&self, scale: u32) -> EngineResult<Decimal> {
        self.apply_to(Decimal::ONE, scale)
    }

    /// Computes `amount × self` exactly and rounds the result once, half to
    /// even, to `scale` decimal places.
    ///
    /// # Example
    ///
    /// ```
    /// use faraid_engine::calculation::Fraction;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let share = Fraction::reduce(7, 16).unwrap();
    /// let amount = share.apply_to(Decimal::from(1000), 2).unwrap();
    /// assert_eq!(amount, Decimal::from_str("437.50").unwrap());
    /// ```
    pub fn apply_to(&self, amount: Decimal, scale: u32) -> EngineResult<Decimal> {
        let ten = BigInt::from(10u32);
        let numerator = BigInt::from(amount.mantissa()) * &self.numerator * ten.pow(scale);
        let denominator = &self.denominator * ten.pow(amount.scale());

        let rounded = round_half_even(&numerator, &denominator);
        let mantissa = rounded
            .to_i128()
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("{} x {} does not fit in a decimal", amount, self),
            })?;

        Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|e| {
            EngineError::CalculationError {
                message: format!("{} x {} does not fit in a decimal: {}", amount, self, e),
            }
        })
    }

    /// The display form, `"n/d"` or `"n"` for whole numbers.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    /// Least common multiple of the denominators of `fractions`, or 1 for an
    /// empty input.
    pub fn lcm_of_denominators<'a>(fractions: impl IntoIterator<Item = &'a Fraction>) -> BigInt {
        fractions
            .into_iter()
            .fold(BigInt::one(), |acc, fraction| acc.lcm(&fraction.denominator))
    }
}

/// Rounds `numerator / denominator` to an integer, ties to even.
/// `denominator` must be positive.
fn round_half_even(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let (quotient, remainder) = numerator.div_mod_floor(denominator);
    let twice = &remainder + &remainder;

    match twice.cmp(denominator) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + BigInt::one(),
        Ordering::Equal if quotient.is_odd() => quotient + BigInt::one(),
        Ordering::Equal => quotient,
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for Fraction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<BigInt>()
                .map_err(|e| EngineError::CalculationError {
                    message: format!("invalid fraction '{}': {}", s, e),
                })
        };

        match s.split_once('/') {
            Some((numerator, denominator)) => Self::reduce(parse(numerator)?, parse(denominator)?),
            None => Ok(Self::from_integer(parse(s)?)),
        }
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        Fraction::normalized(
            &self.numerator * &rhs.denominator + &rhs.numerator * &self.denominator,
            &self.denominator * &rhs.denominator,
        )
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        &self + &rhs
    }
}

impl Sub for &Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &Fraction) -> Fraction {
        Fraction::normalized(
            &self.numerator * &rhs.denominator - &rhs.numerator * &self.denominator,
            &self.denominator * &rhs.denominator,
        )
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        &self - &rhs
    }
}

impl Mul for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        Fraction::normalized(
            &self.numerator * &rhs.numerator,
            &self.denominator * &rhs.denominator,
        )
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        &self * &rhs
    }
}

impl Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::zero(), |acc, f| &acc + &f)
    }
}

impl<'a> Sum<&'a Fraction> for Fraction {
    fn sum<I: Iterator<Item = &'a Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::zero(), |acc, f| &acc + f)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
