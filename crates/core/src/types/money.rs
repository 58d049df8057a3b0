//! Exact money arithmetic using decimal representation.
//!
//! Amounts are held as [`Decimal`] in the currency's standard unit (rupees,
//! not paise) and serialize as decimal strings, so totals never drift the way
//! binary floating point would.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing or combining [`Money`] values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input is not a representable decimal number.
    #[error("amount is not a valid decimal number: {0}")]
    NotANumber(String),
    /// The amount is zero or negative where a positive amount is required.
    #[error("amount must be greater than zero")]
    NotPositive,
    /// An addition or multiplication overflowed the decimal range.
    #[error("amount is out of range")]
    Overflow,
}

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from a whole number of units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Parse a strictly positive amount from a JSON number.
    ///
    /// The number's shortest textual form is parsed, so a literal such as
    /// `19.99` becomes exactly `19.99` rather than its binary approximation.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NotANumber`] if the value cannot be represented
    /// as a decimal, or [`MoneyError::NotPositive`] if it is not above zero.
    pub fn positive_from_json(number: &serde_json::Number) -> Result<Self, MoneyError> {
        let text = number.to_string();
        let amount = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| MoneyError::NotANumber(text))?;

        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }

        Ok(Self(amount.normalize()))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the sum exceeds the decimal range.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiply a unit amount by a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the product exceeds the decimal range.
    pub fn checked_times(self, quantity: u32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
