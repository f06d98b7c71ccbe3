//! # Money and Rates: Fixed-Point Arithmetic
//!
//! [`Amount`] is a non-negative monetary value held as integer hundredths
//! ("minor units"). [`Rate`] is a fraction held in basis points. Rewards are
//! computed as `minor × bps / 10_000` with half-up rounding, so identical
//! inputs always produce identical outputs regardless of platform float
//! behaviour.
//!
//! ## Wire Format
//!
//! Both types serialize as JSON numbers in major units (`11250000`,
//! `1234.5`, `0.75`). `Amount` also deserializes from decimal strings so
//! that callers can avoid float precision loss entirely.

use std::fmt;
use std::iter::Sum;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AdvisorError;

const MINOR_PER_MAJOR: u64 = 100;
const BPS_PER_UNIT: u128 = 10_000;

/// A non-negative monetary amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Build an amount from minor units (hundredths).
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Build an amount from whole currency units.
    ///
    /// Saturates at `u64::MAX` minor units.
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Convert a float at an adapter boundary.
    ///
    /// The value goes through its shortest round-trip decimal form, so a
    /// number rounds exactly like the same digits given as a string.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] for negative, NaN, infinite or
    /// out-of-range values.
    pub fn from_f64(value: f64) -> Result<Self, AdvisorError> {
        if !value.is_finite() {
            return Err(AdvisorError::invalid(format!(
                "amount must be a finite number, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(AdvisorError::invalid(format!(
                "amount must not be negative, got {value}"
            )));
        }
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        Self::parse(&value.to_string())
    }

    /// Parse a decimal string such as `"15000000"`, `"1234.5"` or
    /// `"15,000,000"`.
    ///
    /// Grouping separators (`,` and `_`) are ignored. Fractional digits
    /// beyond the second are rounded half-up.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] for empty, negative or
    /// malformed input, or values that overflow.
    pub fn parse(input: &str) -> Result<Self, AdvisorError> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        let malformed = || AdvisorError::invalid(format!("malformed amount: {input:?}"));

        if cleaned.is_empty() {
            return Err(malformed());
        }
        if cleaned.starts_with('-') {
            return Err(AdvisorError::invalid(format!(
                "amount must not be negative, got {input:?}"
            )));
        }

        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (cleaned.as_str(), ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let overflow = || AdvisorError::invalid(format!("amount out of range: {input:?}"));
        let whole: u64 = int_part.parse().map_err(|_| overflow())?;

        let digits = frac_part.as_bytes();
        let digit = |i: usize| digits.get(i).map(|b| u64::from(b - b'0')).unwrap_or(0);
        let mut cents = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }

        whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(cents))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// Minor units (hundredths).
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Value in major units as a float, for serialization and display.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Self(self.0.saturating_sub(other.0))
    }

    /// Format with thousands separators: `11,250,000.00`.
    pub fn grouped(&self) -> String {
        let whole = (self.0 / MINOR_PER_MAJOR).to_string();
        let mut out = String::with_capacity(whole.len() + whole.len() / 3 + 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        format!("{out}.{:02}", self.0 % MINOR_PER_MAJOR)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl std::str::FromStr for Amount {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_u64(self.0 / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        let v = u64::try_from(v)
            .map_err(|_| E::custom(format!("amount must not be negative, got {v}")))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Amount::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// A reward rate expressed in basis points (`7500` = 75%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate(u32);

impl Rate {
    /// Build a rate from basis points.
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps)
    }

    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a fraction (`0.75`).
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / BPS_PER_UNIT as f64
    }

    /// `amount × rate`, rounded half-up to the nearest hundredth.
    pub fn apply(&self, amount: Amount) -> Amount {
        let scaled = u128::from(amount.minor()) * u128::from(self.0);
        let rounded = (scaled + BPS_PER_UNIT / 2) / BPS_PER_UNIT;
        Amount::from_minor(u64::try_from(rounded).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
