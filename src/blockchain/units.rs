// src/blockchain/units.rs

//! Conversion between human-readable decimal amounts and integer base units.
//!
//! Amounts are parsed from their decimal text so no binary floating point is
//! involved once a value is a string. Base units are `U256`.

use std::fmt;

use ethers_core::types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const MAX_DECIMALS: u8 = 18;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("decimals must be between 0 and {max}, got {0}", max = MAX_DECIMALS)]
    DecimalsOutOfRange(u32),
    #[error("amount {0} overflows the base unit range")]
    Overflow(String),
}

fn check_decimals(decimals: u8) -> Result<(), UnitError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitError::DecimalsOutOfRange(decimals as u32));
    }
    Ok(())
}

/// Converts a display amount such as `"12.5"` into base units.
///
/// Fractional digits beyond `decimals` are floored.
pub fn to_base_unit(amount: &str, decimals: u8) -> Result<U256, UnitError> {
    check_decimals(decimals)?;
    let invalid = || UnitError::InvalidAmount(amount.to_string());

    let trimmed = amount.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.is_empty() || unsigned.starts_with('-') {
        return Err(invalid());
    }

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }

    let scale = decimals as usize;
    let mut digits = String::with_capacity(int_part.len() + scale);
    digits.push_str(int_part);
    if frac_part.len() >= scale {
        digits.push_str(&frac_part[..scale]);
    } else {
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(scale - frac_part.len()));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| UnitError::Overflow(amount.to_string()))
}

/// Same as [`to_base_unit`] for a float that arrived as a JSON number.
pub fn to_base_unit_f64(amount: f64, decimals: u8) -> Result<U256, UnitError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(UnitError::InvalidAmount(amount.to_string()));
    }
    // `Display` for f64 never uses exponent notation.
    to_base_unit(&format!("{}", amount), decimals)
}

/// Renders a base amount as a decimal string with trailing zeros trimmed.
pub fn to_display_unit(base: U256, decimals: u8) -> String {
    let digits = base.to_string();
    insert_decimal_point(&digits, decimals as usize)
}

/// Signed variant used for mirror-node transfer lists.
pub fn to_display_unit_signed(base: i128, decimals: u8) -> String {
    let magnitude = insert_decimal_point(&base.unsigned_abs().to_string(), decimals as usize);
    if base < 0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

fn insert_decimal_point(digits: &str, scale: usize) -> String {
    if scale == 0 {
        return digits.to_string();
    }
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits.to_string()
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// A human-unit quantity as supplied by a caller.
///
/// Keeps the decimal text so conversion stays exact. Accepts JSON numbers
/// and numeric strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAmount(String);

impl DisplayAmount {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.trim_start().starts_with('-')
    }

    pub fn to_base_unit(&self, decimals: u8) -> Result<U256, UnitError> {
        to_base_unit(&self.0, decimals)
    }
}

impl Default for DisplayAmount {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for DisplayAmount {
    fn from(v: u64) -> Self {
        Self(v.to_string())
    }
}

impl From<&str> for DisplayAmount {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl Serialize for DisplayAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct DisplayAmountVisitor;

impl<'de> Visitor<'de> for DisplayAmountVisitor {
    type Value = DisplayAmount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DisplayAmount(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DisplayAmount(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("Invalid amount: {}", v)));
        }
        Ok(DisplayAmount(format!("{}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DisplayAmount(v.trim().to_string()))
    }
}

impl<'de> Deserialize<'de> for DisplayAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DisplayAmountVisitor)
    }
}

/// An integer quantity passed straight into a contract call (`uint256`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn value(&self) -> U256 {
        self.0
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct TokenAmountVisitor;

impl<'de> Visitor<'de> for TokenAmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or an integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TokenAmount(U256::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom(format!("Invalid amount: {}", v)));
        }
        Ok(TokenAmount(U256::from(v as u64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
            return Err(E::custom(format!("Invalid amount: {}", v)));
        }
        to_base_unit_f64(v, 0).map(TokenAmount).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        if v.is_empty() || !v.chars().all(|c| c.is_ascii_digit()) {
            return Err(E::custom(format!("Invalid amount: {}", v)));
        }
        U256::from_dec_str(v).map(TokenAmount).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenAmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_display_to_base() {
        assert_eq!(to_base_unit("1", 8).unwrap(), U256::from(100_000_000u64));
        assert_eq!(to_base_unit("0.1", 8).unwrap(), U256::from(10_000_000u64));
        assert_eq!(to_base_unit("12.345", 2).unwrap(), U256::from(1234u64));
        assert_eq!(to_base_unit(".5", 1).unwrap(), U256::from(5u64));
        assert_eq!(to_base_unit("0", 18).unwrap(), U256::zero());
        assert_eq!(to_base_unit("42", 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(to_base_unit("-1", 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit("", 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit("1e5", 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit("abc", 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit(".", 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit("1", 19), Err(UnitError::DecimalsOutOfRange(19))));
        assert!(matches!(to_base_unit_f64(f64::NAN, 2), Err(UnitError::InvalidAmount(_))));
        assert!(matches!(to_base_unit_f64(f64::INFINITY, 2), Err(UnitError::InvalidAmount(_))));
    }

    #[test]
    fn display_round_trip() {
        for decimals in 0..=MAX_DECIMALS {
            for amount in ["0", "1", "123456789", "98765.4321"] {
                let base = to_base_unit(amount, decimals).unwrap();
                let back = to_display_unit(base, decimals);
                let expected = to_display_unit(to_base_unit(&back, decimals).unwrap(), decimals);
                assert_eq!(back, expected);
                if decimals >= 4 {
                    assert_eq!(back, amount);
                }
            }
        }
    }

    #[test]
    fn signed_display() {
        assert_eq!(to_display_unit_signed(-150_000_000, 8), "-1.5");
        assert_eq!(to_display_unit_signed(1, 8), "0.00000001");
        assert_eq!(to_display_unit_signed(0, 8), "0");
    }

    #[test]
    fn token_amount_accepts_max_uint() {
        let max = U256::MAX.to_string();
        let parsed: TokenAmount = serde_json::from_value(serde_json::json!(max)).unwrap();
        assert_eq!(parsed.value(), U256::MAX);
        let zero: TokenAmount = serde_json::from_value(serde_json::json!(0)).unwrap();
        assert!(zero.value().is_zero());
        assert!(serde_json::from_value::<TokenAmount>(serde_json::json!(-1)).is_err());
    }

    #[test]
    fn display_amount_keeps_text() {
        let a: DisplayAmount = serde_json::from_value(serde_json::json!(0.1)).unwrap();
        assert_eq!(a.as_str(), "0.1");
        let b: DisplayAmount = serde_json::from_value(serde_json::json!("2.50")).unwrap();
        assert_eq!(b.to_base_unit(2).unwrap(), U256::from(250u64));
    }
}
