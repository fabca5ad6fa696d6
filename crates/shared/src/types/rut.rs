//! Chilean RUT (Rol Único Tributario).
//!
//! The RUT is the business key that joins payroll book rows with liquidation
//! records, so every RUT entering the engine is normalized to one canonical
//! form (`12345678-5`: no dots, upper-case check digit) and its modulo-11
//! check digit is verified.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing a RUT.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RutError {
    /// The input was empty after stripping separators.
    #[error("RUT is empty")]
    Empty,

    /// The body contains a non-digit character or has an invalid length.
    #[error("Invalid RUT format: {0}")]
    InvalidFormat(String),

    /// The check digit does not match the body.
    #[error("Invalid RUT check digit for {rut}: expected {expected}")]
    InvalidCheckDigit {
        /// The normalized input.
        rut: String,
        /// The check digit the body requires.
        expected: char,
    },
}

/// A validated, normalized RUT.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rut {
    body: u32,
    check_digit: char,
}

impl Rut {
    /// Parses and validates a RUT in any common notation
    /// (`12.345.678-5`, `12345678-5`, `123456785`, ` 12345678-5 `).
    ///
    /// # Errors
    ///
    /// Returns `RutError` when the input is empty, malformed, or fails the
    /// modulo-11 check.
    pub fn parse(input: &str) -> Result<Self, RutError> {
        let cleaned: String = input
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' ' | '\t'))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let Some((split, check_digit)) = cleaned.char_indices().last() else {
            return Err(RutError::Empty);
        };
        let body_str = &cleaned[..split];

        if body_str.is_empty()
            || body_str.len() > 9
            || !body_str.chars().all(|c| c.is_ascii_digit())
            || !(check_digit.is_ascii_digit() || check_digit == 'K')
        {
            return Err(RutError::InvalidFormat(input.to_string()));
        }

        let body: u32 = body_str
            .parse()
            .map_err(|_| RutError::InvalidFormat(input.to_string()))?;
        if body == 0 {
            return Err(RutError::InvalidFormat(input.to_string()));
        }

        let expected = Self::compute_check_digit(body);
        if expected != check_digit {
            return Err(RutError::InvalidCheckDigit {
                rut: format!("{body}-{check_digit}"),
                expected,
            });
        }

        Ok(Self { body, check_digit })
    }

    /// Computes the modulo-11 check digit for a RUT body.
    #[must_use]
    pub fn compute_check_digit(body: u32) -> char {
        let mut sum = 0u32;
        let mut factor = 2u32;
        let mut remaining = body;

        while remaining > 0 {
            sum += (remaining % 10) * factor;
            remaining /= 10;
            factor = if factor == 7 { 2 } else { factor + 1 };
        }

        match 11 - (sum % 11) {
            11 => '0',
            10 => 'K',
            // Always a single decimal digit here.
            n => char::from_digit(n, 10).unwrap_or('0'),
        }
    }

    /// Returns the numeric body (without check digit).
    #[must_use]
    pub const fn body(&self) -> u32 {
        self.body
    }

    /// Returns the check digit (`0`-`9` or `K`).
    #[must_use]
    pub const fn check_digit(&self) -> char {
        self.check_digit
    }

    /// Formats with thousands separators, e.g. `12.345.678-5`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let digits = self.body.to_string();
        let mut grouped = String::with_capacity(digits.len() + 4);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{grouped}-{}", self.check_digit)
    }
}

impl std::fmt::Display for Rut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.body, self.check_digit)
    }
}

impl std::str::FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rut {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12.345.678-5", "12345678-5")]
    #[case("12345678-5", "12345678-5")]
    #[case("123456785", "12345678-5")]
    #[case(" 11.111.111-1 ", "11111111-1")]
    #[case("10.000.013-k", "10000013-K")]
    #[case("16543210-K", "16543210-K")]
    #[case("14.000.000-0", "14000000-0")]
    #[case("7.654.321-6", "7654321-6")]
    fn test_parse_normalizes(#[case] input: &str, #[case] expected: &str) {
        let rut = Rut::parse(input).unwrap();
        assert_eq!(rut.to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("K")]
    #[case("12.34A.678-5")]
    #[case("1234567890123-1")]
    #[case("0-0")]
    #[case("12345678-X")]
    #[case("12345678-ñ")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(Rut::parse(input).is_err(), "{input:?} should be rejected");
    }

    #[test]
    fn test_parse_rejects_wrong_check_digit() {
        let err = Rut::parse("12.345.678-9").unwrap_err();
        assert_eq!(
            err,
            RutError::InvalidCheckDigit {
                rut: "12345678-9".to_string(),
                expected: '5',
            }
        );
    }

    #[test]
    fn test_equivalent_notations_are_equal() {
        assert_eq!(
            Rut::parse("12.345.678-5").unwrap(),
            Rut::parse("123456785").unwrap()
        );
    }

    #[rstest]
    #[case(12_345_678, '5')]
    #[case(11_111_111, '1')]
    #[case(10_000_013, 'K')]
    #[case(14_000_000, '0')]
    #[case(76_086_428, '5')]
    fn test_compute_check_digit(#[case] body: u32, #[case] expected: char) {
        assert_eq!(Rut::compute_check_digit(body), expected);
    }

    #[test]
    fn test_formatted() {
        assert_eq!(Rut::parse("123456785").unwrap().formatted(), "12.345.678-5");
        assert_eq!(Rut::parse("76543216").unwrap().formatted(), "7.654.321-6");
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let rut = Rut::parse("12.345.678-5").unwrap();
        let json = serde_json::to_string(&rut).unwrap();
        assert_eq!(json, "\"12345678-5\"");

        let back: Rut = serde_json::from_str("\"12.345.678-5\"").unwrap();
        assert_eq!(back, rut);

        assert!(serde_json::from_str::<Rut>("\"12.345.678-0\"").is_err());
    }
}
