//! Positional numeral systems supported by the engine.

use crate::pattern::RecognitionPattern;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The base of a positional numeral system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    /// Every supported radix, smallest base first.
    pub const ALL: [Radix; 3] = [Radix::Binary, Radix::Decimal, Radix::Hexadecimal];

    /// Numeric base (2, 10 or 16).
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Radix::Binary => "Binary",
            Radix::Decimal => "Decimal",
            Radix::Hexadecimal => "Hexadecimal",
        }
    }

    /// The recognition pattern for numerals written in this radix.
    pub fn pattern(self) -> &'static RecognitionPattern {
        RecognitionPattern::for_radix(self)
    }

    /// Parse a bare digit run (no prefix or suffix) in this radix.
    ///
    /// Returns `None` if `digits` is empty or contains a character outside
    /// the radix alphabet.
    pub fn parse_digits(self, digits: &str) -> Option<BigUint> {
        BigUint::parse_bytes(digits.as_bytes(), self.base())
    }

    /// Format a value as a canonical numeral in this radix.
    ///
    /// Hexadecimal letters are upper-case; no prefix, suffix or padding.
    pub fn format(self, value: &BigUint) -> String {
        let mut out = value.to_str_radix(self.base());
        if self == Radix::Hexadecimal {
            out.make_ascii_uppercase();
        }
        out
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
