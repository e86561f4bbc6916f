//! Conversion directions: the six ordered pairs of distinct radices.

use crate::radix::Radix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered (source, target) radix pair supported by the engine.
///
/// Serializes as its stable identifier (e.g. `HEXA_TO_DECIMAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConversionDirection {
    #[default]
    BinaryToDecimal,
    HexadecimalToDecimal,
    DecimalToBinary,
    DecimalToHexadecimal,
    HexadecimalToBinary,
    BinaryToHexadecimal,
}

impl ConversionDirection {
    /// All directions, in the order they are offered for selection.
    pub const ALL: [ConversionDirection; 6] = [
        ConversionDirection::BinaryToDecimal,
        ConversionDirection::HexadecimalToDecimal,
        ConversionDirection::DecimalToBinary,
        ConversionDirection::DecimalToHexadecimal,
        ConversionDirection::HexadecimalToBinary,
        ConversionDirection::BinaryToHexadecimal,
    ];

    /// Stable identifier used in step parameters.
    pub fn id(self) -> &'static str {
        match self {
            ConversionDirection::BinaryToDecimal => "BINARY_TO_DECIMAL",
            ConversionDirection::HexadecimalToDecimal => "HEXA_TO_DECIMAL",
            ConversionDirection::DecimalToBinary => "DECIMAL_TO_BINARY",
            ConversionDirection::DecimalToHexadecimal => "DECIMAL_TO_HEXA",
            ConversionDirection::HexadecimalToBinary => "HEXA_TO_BINARY",
            ConversionDirection::BinaryToHexadecimal => "BINARY_TO_HEXA",
        }
    }

    /// Human-readable label shown in selection lists.
    pub fn label(self) -> &'static str {
        match self {
            ConversionDirection::BinaryToDecimal => "Binary to Decimal",
            ConversionDirection::HexadecimalToDecimal => "Hexadecimal to Decimal",
            ConversionDirection::DecimalToBinary => "Decimal to Binary",
            ConversionDirection::DecimalToHexadecimal => "Decimal to Hexadecimal",
            ConversionDirection::HexadecimalToBinary => "Hexadecimal to Binary",
            ConversionDirection::BinaryToHexadecimal => "Binary to Hexadecimal",
        }
    }

    /// Short phrase used in one-line step summaries.
    pub fn summary(self) -> &'static str {
        match self {
            ConversionDirection::BinaryToDecimal => "binary to decimal",
            ConversionDirection::HexadecimalToDecimal => "hexa to decimal",
            ConversionDirection::DecimalToBinary => "decimal to binary",
            ConversionDirection::DecimalToHexadecimal => "decimal to hexa",
            ConversionDirection::HexadecimalToBinary => "hexa to binary",
            ConversionDirection::BinaryToHexadecimal => "binary to hexa",
        }
    }

    pub fn source(self) -> Radix {
        match self {
            ConversionDirection::BinaryToDecimal | ConversionDirection::BinaryToHexadecimal => {
                Radix::Binary
            }
            ConversionDirection::HexadecimalToDecimal
            | ConversionDirection::HexadecimalToBinary => Radix::Hexadecimal,
            ConversionDirection::DecimalToBinary | ConversionDirection::DecimalToHexadecimal => {
                Radix::Decimal
            }
        }
    }

    pub fn target(self) -> Radix {
        match self {
            ConversionDirection::BinaryToDecimal | ConversionDirection::HexadecimalToDecimal => {
                Radix::Decimal
            }
            ConversionDirection::DecimalToBinary | ConversionDirection::HexadecimalToBinary => {
                Radix::Binary
            }
            ConversionDirection::DecimalToHexadecimal
            | ConversionDirection::BinaryToHexadecimal => Radix::Hexadecimal,
        }
    }

    /// The direction converting `source` into `target`, if they differ.
    pub fn between(source: Radix, target: Radix) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.source() == source && d.target() == target)
    }

    /// Resolve a direction from a configured identifier.
    ///
    /// Accepts, ignoring ASCII case: the canonical identifier, the label, and
    /// the identifiers used by earlier configurations (`BINTODECIMAL`,
    /// `HEXADECIMALTOBINARY`, ...).
    pub fn from_id(id: &str) -> Result<Self, UnknownDirection> {
        let trimmed = id.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.aliases().iter().any(|a| a.eq_ignore_ascii_case(trimmed)))
            .ok_or_else(|| UnknownDirection(id.to_string()))
    }

    fn aliases(self) -> [&'static str; 4] {
        let (legacy, script) = match self {
            ConversionDirection::BinaryToDecimal => ("BINTODECIMAL", "BINARYTODECIMAL"),
            ConversionDirection::HexadecimalToDecimal => {
                ("HEXATODECIMAL", "HEXADECIMALTODECIMAL")
            }
            ConversionDirection::DecimalToBinary => ("DECIMALTOBIN", "DECIMALTOBINARY"),
            ConversionDirection::DecimalToHexadecimal => {
                ("DECIMALTOHEXA", "DECIMALTOHEXADECIMAL")
            }
            ConversionDirection::HexadecimalToBinary => ("HEXATOBIN", "HEXADECIMALTOBINARY"),
            ConversionDirection::BinaryToHexadecimal => ("BINTOHEXA", "BINARYTOHEXADECIMAL"),
        };
        [self.id(), self.label(), legacy, script]
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConversionDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

impl From<ConversionDirection> for String {
    fn from(direction: ConversionDirection) -> Self {
        direction.id().to_string()
    }
}

impl TryFrom<String> for ConversionDirection {
    type Error = UnknownDirection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_id(&value)
    }
}

/// A direction identifier that names none of the six directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversion direction: '{0}'")]
pub struct UnknownDirection(pub String);
