//! The shared conversion routine and the converters bound to it.

use crate::direction::ConversionDirection;
use crate::params::ConfigError;
use crate::pattern::RecognitionPattern;
use crate::radix::Radix;

/// Convert a numeral from `source` to `target`.
///
/// `input` must be present; an absent input is a caller error. An input that
/// `pattern` does not accept is not an error: the result is the empty string.
/// Otherwise the digits captured by `pattern` are read in `source` with
/// unbounded precision and written in `target` (upper-case for hexadecimal).
pub fn convert_numeral(
    input: Option<&str>,
    source: Radix,
    pattern: &RecognitionPattern,
    target: Radix,
) -> Result<String, ConvertError> {
    let input = input.ok_or_else(|| ConvertError::InvalidArgument("input cannot be null".into()))?;

    let Some(digits) = pattern.digits(input) else {
        return Ok(String::new());
    };
    let Some(value) = source.parse_digits(digits) else {
        return Ok(String::new());
    };

    let output = target.format(&value);
    tracing::trace!(%source, %target, input, output = %output, "converted numeral");
    Ok(output)
}

/// Trait for converters bound to a single direction.
///
/// Implementations are pure: no state is kept between calls and the same
/// input always yields the same output.
pub trait Converter: Send + Sync {
    /// The direction this converter is bound to.
    fn direction(&self) -> ConversionDirection;

    /// Convert one value.
    ///
    /// Returns the empty string when `input` is not a numeral in the source
    /// radix, and [`ConvertError::InvalidArgument`] when it is absent.
    fn convert(&self, input: Option<&str>) -> Result<String, ConvertError>;
}

/// The converter for one [`ConversionDirection`].
///
/// Built once at setup, then shared freely: it is `Copy` and holds only
/// references to the process-wide recognition patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralConverter {
    direction: ConversionDirection,
    source: Radix,
    pattern: &'static RecognitionPattern,
    target: Radix,
}

impl NumeralConverter {
    pub fn new(direction: ConversionDirection) -> Self {
        let source = direction.source();
        Self {
            direction,
            source,
            pattern: source.pattern(),
            target: direction.target(),
        }
    }

    pub fn source(&self) -> Radix {
        self.source
    }

    pub fn target(&self) -> Radix {
        self.target
    }

    pub fn pattern(&self) -> &'static RecognitionPattern {
        self.pattern
    }
}

impl From<ConversionDirection> for NumeralConverter {
    fn from(direction: ConversionDirection) -> Self {
        Self::new(direction)
    }
}

impl Converter for NumeralConverter {
    fn direction(&self) -> ConversionDirection {
        self.direction
    }

    fn convert(&self, input: Option<&str>) -> Result<String, ConvertError> {
        convert_numeral(input, self.source, self.pattern, self.target)
    }
}

/// Build the converter for a configured direction identifier.
///
/// Unknown identifiers are a configuration error, reported before any value
/// is converted.
pub fn make_converter(direction: &str) -> Result<NumeralConverter, ConfigError> {
    let direction = ConversionDirection::from_id(direction)?;
    Ok(NumeralConverter::new(direction))
}

/// Errors that can occur while converting a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
