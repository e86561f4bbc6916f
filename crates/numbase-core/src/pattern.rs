//! Recognition patterns: full-string validators that also extract digits.
//!
//! Radix markers (`0x`, `h`, `b`) are matched case-insensitively; the digit
//! payload keeps its own case. Decimal numerals are strict: no sign, no
//! separators, no fractional part.

use crate::radix::Radix;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const BINARY_SOURCE: &str = r"^([01]+)[bB]?$";
const HEXADECIMAL_SOURCE: &str = r"^(?:0[xX])?([0-9a-fA-F]+)[hH]?$";
const DECIMAL_SOURCE: &str = r"^([0-9]+)$";

static BINARY: LazyLock<RecognitionPattern> =
    LazyLock::new(|| RecognitionPattern::compile(Radix::Binary, BINARY_SOURCE));
static HEXADECIMAL: LazyLock<RecognitionPattern> =
    LazyLock::new(|| RecognitionPattern::compile(Radix::Hexadecimal, HEXADECIMAL_SOURCE));
static DECIMAL: LazyLock<RecognitionPattern> =
    LazyLock::new(|| RecognitionPattern::compile(Radix::Decimal, DECIMAL_SOURCE));

/// A compiled, anchored pattern accepting the notations of one radix.
///
/// Patterns are built once per process and shared; use
/// [`RecognitionPattern::for_radix`] or [`Radix::pattern`] to get one.
pub struct RecognitionPattern {
    radix: Radix,
    regex: Regex,
}

impl RecognitionPattern {
    fn compile(radix: Radix, source: &str) -> Self {
        // Sources are constants covered by tests.
        let regex = Regex::new(source).expect("recognition pattern must compile");
        Self { radix, regex }
    }

    /// The shared pattern for a radix.
    pub fn for_radix(radix: Radix) -> &'static RecognitionPattern {
        match radix {
            Radix::Binary => &BINARY,
            Radix::Decimal => &DECIMAL,
            Radix::Hexadecimal => &HEXADECIMAL,
        }
    }

    /// The radix whose notations this pattern accepts.
    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// The regular expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Match `input` as a whole and return its significant digit run.
    ///
    /// Prefix and suffix markers are excluded from the returned slice.
    pub fn digits<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.regex
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl fmt::Debug for RecognitionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognitionPattern")
            .field("radix", &self.radix)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl PartialEq for RecognitionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.radix == other.radix && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for RecognitionPattern {}
