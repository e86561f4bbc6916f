//! Better error messages with actionable suggestions.

use rhi_numbase_core::{ConversionDirection, Radix};

/// Build an error message for a mode that names no conversion direction.
pub fn unknown_mode_error(input: &str) -> String {
    let mut msg = format!("Unknown conversion mode '{}'", input);

    if let Some(suggestion) = find_similar_mode(input) {
        msg.push_str(&format!(
            ".\n\nDid you mean '{}'? Use --mode {} to select it.",
            suggestion.label(),
            suggestion.id()
        ));
        return msg;
    }

    msg.push_str(".\n\nAvailable modes:\n");
    msg.push_str(&available_modes());
    msg
}

/// Build an error message for when no mode was given anywhere.
pub fn missing_mode_error() -> String {
    format!(
        "No conversion mode given. Use --mode <MODE>, a preset, or set `mode` under [defaults] in the config file.\n\nAvailable modes:\n{}",
        available_modes()
    )
}

/// Build an error message for when no input column was given anywhere.
pub fn missing_input_column_error() -> String {
    "No input column given. Use --input-column <COLUMN>, a preset, or set inputColumn in a --params file."
        .to_string()
}

/// Build an error message for file read errors.
pub fn file_read_error(path: &str, err: &std::io::Error) -> String {
    use std::io::ErrorKind;

    let mut msg = format!("Failed to read '{}'", path);

    match err.kind() {
        ErrorKind::NotFound => {
            msg.push_str(": file not found");
        }
        ErrorKind::PermissionDenied => {
            msg.push_str(": permission denied. Check file permissions.");
        }
        ErrorKind::InvalidData => {
            msg.push_str(": file contains invalid data.");
        }
        _ => {
            msg.push_str(&format!(": {}", err));
        }
    }

    msg
}

fn available_modes() -> String {
    ConversionDirection::ALL
        .iter()
        .map(|d| format!("  {:<18} {}", d.id(), d.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Guess the direction meant by shorthand such as `hex2dec` or `bin-to-hex`.
fn find_similar_mode(input: &str) -> Option<ConversionDirection> {
    let lowered = input.to_lowercase().replace("to", " ").replace('2', " ");
    let radices: Vec<Radix> = lowered
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .map(radix_from_word)
        .collect::<Option<_>>()?;

    match radices.as_slice() {
        [source, target] => ConversionDirection::between(*source, *target),
        _ => None,
    }
}

fn radix_from_word(word: &str) -> Option<Radix> {
    match word.chars().next()? {
        'b' => Some(Radix::Binary),
        'd' => Some(Radix::Decimal),
        'h' | 'x' => Some(Radix::Hexadecimal),
        _ => None,
    }
}
