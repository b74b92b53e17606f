//! Encoding and decoding of the newline terminated text protocol.
//!
//! Each reading is sent as a single ASCII line of the form `HR:<bpm>,SpO2:<percent>\n`.
//! There is no framing beyond the terminator and nothing is ever sent back.

use crate::reading::VitalReading;
use core::str::FromStr;

pub const HEART_RATE_KEY: &str = "HR";
pub const SPO2_KEY: &str = "SpO2";
pub const TERMINATOR: char = '\n';

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Field {0} is missing")]
    MissingField(&'static str),

    #[error("Unexpected key (expected {expected})")]
    UnexpectedKey { expected: &'static str },

    #[error("Field {0} does not hold a decimal integer in range")]
    InvalidValue(&'static str),

    #[error("Unexpected data after the last field")]
    TrailingData,
}

/// Returns the line for `reading`, including the terminator.
pub fn encode(reading: &VitalReading) -> String {
    format!("{reading}{TERMINATOR}")
}

/// Parses a single line, with or without its terminator.
///
/// A carriage return before the terminator is tolerated, since some serial
/// terminals insist on sending one.
pub fn decode(line: &str) -> Result<VitalReading, DecodeError> {
    let line = line.strip_suffix(TERMINATOR).unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let mut fields = line.split(',');

    let heart_rate = decode_field(fields.next(), HEART_RATE_KEY)?;
    let spo2 = decode_field(fields.next(), SPO2_KEY)?;

    if fields.next().is_some() {
        return Err(DecodeError::TrailingData);
    }

    Ok(VitalReading::new(heart_rate, spo2))
}

fn decode_field<T: FromStr>(field: Option<&str>, key: &'static str) -> Result<T, DecodeError> {
    let field = field
        .filter(|field| !field.is_empty())
        .ok_or(DecodeError::MissingField(key))?;

    let (actual_key, value) = field
        .split_once(':')
        .ok_or(DecodeError::UnexpectedKey { expected: key })?;

    if actual_key != key {
        return Err(DecodeError::UnexpectedKey { expected: key });
    }

    // Reject signs and whitespace, which FromStr would otherwise let through
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidValue(key));
    }

    value.parse().map_err(|_| DecodeError::InvalidValue(key))
}
