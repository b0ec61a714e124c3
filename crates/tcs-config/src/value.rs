//! Interpretation of raw scalar text.

use std::fmt;
use std::num::IntErrorKind;

/// Why an `<int>` literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntError {
    Empty,
    InvalidDigit,
    Overflow,
}

impl fmt::Display for IntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntError::Empty => f.write_str("no digits"),
            IntError::InvalidDigit => f.write_str("invalid digit or trailing characters"),
            IntError::Overflow => f.write_str("out of range for a 64-bit integer"),
        }
    }
}

/// `true` or `false`, exactly.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse an integer literal whose radix follows its prefix: `0x`/`0X` is
/// hexadecimal, a leading `0` is octal, anything else decimal. An optional
/// sign may precede the prefix.
///
/// Leading whitespace is skipped; the rest of the string must be consumed.
///
/// ```
/// use tcs_config::parse_int;
///
/// assert_eq!(parse_int("0x20"), Ok(32));
/// assert_eq!(parse_int("010"), Ok(8));
/// assert_eq!(parse_int(" -5"), Ok(-5));
/// assert!(parse_int("1abc").is_err());
/// ```
pub fn parse_int(text: &str) -> Result<i64, IntError> {
    let trimmed = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);

    let (sign, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    if unsigned.is_empty() {
        return Err(IntError::Empty);
    }

    let hex_digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()));

    let (radix, digits) = match hex_digits {
        Some(rest) => (16, rest),
        None if unsigned.starts_with('0') => (8, unsigned),
        None => (10, unsigned),
    };

    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(IntError::InvalidDigit);
    }

    i64::from_str_radix(&format!("{sign}{digits}"), radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => IntError::Overflow,
        IntErrorKind::Empty => IntError::Empty,
        _ => IntError::InvalidDigit,
    })
}
