//! Location string deobfuscation.
//!
//! The API returns download URLs as a "location": a digit giving a row count
//! followed by the percent-encoded URL scrambled by a row transposition.
//! Decoding lays the payload out row-major in `rows` rows (the first
//! `len % rows` rows one character longer) and reads it back column-major.
//! The unscrambled text is percent-decoded and `^` stands in for `0`.

use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    Empty,
    InvalidRows(char),
    EmptyPayload,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Empty => write!(f, "location is empty"),
            LocationError::InvalidRows(c) => {
                write!(f, "location must start with a digit 1-9, found '{c}'")
            }
            LocationError::EmptyPayload => write!(f, "location has no payload"),
        }
    }
}

impl Error for LocationError {}

/// Decodes a location into the real download URL.
///
/// # Example
///
/// ```
/// let url = decode_location("3adgbecf")?;
/// assert_eq!(url, "abcdefg");
/// ```
pub fn decode_location(location: &str) -> Result<String, LocationError> {
    let mut chars = location.chars();
    let first = chars.next().ok_or(LocationError::Empty)?;
    let rows = match first.to_digit(10) {
        Some(rows) if rows > 0 => rows as usize,
        _ => return Err(LocationError::InvalidRows(first)),
    };

    let payload = chars.as_str();
    if payload.is_empty() {
        return Err(LocationError::EmptyPayload);
    }

    let url = unscramble(payload, rows);
    let decoded = urlencoding::decode_binary(url.as_bytes());
    Ok(String::from_utf8_lossy(&decoded).replace('^', "0"))
}

/// Reverses the row transposition of a location payload.
pub fn unscramble(payload: &str, rows: usize) -> String {
    let chars: Vec<char> = payload.chars().collect();
    if rows <= 1 {
        return payload.to_string();
    }

    let len = chars.len();
    let cols = len / rows;
    let long_rows = len % rows;

    let mut matrix: Vec<&[char]> = Vec::with_capacity(rows);
    let mut start = 0;
    for row in 0..rows {
        let width = if row < long_rows { cols + 1 } else { cols };
        matrix.push(&chars[start..start + width]);
        start += width;
    }

    (0..len).map(|i| matrix[i % rows][i / rows]).collect()
}

/// Applies the row transposition, the inverse of [`unscramble`].
pub fn scramble(plain: &str, rows: usize) -> String {
    if rows <= 1 {
        return plain.to_string();
    }

    let chars: Vec<char> = plain.chars().collect();
    (0..rows)
        .flat_map(|row| chars.iter().skip(row).step_by(rows))
        .collect()
}
