//! Cell references ("B12") and column-letter arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CellbridgeError, Result};

/// Largest column Excel accepts ("XFD").
pub const MAX_COLUMN: u32 = 16_384;

/// A 1-based (column, row) cell position.
///
/// Addresses sort by row first, then column, which is the order cells appear
/// in a worksheet part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    column: u32,
    row: u32,
}

impl CellAddress {
    /// Create an address, rejecting a zero row or a column outside `1..=MAX_COLUMN`.
    pub fn new(column: u32, row: u32) -> Result<Self> {
        if column == 0 || column > MAX_COLUMN || row == 0 {
            return Err(CellbridgeError::MalformedReference(format!(
                "column {column}, row {row}"
            )));
        }
        Ok(Self { column, row })
    }

    /// Parse a reference such as `"b12"` into column 2, row 12.
    pub fn parse(reference: &str) -> Result<Self> {
        let malformed = || CellbridgeError::MalformedReference(reference.to_string());

        let split = reference
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(malformed)?;
        let (letters, digits) = reference.split_at(split);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let column = column_number(letters)
            .filter(|column| *column <= MAX_COLUMN)
            .ok_or_else(malformed)?;
        let row: u32 = digits.parse().map_err(|_| malformed())?;
        if row == 0 {
            return Err(malformed());
        }

        Ok(Self { column, row })
    }

    /// Format column and row back into a reference.
    pub fn format(column: u32, row: u32) -> String {
        format!("{}{}", column_letters(column), row)
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column letters of this address ("AA" for column 27).
    pub fn column_name(&self) -> String {
        column_letters(self.column)
    }
}

impl Ord for CellAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for CellAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = CellbridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a 1-based column number to letters (1 → "A", 27 → "AA").
///
/// Returns an empty string for column 0.
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = ((column - 1) % 26) as u8;
        letters.push(b'A' + rem);
        column = (column - 1) / 26;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Convert column letters to a 1-based number, case-insensitively.
///
/// Returns `None` for empty input, non-letters, or overflow.
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}
