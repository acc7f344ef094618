//! A1-style cell addresses

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Accepted shape of a user-entered start address ("B12", "AB3")
static ADDRESS_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,3}[0-9]{1,3}$").expect("valid address pattern"));

/// Cell address with 0-based row and column (displayed as "B4")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Column letters of this address ("B" for column 1)
    pub fn column_letter(&self) -> String {
        column_letter(self.col)
    }

    /// 1-based row number as shown in spreadsheet applications
    pub fn row_number(&self) -> u32 {
        self.row + 1
    }

    /// Parse an A1 reference. Lower-case letters are accepted; `$` anchors are not.
    pub fn parse(cell_ref: &str) -> Option<Self> {
        let letters: String = cell_ref
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let digits = &cell_ref[letters.len()..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let col = column_index(&letters)?;
        let row = digits.parse::<u32>().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self::new(row - 1, col))
    }
}

/// Convert a 0-based column number to letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

/// Convert column letters to a 0-based column number ("A" -> 0, "AA" -> 26)
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut col = 0u32;
    for ch in letters.chars() {
        col = col
            .checked_mul(26)?
            .checked_add(ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }
    Some(col - 1)
}

/// Validate a start address typed by the user.
///
/// The input is trimmed and upper-cased first. Anything that is not one to
/// three letters followed by one to three digits is rejected with `None`, so
/// the caller can ask again.
pub fn check_cell_address(input: &str) -> Option<CellAddress> {
    let normalized = input.trim().to_uppercase();
    if !ADDRESS_INPUT.is_match(&normalized) {
        return None;
    }
    CellAddress::parse(&normalized)
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row_number())
    }
}

impl FromStr for CellAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid cell address: {s}"))
    }
}

impl From<CellAddress> for String {
    fn from(address: CellAddress) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for CellAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialOrd for CellAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row.cmp(&other.row).then_with(|| self.col.cmp(&other.col))
    }
}
