//! Numeric comparisons used when pairing cells across workbooks
//!
//! Start-cell discovery compares raw values, row matching compares values
//! truncated toward zero.

use crate::reader::CellValue;

/// Raw numeric equality, used to find the issuer column holding a model value
pub fn exact_eq(a: f64, b: f64) -> bool {
    a == b
}

/// Equality after dropping the fractional part of both values.
///
/// Truncates toward zero, never rounds: 100.7 and 100.2 are equal,
/// 100.7 and 101.1 are not.
pub fn truncated_eq(a: f64, b: f64) -> bool {
    a.trunc() == b.trunc()
}

/// Equality of two cell values during row matching.
///
/// Numbers compare with [`truncated_eq`]. Dates, text, booleans and errors
/// compare exactly and only with their own kind. Empty cells and empty text
/// never match.
pub fn cells_match(a: &CellValue, b: &CellValue) -> bool {
    let blank = |v: &CellValue| v.is_empty() || v.as_text() == Some("");
    if blank(a) || blank(b) {
        return false;
    }
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => truncated_eq(*x, *y),
        (CellValue::DateTime(x), CellValue::DateTime(y)) => exact_eq(*x, *y),
        _ => a == b,
    }
}
