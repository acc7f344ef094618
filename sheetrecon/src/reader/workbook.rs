//! Workbook data structures

use crate::address::CellAddress;
use crate::error::{ReconcileError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Represents a loaded workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Source file, empty when the workbook was read from memory
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get a sheet by name, failing with `SheetNotFound`
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.get_sheet(name)
            .ok_or_else(|| ReconcileError::SheetNotFound(name.to_string()))
    }

    /// Get all sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet as a sparse grid of 0-based cells
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get a cell by address
    pub fn cell_at(&self, address: CellAddress) -> Option<&Cell> {
        self.get_cell(address.row, address.col)
    }

    /// Value at the given position, `Empty` when the cell does not exist
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.get_cell(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Set a cell value, keeping any fill already recorded for it
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) -> &mut Cell {
        let cell = self
            .cells
            .entry((row, col))
            .or_insert_with(|| Cell::new(row, col, CellValue::Empty));
        cell.value = value;
        cell
    }

    /// Set the fill color of a cell, creating an empty cell when needed
    pub fn set_fill(&mut self, row: u32, col: u32, argb: impl Into<String>) -> &mut Cell {
        let cell = self
            .cells
            .entry((row, col))
            .or_insert_with(|| Cell::new(row, col, CellValue::Empty));
        cell.fill = Some(argb.into());
        cell
    }

    /// First row holding any cell
    pub fn min_row(&self) -> Option<u32> {
        self.cells.keys().map(|&(r, _)| r).min()
    }

    /// Last row holding any cell
    pub fn max_row(&self) -> Option<u32> {
        self.cells.keys().map(|&(r, _)| r).max()
    }

    /// Last column holding any cell, including styled cells without a value
    pub fn max_column(&self) -> Option<u32> {
        self.cells.keys().map(|&(_, c)| c).max()
    }

    /// Cells of one column from `min_row` downwards, top to bottom
    pub fn column(&self, col: u32, min_row: u32) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = self
            .cells
            .values()
            .filter(|c| c.col == col && c.row >= min_row)
            .collect();
        cells.sort_by_key(|c| c.row);
        cells
    }

    /// Cells of one row from `min_col` rightwards, left to right
    pub fn row(&self, row: u32, min_col: u32) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = self
            .cells
            .values()
            .filter(|c| c.row == row && c.col >= min_col)
            .collect();
        cells.sort_by_key(|c| c.col);
        cells
    }

    /// A column is empty when none of its cells holds a value
    pub fn is_column_empty(&self, col: u32) -> bool {
        self.cells
            .values()
            .filter(|c| c.col == col)
            .all(|c| c.value.is_empty())
    }
}

/// Represents a single cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
    /// ARGB foreground color of the cell's pattern fill, e.g. "FFFFFF00"
    pub fill: Option<String>,
}

impl Cell {
    pub fn new(row: u32, col: u32, value: CellValue) -> Self {
        Self {
            row,
            col,
            value,
            fill: None,
        }
    }

    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Check whether the fill matches an ARGB color, ignoring case
    pub fn has_fill(&self, argb: &str) -> bool {
        self.fill
            .as_deref()
            .is_some_and(|fill| fill.eq_ignore_ascii_case(argb))
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    /// Date-formatted number (Excel serial date); not treated as a number
    DateTime(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric content, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether a label cell carries nothing usable.
    ///
    /// Absent values, empty text, zero and `false` all count as blank.
    pub fn is_blank_label(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0,
            CellValue::Boolean(b) => !b,
            CellValue::DateTime(_) | CellValue::Error(_) => false,
        }
    }

    /// Render the value as label text. `Empty` renders as an empty string.
    pub fn to_label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) | CellValue::DateTime(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "True".to_string(),
            CellValue::Boolean(false) => "False".to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}
