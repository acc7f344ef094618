//! Locating the fiscal-period column of a model sheet

use log::debug;

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Result};
use crate::reader::Sheet;

/// How period columns are laid out on a model sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// Balance sheets: the latest reported period is the last filled column
    Balance,
    /// Everything else: period headers on a header row, forecasts marked "F"/"П"
    Standard,
}

impl SheetLayout {
    /// Balance layout when the sheet name contains one of the markers (case-sensitive)
    pub fn detect<S: AsRef<str>>(sheet_name: &str, balance_markers: &[S]) -> Self {
        if balance_markers
            .iter()
            .any(|marker| sheet_name.contains(marker.as_ref()))
        {
            SheetLayout::Balance
        } else {
            SheetLayout::Standard
        }
    }
}

/// Find the first forecast-period column, scanning the header row left to right.
///
/// `header_row` defaults to the first populated row of the sheet. Only text
/// cells ending with one of `markers` qualify. All indices are 0-based.
pub fn locate_forecast_column<S: AsRef<str>>(
    sheet: &Sheet,
    header_row: Option<u32>,
    start_column: u32,
    markers: &[S],
) -> Result<u32> {
    let not_found = |row: u32| ReconcileError::NotFound {
        sheet: sheet.name.clone(),
        row: row + 1,
        markers: markers
            .iter()
            .map(|m| m.as_ref())
            .collect::<Vec<_>>()
            .join(" or "),
    };

    let row = match header_row.or_else(|| sheet.min_row()) {
        Some(row) => row,
        None => return Err(not_found(0)),
    };

    sheet
        .row(row, start_column)
        .into_iter()
        .find(|cell| {
            cell.value.as_text().is_some_and(|text| {
                markers
                    .iter()
                    .any(|m| !m.as_ref().is_empty() && text.ends_with(m.as_ref()))
            })
        })
        .map(|cell| cell.col)
        .ok_or_else(|| not_found(row))
}

/// Find the last column holding any value, scanning right to left.
///
/// The first column holds labels and is never returned.
pub fn locate_last_data_column(sheet: &Sheet) -> Result<u32> {
    let last = sheet.max_column().unwrap_or(0);
    (1..=last)
        .rev()
        .find(|&col| !sheet.is_column_empty(col))
        .ok_or_else(|| ReconcileError::NoDataColumn(sheet.name.clone()))
}

/// Column of the latest reported (non-forecast) period of a model sheet
pub fn locate_reported_column(sheet: &Sheet, config: &ReconcileConfig) -> Result<u32> {
    let layout = SheetLayout::detect(&sheet.name, config.balance_markers.as_slice());
    let column = match layout {
        SheetLayout::Balance => locate_last_data_column(sheet)?,
        SheetLayout::Standard => {
            let forecast = locate_forecast_column(
                sheet,
                Some(config.header_row_index()),
                0,
                config.forecast_markers.as_slice(),
            )?;
            // A forecast in the first column leaves no reported period before it
            forecast
                .checked_sub(1)
                .ok_or_else(|| ReconcileError::NoDataColumn(sheet.name.clone()))?
        }
    };

    debug!(
        "Sheet '{}' uses {:?} layout, reported column {}",
        sheet.name,
        layout,
        crate::address::column_letter(column)
    );
    Ok(column)
}
