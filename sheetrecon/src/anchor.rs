//! Start-cell discovery: where row-by-row comparison begins in each sheet

use log::{debug, info};
use serde::Serialize;

use crate::address::CellAddress;
use crate::compare::exact_eq;
use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::locate::locate_reported_column;
use crate::reader::{Cell, Sheet};

/// Column the issuer fallback anchor is taken from (column B)
const FALLBACK_ISSUER_COLUMN: u32 = 1;

/// How a pair of start cells was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorOrigin {
    /// A model value was found in the issuer sheet
    Matched,
    /// No value matched; fixed default positions were used
    Fallback,
    /// Entered by the user
    Manual,
}

/// Top-of-column anchors for comparison in the model and the issuer report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartCoordinates {
    pub model: CellAddress,
    pub issuer: CellAddress,
    pub origin: AnchorOrigin,
}

impl StartCoordinates {
    pub fn manual(model: CellAddress, issuer: CellAddress) -> Self {
        Self {
            model,
            issuer,
            origin: AnchorOrigin::Manual,
        }
    }
}

/// Pair the model's fiscal column with the matching column of the issuer report.
///
/// Every non-zero number in `column` of the model is tried top to bottom. The
/// first one that also occurs in the issuer sheet (exact comparison, first
/// column skipped) fixes the issuer column; its topmost numeric cell becomes
/// the issuer anchor. When nothing matches, the model anchor falls back to
/// `fallback_model_row` of the same column and the issuer anchor to the first
/// non-zero number of column B.
pub fn resolve_start_coordinates(
    model: &Sheet,
    issuer: &Sheet,
    column: u32,
    fallback_model_row: u32,
) -> StartCoordinates {
    for cell in model.column(column, 0) {
        let Some(value) = nonzero_number(cell) else {
            continue;
        };

        if let Some(issuer_anchor) = find_issuer_anchor(issuer, value) {
            debug!(
                "Value {} at model {} found in issuer column {}",
                value,
                cell.address(),
                issuer_anchor.column_letter()
            );
            return StartCoordinates {
                model: cell.address(),
                issuer: issuer_anchor,
                origin: AnchorOrigin::Matched,
            };
        }
    }

    let issuer_anchor = issuer
        .column(FALLBACK_ISSUER_COLUMN, 0)
        .into_iter()
        .find(|c| nonzero_number(c).is_some())
        .map(Cell::address)
        .unwrap_or(CellAddress::new(0, FALLBACK_ISSUER_COLUMN));

    info!(
        "No shared value between '{}' and '{}'; using default start cells",
        model.name, issuer.name
    );
    StartCoordinates {
        model: CellAddress::new(fallback_model_row, column),
        issuer: issuer_anchor,
        origin: AnchorOrigin::Fallback,
    }
}

/// Locate the model's reported column and resolve start cells for both sheets
pub fn suggest_start_coordinates(
    model: &Sheet,
    issuer: &Sheet,
    config: &ReconcileConfig,
) -> Result<StartCoordinates> {
    let column = locate_reported_column(model, config)?;
    Ok(resolve_start_coordinates(
        model,
        issuer,
        column,
        config.fallback_model_row_index(),
    ))
}

/// Topmost numeric cell of the first issuer column (after the label column)
/// holding `value`
fn find_issuer_anchor(issuer: &Sheet, value: f64) -> Option<CellAddress> {
    let last = issuer.max_column()?;
    (1..=last).find_map(|col| {
        let cells = issuer.column(col, 0);
        let holds_value = cells
            .iter()
            .any(|c| c.value.as_number().is_some_and(|n| exact_eq(n, value)));
        if !holds_value {
            return None;
        }
        cells
            .iter()
            .find(|c| c.value.as_number().is_some())
            .map(|c| c.address())
    })
}

fn nonzero_number(cell: &Cell) -> Option<f64> {
    cell.value.as_number().filter(|&n| n != 0.0)
}
