//! Row-matching engine: pairs model and issuer rows sharing a period value

use log::{debug, info};

use crate::address::CellAddress;
use crate::compare::cells_match;
use crate::config::PROCESSED_FILL;
use crate::equivalence::Equivalence;
use crate::error::{ReconcileError, Result};
use crate::reader::{CellValue, Sheet};

/// Where labels live and which model rows to leave alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    /// 0-based label column of the model (B by default)
    pub model_label_column: u32,
    /// 0-based label column of the issuer report (A by default)
    pub issuer_label_column: u32,
    /// ARGB fill of model label cells that were already processed
    pub processed_fill: String,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            model_label_column: 1,
            issuer_label_column: 0,
            processed_fill: PROCESSED_FILL.to_string(),
        }
    }
}

/// Pair every model value with every issuer value it matches.
///
/// Both columns are walked downwards from their start cells and every
/// non-empty cell takes part: numbers are equal after truncation, other
/// values must be identical (see [`cells_match`]). For each equal pair the
/// model label is read from the same row: an empty label aborts the whole
/// pass with [`ReconcileError::EmptyLabelInModel`], labels containing `%`
/// and labels filled with the processed color are skipped. Records come out
/// in model-row order, then issuer-row order, without deduplication.
pub fn match_rows(
    model: &Sheet,
    issuer: &Sheet,
    model_start: CellAddress,
    issuer_start: CellAddress,
    settings: &MatchSettings,
) -> Result<Vec<Equivalence>> {
    let issuer_values: Vec<(u32, &CellValue)> = issuer
        .column(issuer_start.col, issuer_start.row)
        .into_iter()
        .filter(|c| !c.value.is_empty())
        .map(|c| (c.row, &c.value))
        .collect();

    let mut equivalents = Vec::new();
    let mut skipped = 0usize;

    for cell in model.column(model_start.col, model_start.row) {
        if cell.value.is_empty() {
            continue;
        }

        for &(issuer_row, issuer_value) in &issuer_values {
            if !cells_match(&cell.value, issuer_value) {
                continue;
            }

            let label_address = CellAddress::new(cell.row, settings.model_label_column);
            let label_cell = model.cell_at(label_address);
            let label = match label_cell {
                Some(label_cell) if !label_cell.value.is_blank_label() => label_cell,
                _ => {
                    return Err(ReconcileError::EmptyLabelInModel {
                        address: label_address,
                    });
                }
            };

            let model_label = label.value.to_label();
            // Percentage rows truncate to zero
            if model_label.contains('%') {
                debug!("Skipping percentage row {}: {}", label_address, model_label);
                skipped += 1;
                continue;
            }
            if label.has_fill(&settings.processed_fill) {
                debug!("Skipping processed row {}: {}", label_address, model_label);
                skipped += 1;
                continue;
            }

            equivalents.push(Equivalence {
                issuer_label: issuer
                    .value(issuer_row, settings.issuer_label_column)
                    .to_label(),
                model_label,
                model_cell: cell.address(),
                issuer_cell: CellAddress::new(issuer_row, issuer_start.col),
            });
        }
    }

    info!(
        "Matched {} rows between '{}' and '{}' ({} skipped)",
        equivalents.len(),
        model.name,
        issuer.name,
        skipped
    );
    Ok(equivalents)
}
