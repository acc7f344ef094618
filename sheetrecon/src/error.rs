use crate::address::CellAddress;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("No period marked with {markers} found on sheet \"{sheet}\" (row {row})")]
    NotFound {
        sheet: String,
        row: u32,
        markers: String,
    },

    #[error("Sheet \"{0}\" has no non-empty data column")]
    NoDataColumn(String),

    #[error("Values match, but the line-item label cell in the model ({address}) is empty")]
    EmptyLabelInModel { address: CellAddress },

    #[error("Lookup table for \"{category}\" / {source_kind} is unavailable: {reason}")]
    ConfigurationMissing {
        category: String,
        source_kind: String,
        reason: String,
    },

    #[error("Unknown statement category: {0}")]
    UnknownCategory(String),

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("Sheet \"{0}\" not found in workbook")]
    SheetNotFound(String),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
