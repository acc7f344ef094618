//! Label pairs produced by reconciliation

use serde::{Deserialize, Serialize};

use crate::address::CellAddress;

/// One matched pair of line items, before enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equivalence {
    /// Line-item label in the issuer report
    pub issuer_label: String,
    /// Line-item label in the model, never empty
    pub model_label: String,
    /// Matched value cell in the model
    pub model_cell: CellAddress,
    /// Matched value cell in the issuer report
    pub issuer_cell: CellAddress,
}

impl Equivalence {
    /// Attach the alternative model labels found by enrichment
    pub fn enriched(self, alternatives: Vec<String>) -> EnrichedEquivalence {
        EnrichedEquivalence {
            equivalence: self,
            alternatives,
        }
    }
}

/// A matched pair together with the model labels the lookup table suggests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEquivalence {
    #[serde(flatten)]
    pub equivalence: Equivalence,
    pub alternatives: Vec<String>,
}

impl EnrichedEquivalence {
    pub fn model_label(&self) -> &str {
        &self.equivalence.model_label
    }

    pub fn issuer_label(&self) -> &str {
        &self.equivalence.issuer_label
    }

    /// The model label already is the only canonical name for this item
    pub fn is_canonical(&self) -> bool {
        matches!(self.alternatives.as_slice(), [only] if *only == self.equivalence.model_label)
    }
}
