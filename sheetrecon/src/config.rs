//! Configuration for a reconciliation run

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::address::column_index;
use crate::matching::MatchSettings;

/// Fill color marking model rows that were already wired up (solid yellow)
pub const PROCESSED_FILL: &str = "FFFFFF00";

/// Main reconciliation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 1-based row holding period headers on standard model sheets
    pub header_row: u32,
    /// Column with line-item labels in the model
    pub model_label_column: String,
    /// Column with line-item labels in the issuer report
    pub issuer_label_column: String,
    /// ARGB fill of model label cells that must be skipped
    pub processed_fill: String,
    /// Header suffixes marking a forecast period
    pub forecast_markers: Vec<String>,
    /// Sheet name fragments selecting the balance-sheet layout
    pub balance_markers: Vec<String>,
    /// 1-based model row used when no start cell can be matched
    pub fallback_model_row: u32,
    /// Directory holding the per-category lookup tables
    pub lookup_dir: PathBuf,
}

impl ReconcileConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ReconcileConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate values that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.header_row == 0 {
            anyhow::bail!("Configuration error: header_row is 1-based and cannot be 0");
        }
        if self.fallback_model_row == 0 {
            anyhow::bail!("Configuration error: fallback_model_row is 1-based and cannot be 0");
        }
        for (key, letters) in [
            ("model_label_column", &self.model_label_column),
            ("issuer_label_column", &self.issuer_label_column),
        ] {
            if column_index(letters).is_none() {
                anyhow::bail!(
                    "Configuration error: '{}' in {} is not a column letter",
                    letters,
                    key
                );
            }
        }
        if self.forecast_markers.iter().all(|m| m.is_empty()) {
            anyhow::bail!("Configuration error: forecast_markers needs at least one marker");
        }
        if self.balance_markers.iter().any(|m| m.is_empty()) {
            anyhow::bail!("Configuration error: balance_markers cannot contain empty entries");
        }
        if self.processed_fill.len() != 8
            || !self.processed_fill.chars().all(|c| c.is_ascii_hexdigit())
        {
            anyhow::bail!(
                "Configuration error: processed_fill '{}' is not an ARGB color",
                self.processed_fill
            );
        }
        Ok(())
    }

    /// 0-based header row
    pub fn header_row_index(&self) -> u32 {
        self.header_row.saturating_sub(1)
    }

    /// 0-based fallback row for the model start cell
    pub fn fallback_model_row_index(&self) -> u32 {
        self.fallback_model_row.saturating_sub(1)
    }

    /// Settings consumed by the row-matching engine
    pub fn match_settings(&self) -> Result<MatchSettings> {
        let model_label_column = column_index(&self.model_label_column).with_context(|| {
            format!("Invalid model label column: {}", self.model_label_column)
        })?;
        let issuer_label_column = column_index(&self.issuer_label_column).with_context(|| {
            format!("Invalid issuer label column: {}", self.issuer_label_column)
        })?;
        Ok(MatchSettings {
            model_label_column,
            issuer_label_column,
            processed_fill: self.processed_fill.clone(),
        })
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            header_row: 2,
            model_label_column: "B".to_string(),
            issuer_label_column: "A".to_string(),
            processed_fill: PROCESSED_FILL.to_string(),
            forecast_markers: vec!["F".to_string(), "П".to_string()],
            balance_markers: vec!["Баланс".to_string(), "Balance".to_string()],
            fallback_model_row: 4,
            lookup_dir: PathBuf::from("data"),
        }
    }
}
