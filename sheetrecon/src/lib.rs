//! sheetrecon: Core library for reconciling financial-statement line items
//!
//! This library matches the rows of an analyst's model sheet with the rows of
//! a parsed issuer report by their values in a shared fiscal period, and
//! suggests canonical label renames from static lookup tables.

pub mod address;
pub mod anchor;
pub mod compare;
pub mod config;
pub mod enrich;
pub mod equivalence;
pub mod error;
pub mod locate;
pub mod lookup;
pub mod matching;
pub mod reader;
pub mod report;

use log::debug;

pub use address::{CellAddress, check_cell_address};
pub use anchor::{AnchorOrigin, StartCoordinates};
pub use config::ReconcileConfig;
pub use equivalence::{EnrichedEquivalence, Equivalence};
pub use error::{ReconcileError, Result};
pub use lookup::{DataSource, LookupCatalog, StatementCategory};
pub use matching::MatchSettings;
pub use reader::{Cell, CellValue, Sheet, Workbook};

/// Inputs of one reconciliation run
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    pub model: &'a Sheet,
    pub issuer: &'a Sheet,
    pub start: StartCoordinates,
    pub category: StatementCategory,
    pub source: DataSource,
}

/// Output of a reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Matched pairs, in model-row order
    pub equivalents: Vec<Equivalence>,
    /// Enriched pairs, or the reason the lookup table was unavailable
    pub enriched: Result<Vec<EnrichedEquivalence>>,
}

/// Main reconciliation interface
pub struct Reconciler {
    config: ReconcileConfig,
    catalog: LookupCatalog,
    settings: MatchSettings,
}

impl Reconciler {
    /// Create a reconciler with default configuration, loading lookup tables
    /// from the default directory
    pub fn new() -> Self {
        let config = ReconcileConfig::default();
        let catalog = LookupCatalog::load_dir(&config.lookup_dir);
        Self {
            config,
            catalog,
            settings: MatchSettings::default(),
        }
    }

    /// Create a reconciler with custom configuration; lookup tables come from
    /// its `lookup_dir`
    pub fn with_config(config: ReconcileConfig) -> anyhow::Result<Self> {
        let catalog = LookupCatalog::load_dir(&config.lookup_dir);
        Self::with_catalog(config, catalog)
    }

    /// Create a reconciler from configuration and already loaded lookup tables
    pub fn with_catalog(config: ReconcileConfig, catalog: LookupCatalog) -> anyhow::Result<Self> {
        config.validate()?;
        let settings = config.match_settings()?;
        Ok(Self {
            config,
            catalog,
            settings,
        })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LookupCatalog {
        &self.catalog
    }

    /// Suggest start cells for a model sheet and an issuer sheet
    pub fn suggest_start(&self, model: &Sheet, issuer: &Sheet) -> Result<StartCoordinates> {
        let start = anchor::suggest_start_coordinates(model, issuer, &self.config)?;
        debug!(
            "Suggested start cells: model {} / issuer {} ({:?})",
            start.model, start.issuer, start.origin
        );
        Ok(start)
    }

    /// Match rows of the request without enrichment
    pub fn match_rows(&self, request: &ReconcileRequest<'_>) -> Result<Vec<Equivalence>> {
        matching::match_rows(
            request.model,
            request.issuer,
            request.start.model,
            request.start.issuer,
            &self.settings,
        )
    }

    /// Match rows and enrich them.
    ///
    /// Matching errors fail the run. A missing lookup table only fails the
    /// `enriched` half of the result.
    pub fn reconcile(&self, request: &ReconcileRequest<'_>) -> Result<Reconciliation> {
        let equivalents = self.match_rows(request)?;
        let enriched = enrich::enrich(
            &self.catalog,
            request.category,
            request.source,
            &equivalents,
        );
        Ok(Reconciliation {
            equivalents,
            enriched,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}
