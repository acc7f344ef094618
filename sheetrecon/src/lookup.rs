//! Static lookup tables of known issuer spellings per canonical model label
//!
//! One TOML file per statement category, one table per data-source kind:
//!
//! ```toml
//! ["XLSX statements"]
//! "Выручка" = """
//! revenue
//! revenue from contracts with customers"""
//! "Себестоимость" = ["cost of sales", "cost of revenue"]
//! ```

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ReconcileError, Result};

/// Block of financial statements a lookup table covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementCategory {
    BalanceSheet,
    IncomeStatement,
    Segments,
    CashFlow,
}

impl StatementCategory {
    pub const ALL: [StatementCategory; 4] = [
        StatementCategory::BalanceSheet,
        StatementCategory::IncomeStatement,
        StatementCategory::Segments,
        StatementCategory::CashFlow,
    ];

    /// Name as entered by users
    pub fn name(&self) -> &'static str {
        match self {
            StatementCategory::BalanceSheet => "Баланс",
            StatementCategory::IncomeStatement => "Финансовые результаты",
            StatementCategory::Segments => "Сегменты",
            StatementCategory::CashFlow => "Отчет о движении денежных средств",
        }
    }

    /// File holding this category's lookup table
    pub fn table_file(&self) -> &'static str {
        match self {
            StatementCategory::BalanceSheet => "balance_config.toml",
            StatementCategory::IncomeStatement => "income_config.toml",
            StatementCategory::Segments => "segments_config.toml",
            StatementCategory::CashFlow => "cashflow_config.toml",
        }
    }
}

impl fmt::Display for StatementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatementCategory {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| ReconcileError::UnknownCategory(s.to_string()))
    }
}

/// Kind of issuer document the report was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    Xbrl,
    Xlsx,
    Pdf,
}

impl DataSource {
    pub const ALL: [DataSource; 3] = [DataSource::Xbrl, DataSource::Xlsx, DataSource::Pdf];

    pub fn name(&self) -> &'static str {
        match self {
            DataSource::Xbrl => "XBRL",
            DataSource::Xlsx => "XLSX",
            DataSource::Pdf => "PDF",
        }
    }

    /// Section of a lookup table holding spellings for this source
    pub fn section(&self) -> &'static str {
        match self {
            DataSource::Xbrl => "XBRL template",
            DataSource::Xlsx => "XLSX statements",
            DataSource::Pdf => "PDF statements",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataSource {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|source| source.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReconcileError::UnknownSource(s.to_string()))
    }
}

/// A canonical model label and the issuer spellings known for it
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub canonical: String,
    pub spellings: Vec<String>,
    lowered: Vec<String>,
}

impl LookupEntry {
    pub fn new<S: Into<String>>(canonical: impl Into<String>, spellings: Vec<S>) -> Self {
        let spellings: Vec<String> = spellings.into_iter().map(Into::into).collect();
        let lowered = spellings.iter().map(|s| s.to_lowercase()).collect();
        Self {
            canonical: canonical.into(),
            spellings,
            lowered,
        }
    }

    /// Whether `needle` (already lower-cased) occurs inside any known spelling
    fn mentions(&self, needle: &str) -> bool {
        self.lowered.iter().any(|spelling| spelling.contains(needle))
    }
}

/// Entries of one data-source section, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupSection {
    entries: Vec<LookupEntry>,
}

impl LookupSection {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// Canonical labels whose spellings contain `issuer_label`, ignoring case.
    ///
    /// Labels are capitalized (first letter upper, the rest lower). An empty
    /// issuer label has no alternatives.
    pub fn alternatives_for(&self, issuer_label: &str) -> Vec<String> {
        let needle = issuer_label.to_lowercase();
        // "" is a substring of every spelling; a blank issuer label names nothing
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.mentions(&needle))
            .map(|entry| capitalize(&entry.canonical))
            .collect()
    }
}

/// Lookup table of one statement category, keyed by section name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    sections: HashMap<String, LookupSection>,
}

impl LookupTable {
    /// Load a table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lookup table: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse lookup table: {}", path.display()))
    }

    /// Parse a table from TOML text. Values are newline-separated strings or string arrays.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let document: toml::Table = content.parse()?;
        let mut table = LookupTable::default();

        for (section_name, section) in document {
            let toml::Value::Table(section) = section else {
                anyhow::bail!("'{}' is not a section", section_name);
            };

            let mut entries = Vec::new();
            for (canonical, value) in section {
                let spellings: Vec<String> = match value {
                    toml::Value::String(s) => s
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect(),
                    toml::Value::Array(items) => items
                        .iter()
                        .map(|item| {
                            item.as_str().map(str::to_string).with_context(|| {
                                format!("'{}' in [{}] lists a non-string", canonical, section_name)
                            })
                        })
                        .collect::<anyhow::Result<_>>()?,
                    other => anyhow::bail!(
                        "'{}' in [{}] must be a string or an array, found {}",
                        canonical,
                        section_name,
                        other.type_str()
                    ),
                };
                entries.push(LookupEntry::new(canonical, spellings));
            }
            table.insert_section(section_name, LookupSection::new(entries));
        }

        Ok(table)
    }

    pub fn insert_section(&mut self, name: impl Into<String>, section: LookupSection) {
        self.sections.insert(name.into(), section);
    }

    pub fn section(&self, name: &str) -> Option<&LookupSection> {
        self.sections.get(name)
    }
}

/// Lookup tables for all statement categories available to a run
#[derive(Debug, Clone, Default)]
pub struct LookupCatalog {
    dir: Option<PathBuf>,
    tables: HashMap<StatementCategory, std::result::Result<LookupTable, String>>,
}

impl LookupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every category table present in `dir`.
    ///
    /// Missing files are left out and unreadable ones are remembered with
    /// their error; both surface as `ConfigurationMissing` when requested.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let mut catalog = Self {
            dir: Some(dir.to_path_buf()),
            tables: HashMap::new(),
        };

        for category in StatementCategory::ALL {
            let path = dir.join(category.table_file());
            if !path.exists() {
                continue;
            }
            let table = LookupTable::from_file(&path).map_err(|e| {
                warn!("Lookup table for '{}' is unusable: {:#}", category, e);
                format!("{:#}", e)
            });
            catalog.tables.insert(category, table);
        }

        catalog
    }

    pub fn insert(&mut self, category: StatementCategory, table: LookupTable) {
        self.tables.insert(category, Ok(table));
    }

    /// Section for a category and data source, or `ConfigurationMissing`
    pub fn section(
        &self,
        category: StatementCategory,
        source: DataSource,
    ) -> Result<&LookupSection> {
        let missing = |reason: String| ReconcileError::ConfigurationMissing {
            category: category.name().to_string(),
            source_kind: source.name().to_string(),
            reason,
        };

        let table = match self.tables.get(&category) {
            Some(Ok(table)) => table,
            Some(Err(reason)) => return Err(missing(reason.clone())),
            None => {
                let reason = match &self.dir {
                    Some(dir) => format!(
                        "{} not found",
                        dir.join(category.table_file()).display()
                    ),
                    None => "no lookup table loaded".to_string(),
                };
                return Err(missing(reason));
            }
        };

        table
            .section(source.section())
            .ok_or_else(|| missing(format!("section [{}] not found", source.section())))
    }
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
