//! Output formatters for reconciliation results

use anyhow::Result;
use colored::*;
use sheetrecon::{AnchorOrigin, EnrichedEquivalence, Equivalence, ReconcileError, StartCoordinates};
use std::path::Path;

use crate::OutputFormat;

pub fn print_sheets(file_path: &Path, names: &[&str]) {
    println!("{}", format!("Pages of {}:", file_path.display()).bold());
    for (i, name) in names.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, name.cyan());
    }
}

pub fn print_invalid_address(input: &str) {
    eprintln!(
        "{} '{}' is not a cell address (expected letters then a row number, e.g. C4)",
        "Invalid cell:".red().bold(),
        input
    );
}

fn origin_label(origin: AnchorOrigin) -> ColoredString {
    match origin {
        AnchorOrigin::Matched => "matched by value".green(),
        AnchorOrigin::Fallback => "default position, no shared value found".yellow(),
        AnchorOrigin::Manual => "entered".normal(),
    }
}

pub fn print_anchors_human(start: &StartCoordinates) {
    println!("{} {}", "Model start: ".bold(), start.model.to_string().yellow());
    println!("{} {}", "Issuer start:".bold(), start.issuer.to_string().yellow());
    println!("  ({})", origin_label(start.origin));
}

pub fn print_anchors_json(start: &StartCoordinates) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(start)?);
    Ok(())
}

/// Print enriched pairs grouped by whether they need a rename
pub fn print_human(start: &StartCoordinates, records: &[EnrichedEquivalence]) {
    println!(
        "{} model {} / issuer {} ({})",
        "Start cells:".bold(),
        start.model.to_string().yellow(),
        start.issuer.to_string().yellow(),
        origin_label(start.origin)
    );
    println!();

    if records.is_empty() {
        println!("{}", "No matching rows found".yellow().bold());
        return;
    }

    for record in records {
        println!(
            "{} {} {}  {}",
            record.model_label().cyan().bold(),
            "=".bright_black(),
            record.issuer_label(),
            format!(
                "[{} ↔ {}]",
                record.equivalence.model_cell, record.equivalence.issuer_cell
            )
            .bright_black()
        );
        if record.is_canonical() {
            println!("  {}", "✓ No rename needed".green());
        } else if record.alternatives.is_empty() {
            println!("  {}", "Rename to: (no known alternatives)".yellow());
        } else {
            println!("  {}", "Rename to:".yellow());
            for alternative in &record.alternatives {
                println!("    {}", alternative);
            }
        }
    }

    let canonical = records.iter().filter(|r| r.is_canonical()).count();
    println!();
    println!("{}", "Summary:".bold().underline());
    println!("  {} {}", "Matched:".bold(), records.len());
    println!("  {} {}", "No rename needed:".green().bold(), canonical);
    println!(
        "  {} {}",
        "Rename suggested:".yellow().bold(),
        records.len() - canonical
    );
}

pub fn print_json(start: &StartCoordinates, records: &[EnrichedEquivalence]) -> Result<()> {
    let output = serde_json::json!({
        "start": start,
        "equivalents": records,
        "summary": {
            "total": records.len(),
            "no_rename_needed": records.iter().filter(|r| r.is_canonical()).count(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print matches whose enrichment failed, with the reason on stderr
pub fn print_unenriched(
    equivalents: &[Equivalence],
    error: &ReconcileError,
    format: OutputFormat,
) -> Result<()> {
    eprintln!("{} {}", "Error:".red().bold(), error);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "equivalents": equivalents,
                "error": error.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            for equivalence in equivalents {
                println!("{} = {}", equivalence.model_label, equivalence.issuer_label);
            }
        }
    }
    Ok(())
}
