//! Attach alternative model labels to matched pairs

use log::info;

use crate::equivalence::{EnrichedEquivalence, Equivalence};
use crate::error::Result;
use crate::lookup::{DataSource, LookupCatalog, LookupSection, StatementCategory};

/// Enrich every record with the canonical labels known for its issuer label.
///
/// Records are borrowed: a missing lookup table fails the call but leaves
/// the matches usable.
pub fn enrich(
    catalog: &LookupCatalog,
    category: StatementCategory,
    source: DataSource,
    equivalents: &[Equivalence],
) -> Result<Vec<EnrichedEquivalence>> {
    let section = catalog.section(category, source)?;
    let enriched = enrich_with(section, equivalents);
    info!(
        "Enriched {} records from '{}' / {} ({} with alternatives)",
        enriched.len(),
        category,
        source,
        enriched.iter().filter(|e| !e.alternatives.is_empty()).count()
    );
    Ok(enriched)
}

/// Enrich against an already selected lookup section
pub fn enrich_with(section: &LookupSection, equivalents: &[Equivalence]) -> Vec<EnrichedEquivalence> {
    equivalents
        .iter()
        .map(|equivalence| {
            let alternatives = section.alternatives_for(&equivalence.issuer_label);
            equivalence.clone().enriched(alternatives)
        })
        .collect()
}
