//! Plain-text rename report

use crate::equivalence::EnrichedEquivalence;

/// Render one block per record:
///
/// ```text
/// Выручка = Revenue
/// Rename to:
/// Доходы
/// ```
///
/// Records whose only alternative is the model label read `No rename needed`.
/// Blocks are separated by a blank line.
pub fn render_text(records: &[EnrichedEquivalence]) -> String {
    records
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(record: &EnrichedEquivalence) -> String {
    let mut lines = vec![format!("{} = {}", record.model_label(), record.issuer_label())];
    if record.is_canonical() {
        lines.push("No rename needed".to_string());
    } else {
        lines.push("Rename to:".to_string());
        lines.extend(record.alternatives.iter().cloned());
    }
    lines.join("\n")
}
