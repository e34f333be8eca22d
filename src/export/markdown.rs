use crate::journal::types::Entry;

/// Render entries as a Markdown document, preserving input order.
pub fn render_markdown(title: &str, entries: &[Entry]) -> String {
    let blocks: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "**{}** — *{}*\n\n{}\n\n_{}_",
                e.timestamp, e.emotion, e.entry, e.summary
            )
        })
        .collect();
    format!("# {title}\n\n{}", blocks.join("\n\n"))
}
