//! CLI `list` and `emotions` commands.

use anyhow::Result;

use memlens::config::MemlensConfig;
use memlens::journal::filter::emotion_options;
use memlens::journal::types::Entry;
use memlens::journal::{reflection_prompt, EMPTY_JOURNAL_MESSAGE};
use memlens::nlp::{Entity, Models};

use super::{load_entries, FilterArgs};

/// Print matching entries, newest first. Without `plain`, each entry also gets
/// keywords, named entities, and a reflection prompt.
pub fn list(config: &MemlensConfig, args: &FilterArgs, plain: bool) -> Result<()> {
    let entries = load_entries(config)?;
    if entries.is_empty() {
        println!("{EMPTY_JOURNAL_MESSAGE}");
        return Ok(());
    }

    let matched = args.to_filter(&entries)?.apply(&entries)?;
    if matched.is_empty() {
        println!("No entries match your filters/search.");
        return Ok(());
    }

    let models = Models::new(config);
    for entry in matched.iter().rev() {
        print_entry(entry);
        if !plain {
            print_annotations(entry, &models, config.insights.entry_keywords)?;
        }
        println!();
    }
    Ok(())
}

fn print_entry(entry: &Entry) {
    println!("{} - {}", entry.timestamp, entry.emotion);
    println!("{}", "-".repeat(50));
    println!("{}", entry.entry);
    println!();
    println!("  Summary:   {}", entry.summary);
}

fn print_annotations(entry: &Entry, models: &Models, top_n: usize) -> Result<()> {
    let keywords = models.keywords()?.extract(&entry.entry, top_n)?;
    if !keywords.is_empty() {
        let words: Vec<&str> = keywords.iter().map(|(w, _)| w.as_str()).collect();
        println!("  Keywords:  {}", words.join(", "));
    }

    let entities = models.entities()?.recognize(&entry.entry)?;
    if !entities.is_empty() {
        println!("  Entities:  {}", format_entities(&entities));
    }

    println!("  {}", reflection_prompt(&entry.emotion));
    Ok(())
}

fn format_entities(entities: &[Entity]) -> String {
    entities
        .iter()
        .map(|e| format!("{} ({})", e.text, e.label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the emotion filter choices for the current journal.
pub fn emotions(config: &MemlensConfig) -> Result<()> {
    let entries = load_entries(config)?;
    for option in emotion_options(&entries) {
        println!("{option}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_render_with_their_labels() {
        let entities = vec![
            Entity {
                text: "Ada".into(),
                label: "PER".into(),
            },
            Entity {
                text: "London".into(),
                label: "LOC".into(),
            },
        ];
        assert_eq!(format_entities(&entities), "Ada (PER), London (LOC)");
    }
}
