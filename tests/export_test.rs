mod helpers;

use helpers::{entry, temp_store};
use memlens::config::ExportConfig;
use memlens::export::{render_card, render_markdown, render_pdf, select_card_entry};
use memlens::journal::filter::EntryFilter;

#[test]
fn markdown_of_two_entries_has_two_blocks_in_order() {
    let entries = vec![
        entry("2024-01-02T10:00:00", "Second day", "sadness"),
        entry("2024-01-01T10:00:00", "First day", "joy"),
    ];
    let md = render_markdown(&ExportConfig::default().title, &entries);

    assert_eq!(md.matches("# Memory Lens Journal").count(), 1);
    let blocks: Vec<&str> = md
        .split("\n\n")
        .filter(|chunk| chunk.starts_with("**"))
        .collect();
    assert_eq!(
        blocks,
        vec![
            "**2024-01-02T10:00:00** — *sadness*",
            "**2024-01-01T10:00:00** — *joy*",
        ]
    );
}

#[test]
fn exports_cover_the_filtered_view_of_a_stored_journal() {
    let (_tmp, store) = temp_store();
    store.append(&entry("2024-01-01T10:00:00", "Beach day", "joy")).unwrap();
    store.append(&entry("2024-01-02T10:00:00", "Rainy commute", "sadness")).unwrap();
    store.append(&entry("2024-01-03T10:00:00", "Beach again", "joy")).unwrap();

    let entries = store.load().unwrap();
    let view = EntryFilter::default().keyword("beach").apply(&entries).unwrap();

    let md = render_markdown("Beach log", &view);
    assert!(md.contains("Beach day"));
    assert!(md.contains("Beach again"));
    assert!(!md.contains("Rainy commute"));

    let pdf = render_pdf("Beach log", &view).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn pdf_export_accepts_any_text() {
    let entries = vec![
        entry("2024-01-01T10:00:00", "Emoji 🎉🎉 and CJK 漢字 and dashes —", "joy"),
        entry("2024-01-02T10:00:00", &"long ".repeat(5000), "neutral"),
    ];
    let pdf = render_pdf("Journal", &entries).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.len() > 1000);
}

#[test]
fn card_renders_selected_entry_as_png() {
    let entries = vec![
        entry("2024-01-01T10:00:00", "First", "joy"),
        entry("2024-01-02T10:00:00", "Second", "fear"),
    ];
    let config = ExportConfig::default();
    let chosen = select_card_entry(&entries, "2024-01-02T10:00:00").unwrap();
    assert_eq!(chosen.entry, "Second");

    let png = render_card(chosen, config.card_width, config.card_height).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
