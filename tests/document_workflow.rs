use std::fs;

use mdedit::config::{load_config_from, save_config_to, Settings};
use mdedit::editor::Document;
use mdedit::error::Error;
use mdedit::markdown::{MarkdownConstruct, Selection};

#[test]
fn test_edit_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.md");
    fs::write(&path, "Groceries\nmilk\neggs").unwrap();

    let mut doc = Document::open(&path).unwrap();
    doc.set_selection(Selection::new(0, 9));
    doc.apply(&MarkdownConstruct::header(2)).unwrap();
    doc.set_selection(Selection::new(13, 17));
    doc.apply(&MarkdownConstruct::Checklist).unwrap();
    assert_eq!(doc.text(), "## Groceries\n- [ ] milk\neggs");
    doc.save().unwrap();

    let reopened = Document::open(&path).unwrap();
    assert_eq!(reopened.text(), "## Groceries\n- [ ] milk\neggs");
    assert!(!reopened.is_modified());
    assert!(!reopened.can_undo());
}

#[test]
fn test_toggle_state_follows_caret() {
    let mut doc = Document::with_text("- item");
    doc.set_selection(Selection::caret(3));
    assert!(doc.formatting_state().is_list_item);

    assert!(!doc.toggle(&MarkdownConstruct::ListItem).unwrap());
    assert_eq!(doc.text(), "item");
    assert_eq!(doc.selection(), Selection::caret(1));
    assert!(!doc.formatting_state().is_list_item);

    assert!(doc.undo());
    assert_eq!(doc.text(), "- item");
}

#[test]
fn test_undo_after_save_marks_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.markdown");

    let mut doc = Document::with_text("draft");
    doc.set_selection(Selection::all("draft"));
    doc.apply(&MarkdownConstruct::Italic).unwrap();
    doc.save_as(&path).unwrap();
    assert!(!doc.is_modified());

    assert!(doc.undo());
    assert!(doc.is_modified());
    assert!(doc.redo());
    assert!(!doc.is_modified());
}

#[test]
fn test_open_rejects_non_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "plain").unwrap();

    assert!(matches!(
        Document::open(&path),
        Err(Error::UnsupportedFileType { .. })
    ));
}

#[test]
fn test_out_of_range_selection_is_rejected_when_checked() {
    let doc = Document::with_text("short");
    let err = Selection::checked(doc.text(), 2, 40).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { len: 5, .. }));
}

#[test]
fn test_settings_drive_document_behaviour() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("mdedit").join("config.json");

    let mut settings = Settings {
        max_undo_history: 2,
        default_link_url: "https://example.com".to_string(),
        ..Settings::default()
    };
    settings.table_template.top = "| a | b |".to_string();
    save_config_to(&config, &settings).unwrap();
    let settings = load_config_from(&config).unwrap();

    let mut doc = Document::with_text("").with_history_limit(settings.max_undo_history);
    doc.apply(&settings.link("home", None)).unwrap();
    assert_eq!(doc.text(), "[home](https://example.com)");

    doc.replace_selection("\n");
    doc.apply(&settings.table_template.to_construct()).unwrap();
    assert!(doc.text().ends_with("| a | b |\n|---|---|\n|   |   |"));

    assert_eq!(doc.history().undo_count(), 2);
}

#[test]
fn test_toggle_removes_selected_link() {
    let settings = Settings::default();
    let text = "see [docs](https://docs.rs) now";
    let mut doc = Document::with_text(text);
    doc.set_selection(Selection::new(4, 27));

    let link = settings.link_for_selection(doc.selected_text(), None, None);
    assert!(doc.is_active(&link));
    assert!(!doc.toggle(&link).unwrap());
    assert_eq!(doc.text(), "see https://docs.rs now");

    assert!(doc.undo());
    assert_eq!(doc.text(), text);
}

#[test]
fn test_toggle_italic_on_bold_selection_adds_italic() {
    let mut doc = Document::with_text("**bold**");
    doc.set_selection(Selection::all("**bold**"));

    assert!(!doc.is_active(&MarkdownConstruct::Italic));
    assert!(doc.toggle(&MarkdownConstruct::Italic).unwrap());
    assert_eq!(doc.text(), "***bold***");
}
