//! Reader tests: preamble handling, schema validation and encoding repair

mod common;

use common::{PREAMBLE, Row, ticktick_csv};
use std::path::Path;
use ticktick_to_todoist::reader::{SourceTable, parse_source, read_source};
use ticktick_to_todoist::{ConvertError, SourceEncoding, Warning, Warnings};

fn parse(bytes: &[u8], encoding: SourceEncoding) -> (SourceTable, Warnings) {
    let mut warnings = Warnings::new();
    let table = parse_source(Path::new("backup.csv"), bytes, encoding, &mut warnings).unwrap();
    (table, warnings)
}

#[test]
fn test_preamble_is_skipped() {
    let rows = vec![
        Row::new("a", "First").folder("Work").tags("alpha, beta"),
        Row::new("b", "Second").child_of("a").due("2024-05-01T08:00:00+0000"),
    ];
    let (table, warnings) = parse(&ticktick_csv(&rows), SourceEncoding::Auto);

    assert_eq!(table.tasks.len(), 2);
    assert!(warnings.is_empty());

    let first = &table.tasks[0];
    assert_eq!(first.id, "a");
    assert_eq!(first.title, "First");
    assert_eq!(first.folder.as_deref(), Some("Work"));
    assert_eq!(first.list.as_deref(), Some("Inbox"));
    assert_eq!(first.tags, vec!["alpha", "beta"]);
    assert_eq!(first.parent_id, None);
    assert!(!first.completed);

    let second = &table.tasks[1];
    assert_eq!(second.parent_id.as_deref(), Some("a"));
    assert_eq!(second.due_date.as_deref(), Some("2024-05-01T08:00:00+0000"));
    assert!(second.line > first.line);
}

#[test]
fn test_header_without_preamble_and_bom() {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    let full = ticktick_csv(&[Row::new("a", "Only")]);
    bytes.extend_from_slice(&full[PREAMBLE.len()..]);

    let (table, _) = parse(&bytes, SourceEncoding::Auto);
    assert_eq!(table.tasks.len(), 1);
    assert_eq!(table.tasks[0].title, "Only");
}

#[test]
fn test_columns_are_found_by_name() {
    let csv = "Title,Status,Priority,Due Date,Content,Tags,List Name,Folder Name\n\
               Water plants,0,5,,,home,Chores,\n";
    let (table, _) = parse(csv.as_bytes(), SourceEncoding::Auto);

    let task = &table.tasks[0];
    assert_eq!(task.title, "Water plants");
    assert_eq!(task.priority, "5");
    assert_eq!(task.list.as_deref(), Some("Chores"));
    assert_eq!(task.folder, None);
    assert_eq!(task.tags, vec!["home"]);
    // No taskId column: ids are synthesized from the line
    assert_eq!(task.id, "row-2");
    assert!(!table.has_column("parentId"));
}

#[test]
fn test_missing_columns_are_all_reported() {
    let csv = "Title,Status,Content\nSomething,0,\n";
    let mut warnings = Warnings::new();
    let err = parse_source(
        Path::new("backup.csv"),
        csv.as_bytes(),
        SourceEncoding::Auto,
        &mut warnings,
    )
    .unwrap_err();

    match err {
        ConvertError::Schema { missing, .. } => {
            assert_eq!(
                missing,
                vec!["Folder Name", "List Name", "Tags", "Due Date", "Priority"]
            );
        }
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_file_without_title_column_is_schema_error() {
    let csv = "Name,Done\nSomething,yes\n";
    let mut warnings = Warnings::new();
    let err = parse_source(Path::new("x.csv"), csv.as_bytes(), SourceEncoding::Auto, &mut warnings)
        .unwrap_err();
    match err {
        ConvertError::Schema { missing, .. } => assert!(missing.contains(&"Title".to_string())),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_is_repaired_per_field() {
    let mut bytes = ticktick_csv(&[Row::new("a", "PLACEHOLDER").content("fine")]);
    let pos = bytes
        .windows(11)
        .position(|w| w == b"PLACEHOLDER")
        .unwrap();
    let _replaced: Vec<u8> = bytes.splice(pos..pos + 11, b"Caf\xe9".iter().copied()).collect();

    let (table, warnings) = parse(&bytes, SourceEncoding::Auto);
    assert_eq!(table.tasks[0].title, "Café");
    assert_eq!(table.tasks[0].description, "fine");
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings.iter().next(),
        Some(Warning::Encoding { column, .. }) if column == "Title"
    ));
}

#[test]
fn test_latin1_override_decodes_silently() {
    let csv = b"Folder Name,List Name,Title,Tags,Content,Due Date,Priority,Status\n,Liste,R\xe9union,,,,0,0\n";
    let (table, warnings) = parse(csv, SourceEncoding::Latin1);
    assert_eq!(table.tasks[0].title, "Réunion");
    assert!(warnings.is_empty());
}

#[test]
fn test_status_values() {
    let mut unknown = Row::new("c", "Unknown");
    unknown.status = "9".to_string();
    let rows = vec![Row::new("a", "Open"), Row::new("b", "Done").completed(), unknown];
    let (table, warnings) = parse(&ticktick_csv(&rows), SourceEncoding::Auto);

    assert!(!table.tasks[0].completed);
    assert!(table.tasks[1].completed);
    assert!(!table.tasks[2].completed);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_duplicate_ids_are_made_unique() {
    let rows = vec![Row::new("a", "One"), Row::new("a", "Two")];
    let (table, warnings) = parse(&ticktick_csv(&rows), SourceEncoding::Auto);

    assert_eq!(table.tasks[0].id, "a");
    assert_ne!(table.tasks[1].id, "a");
    assert!(table.tasks[1].id.starts_with("a#"));
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_blank_and_short_rows() {
    let csv = "Folder Name,List Name,Title,Tags,Content,Due Date,Priority,Status\n\
               ,,,,,,,\n\
               Work,Inbox,Short row\n";
    let (table, _) = parse(csv.as_bytes(), SourceEncoding::Auto);
    assert_eq!(table.tasks.len(), 1);
    assert_eq!(table.tasks[0].title, "Short row");
    assert_eq!(table.tasks[0].priority, "");
}

#[test]
fn test_missing_file_is_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut warnings = Warnings::new();
    let err = read_source(dir.path().join("nope.csv"), SourceEncoding::Auto, &mut warnings)
        .unwrap_err();
    assert!(matches!(err, ConvertError::FileSystem { .. }));
    assert!(err.to_string().contains("nope.csv"));
}
