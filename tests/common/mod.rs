//! Common test utilities for integration tests

#![allow(dead_code)]

use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Column layout of a TickTick backup
pub const TICKTICK_HEADER: [&str; 24] = [
    "Folder Name",
    "List Name",
    "Title",
    "Kind",
    "Tags",
    "Content",
    "Is Check list",
    "Start Date",
    "Due Date",
    "Reminder",
    "Repeat",
    "Priority",
    "Status",
    "Created Time",
    "Completed Time",
    "Order",
    "Timezone",
    "Is All Day",
    "Is Floating",
    "Column Name",
    "Column Order",
    "View Mode",
    "taskId",
    "parentId",
];

/// Metadata TickTick writes above the header
pub const PREAMBLE: &str = "\"Date: 2024-03-01+0000\"\n\"Version: 7.1\"\n\"Status: \n0 Normal\n1 Completed\n2 Archived\"\n";

/// One task row of a fixture export
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub folder: String,
    pub list: String,
    pub title: String,
    pub tags: String,
    pub content: String,
    pub due: String,
    pub priority: String,
    pub status: String,
    pub all_day: String,
    pub timezone: String,
    pub task_id: String,
    pub parent_id: String,
}

impl Row {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            task_id: id.to_string(),
            priority: "0".to_string(),
            status: "0".to_string(),
            all_day: "false".to_string(),
            timezone: "Europe/Oslo".to_string(),
            list: "Inbox".to_string(),
            ..Default::default()
        }
    }

    pub fn child_of(mut self, parent: &str) -> Self {
        self.parent_id = parent.to_string();
        self
    }

    pub fn folder(mut self, folder: &str) -> Self {
        self.folder = folder.to_string();
        self
    }

    pub fn tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_string();
        self
    }

    pub fn due(mut self, due: &str) -> Self {
        self.due = due.to_string();
        self
    }

    /// All-day due date in `timezone`
    pub fn all_day(mut self, timezone: &str) -> Self {
        self.all_day = "true".to_string();
        self.timezone = timezone.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.priority = priority.to_string();
        self
    }

    pub fn completed(mut self) -> Self {
        self.status = "2".to_string();
        self
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            self.folder.as_str(),
            self.list.as_str(),
            self.title.as_str(),
            "TEXT",
            self.tags.as_str(),
            self.content.as_str(),
            "N",
            "",
            self.due.as_str(),
            "",
            "",
            self.priority.as_str(),
            self.status.as_str(),
            "2024-01-01T10:00:00+0000",
            "",
            "0",
            self.timezone.as_str(),
            self.all_day.as_str(),
            "false",
            "",
            "",
            "list",
            self.task_id.as_str(),
            self.parent_id.as_str(),
        ]
    }
}

/// Independent tasks `t1..=tN`
pub fn flat_rows(count: usize) -> Vec<Row> {
    (1..=count)
        .map(|i| Row::new(&format!("t{}", i), &format!("Task {}", i)))
        .collect()
}

/// Full export bytes: preamble, header and rows
pub fn ticktick_csv(rows: &[Row]) -> Vec<u8> {
    let mut out = PREAMBLE.as_bytes().to_vec();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut out);
        writer.write_record(TICKTICK_HEADER).unwrap();
        for row in rows {
            writer.write_record(row.cells()).unwrap();
        }
        writer.flush().unwrap();
    }
    out
}

/// Write an export into `dir` and return its path
pub fn write_export(dir: &Path, rows: &[Row]) -> PathBuf {
    let path = dir.join("ticktick_backup.csv");
    fs::write(&path, ticktick_csv(rows)).unwrap();
    path
}

/// Data rows of a generated Todoist file (header checked and skipped)
pub fn read_output(path: &Path) -> Vec<Vec<String>> {
    let bytes = fs::read(path).unwrap();
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    assert_eq!(
        reader.headers().unwrap().get(0),
        Some("TYPE"),
        "unexpected header in {}",
        path.display()
    );
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// CONTENT column without the trailing `@label` tokens
pub fn title_of(row: &[String]) -> String {
    row[1]
        .split(" @")
        .next()
        .unwrap_or_default()
        .to_string()
}

/// `@label` tokens of the CONTENT column
pub fn labels_of(row: &[String]) -> Vec<String> {
    row[1].split(" @").skip(1).map(str::to_string).collect()
}

/// INDENT column as a number
pub fn indent_of(row: &[String]) -> usize {
    row[4].parse().unwrap()
}
