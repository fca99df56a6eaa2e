use super::SourcePriority;

/// Todoist CSV priority, 1 (p1, urgent) to 4 (p4, none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetPriority {
    P1,
    P2,
    P3,
    #[default]
    P4,
}

impl TargetPriority {
    pub fn as_number(self) -> u8 {
        match self {
            TargetPriority::P1 => 1,
            TargetPriority::P2 => 2,
            TargetPriority::P3 => 3,
            TargetPriority::P4 => 4,
        }
    }
}

impl From<SourcePriority> for TargetPriority {
    fn from(priority: SourcePriority) -> Self {
        match priority {
            SourcePriority::High => TargetPriority::P1,
            SourcePriority::Medium => TargetPriority::P2,
            SourcePriority::Low => TargetPriority::P3,
            SourcePriority::None => TargetPriority::P4,
        }
    }
}

/// A task mapped to Todoist's model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetTask {
    /// Sanitized title, without label tokens
    pub content: String,
    pub description: Option<String>,
    /// Normalized labels in first-seen order, no duplicates, no empty entries
    pub labels: Vec<String>,
    /// Already in Todoist's date literal format
    pub due_date: Option<String>,
    pub priority: TargetPriority,
    /// 1 for top-level tasks
    pub indent: usize,
    pub checked: bool,
    /// Line of the source row this task came from
    pub source_line: u64,
}

impl TargetTask {
    /// Add a label unless it is empty or already present
    pub fn add_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if label.is_empty() || self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// CONTENT cell: the title followed by `@label` tokens
    pub fn content_with_labels(&self) -> String {
        let mut content = self.content.clone();
        for label in &self.labels {
            content.push_str(" @");
            content.push_str(label);
        }
        content
    }

    /// Rows this task occupies in an output file
    pub fn row_count(&self, notes_as_rows: bool) -> usize {
        if notes_as_rows && self.description.is_some() {
            2
        } else {
            1
        }
    }
}

/// Value of the TYPE column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Task,
    Note,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Task => "task",
            RowKind::Note => "note",
        }
    }
}

/// One line of a Todoist import file
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRow {
    pub kind: RowKind,
    pub content: String,
    pub description: String,
    pub priority: String,
    pub indent: String,
    pub date: String,
}

impl TargetRow {
    /// Todoist CSV template header
    pub const HEADER: [&'static str; 12] = [
        "TYPE",
        "CONTENT",
        "DESCRIPTION",
        "PRIORITY",
        "INDENT",
        "AUTHOR",
        "RESPONSIBLE",
        "DATE",
        "DATE_LANG",
        "TIMEZONE",
        "DURATION",
        "DURATION_UNIT",
    ];

    /// Build the rows for a task: the task itself and, when requested, a note row
    pub fn from_task(task: &TargetTask, notes_as_rows: bool) -> Vec<TargetRow> {
        let description = if notes_as_rows {
            String::new()
        } else {
            task.description.clone().unwrap_or_default()
        };
        let mut rows = vec![TargetRow {
            kind: RowKind::Task,
            content: task.content_with_labels(),
            description,
            priority: task.priority.as_number().to_string(),
            indent: task.indent.to_string(),
            date: task.due_date.clone().unwrap_or_default(),
        }];
        if notes_as_rows && let Some(ref note) = task.description {
            rows.push(TargetRow {
                kind: RowKind::Note,
                content: note.clone(),
                description: String::new(),
                priority: String::new(),
                indent: String::new(),
                date: String::new(),
            });
        }
        rows
    }

    /// Cells in header order
    pub fn to_record(&self) -> [&str; 12] {
        [
            self.kind.as_str(),
            self.content.as_str(),
            self.description.as_str(),
            self.priority.as_str(),
            self.indent.as_str(),
            "",
            "",
            self.date.as_str(),
            "en",
            "UTC",
            "",
            "None",
        ]
    }
}
