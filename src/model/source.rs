use std::str::FromStr;

/// TickTick priority scale (0, 1, 3, 5 in the backup CSV)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourcePriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl FromStr for SourcePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "none" => Ok(SourcePriority::None),
            "1" | "low" => Ok(SourcePriority::Low),
            "3" | "medium" => Ok(SourcePriority::Medium),
            "5" | "high" => Ok(SourcePriority::High),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: 0, 1, 3, 5",
                s
            )),
        }
    }
}

/// One task row of a TickTick backup
///
/// Text fields are kept exactly as decoded; cleaning happens in the
/// transformer so that indentation in titles is still visible to hierarchy
/// detection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceTask {
    /// `taskId`, or `row-<line>` when the export has none
    pub id: String,
    pub title: String,
    /// TickTick `Content`
    pub description: String,
    pub folder: Option<String>,
    pub list: Option<String>,
    /// Tags in export order, duplicates removed
    pub tags: Vec<String>,
    /// Raw `Due Date` value
    pub due_date: Option<String>,
    pub all_day: bool,
    /// IANA zone name from the `Timezone` column
    pub timezone: Option<String>,
    /// Raw `Priority` value; parsed by the transformer
    pub priority: String,
    pub completed: bool,
    pub parent_id: Option<String>,
    /// 1-based line in the source file
    pub line: u64,
}

impl SourceTask {
    /// Create a task with only an id and a title set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}
