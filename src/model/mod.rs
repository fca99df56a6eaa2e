//! Task models on both sides of the conversion
//!
//! - `source`: TickTick records as read from the backup CSV
//! - `target`: Todoist rows ready to be written

mod source;
mod target;

pub use source::{SourcePriority, SourceTask};
pub use target::{RowKind, TargetPriority, TargetRow, TargetTask};
