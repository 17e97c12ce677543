use std::fmt::{Display, Formatter};

use crate::error::TableError;
use crate::model::RecordBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    /// Marker printed in front of every log line.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Success => "[✅ Success]",
            Self::Warning => "[⚠️ Warning]",
            Self::Error => "[❌ Error]",
            Self::Info => "[ℹ️ Info]",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// One reported outcome for a page, or for one table on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    /// 1-based page number.
    pub page: u32,
    /// 1-based position of the table on its page, when the entry is about a table.
    pub table: Option<usize>,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(severity: Severity, page: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            page,
            table: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Page {}: {}",
            self.severity.marker(),
            self.page,
            self.message
        )
    }
}

/// What happened to one detected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Appended(RecordBatch),
    Empty,
    Failed(TableError),
}

impl TableOutcome {
    pub(crate) fn log_entry(&self, page: u32, table: usize) -> LogEntry {
        let entry = match self {
            Self::Appended(batch) => LogEntry::new(
                Severity::Success,
                page,
                format!("{} rows extracted.", batch.row_count()),
            ),
            Self::Empty => LogEntry::new(
                Severity::Warning,
                page,
                "Table found, but it was empty.",
            ),
            Self::Failed(error) => LogEntry::new(
                Severity::Error,
                page,
                format!("Failed to process table - {error}"),
            ),
        };
        entry.with_table(table)
    }
}

/// What happened on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    NoTables,
    Tables(Vec<TableOutcome>),
}

impl PageOutcome {
    pub(crate) fn log_entries(&self, page: u32) -> Vec<LogEntry> {
        match self {
            Self::NoTables => vec![LogEntry::new(Severity::Info, page, "No table found.")],
            Self::Tables(outcomes) => outcomes
                .iter()
                .enumerate()
                .map(|(index, outcome)| outcome.log_entry(page, index + 1))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogEntry, PageOutcome, Severity, TableOutcome};
    use crate::error::TableError;
    use crate::model::RecordBatch;

    #[test]
    fn formats_lines_with_marker_and_page() {
        let entry = LogEntry::new(Severity::Info, 4, "No table found.");
        assert_eq!(entry.to_string(), "[ℹ️ Info] Page 4: No table found.");
    }

    #[test]
    fn page_without_tables_logs_single_info() {
        let entries = PageOutcome::NoTables.log_entries(2);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(entries[0].table, None);
    }

    #[test]
    fn table_outcomes_keep_detection_order() {
        let batch = RecordBatch {
            headers: vec!["Item".to_string()],
            rows: vec![vec![Some("A".to_string())]],
        };
        let outcome = PageOutcome::Tables(vec![
            TableOutcome::Empty,
            TableOutcome::Appended(batch),
            TableOutcome::Failed(TableError::EmptyHeader),
        ]);

        let lines = outcome
            .log_entries(3)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "[⚠️ Warning] Page 3: Table found, but it was empty.",
                "[✅ Success] Page 3: 1 rows extracted.",
                "[❌ Error] Page 3: Failed to process table - header row has no columns",
            ]
        );
    }
}
