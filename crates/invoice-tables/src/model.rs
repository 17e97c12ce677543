/// Text of one page, as chosen by the PDF reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub page_number: u32,
    pub text: String,
}

/// A cell as reported by the detector. `None` marks an empty cell.
pub type Cell = Option<String>;

/// Rows of one table as detected on a page, before any header handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a table from plain strings, treating blank strings as empty cells.
    #[must_use]
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let value = value.into();
                        if value.trim().is_empty() {
                            None
                        } else {
                            Some(value)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Header plus data rows of one table. Every data row has exactly
/// `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBatch {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RecordBatch {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Every record batch of a document concatenated in page-then-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CombinedDataset {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row`/`column`, with missing cells reported as `None`.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(Option::as_deref)
    }
}
