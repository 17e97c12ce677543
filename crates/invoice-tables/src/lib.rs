mod batch;
mod csv_out;
mod error;
mod merge;
mod model;
mod options;
mod outcome;
mod pdf_reader;
mod table_detect;
mod table_parse;
mod xlsx_out;

use std::path::Path;

use crate::batch::{MIN_TABLE_ROWS, build_record_batch};
use crate::merge::merge_batches;

pub use csv_out::{to_csv_string, write_csv};
pub use error::{ExtractError, TableError};
pub use model::{Cell, CombinedDataset, PageText, RawTable, RecordBatch};
pub use options::{ExtractOptions, PageSelection};
pub use outcome::{LogEntry, PageOutcome, Severity, TableOutcome};
pub use pdf_reader::{PdfDocument, open_document};
pub use table_detect::{TableDetector, TextLayoutDetector};
pub use xlsx_out::{
    DOWNLOAD_FILENAME, SHEET_NAME, XLSX_MIME_TYPE, to_spreadsheet, write_spreadsheet,
};

/// Result of reading one document: the combined rows and what happened on
/// every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub dataset: CombinedDataset,
    pub log: Vec<LogEntry>,
    pub page_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub pages: usize,
    pub tables: usize,
    pub batches: usize,
    pub rows: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Extraction {
    #[must_use]
    pub fn summary(&self) -> ExtractionSummary {
        let count = |severity: Severity| {
            self.log
                .iter()
                .filter(|entry| entry.severity == severity)
                .count()
        };
        ExtractionSummary {
            pages: self.page_count,
            tables: self.log.iter().filter(|entry| entry.table.is_some()).count(),
            batches: count(Severity::Success),
            rows: self.dataset.row_count(),
            warnings: count(Severity::Warning),
            errors: count(Severity::Error),
        }
    }

    /// The log rendered one line per entry.
    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.log.iter().map(ToString::to_string).collect()
    }
}

/// Classifies one detected table.
#[must_use]
pub fn process_table(table: &RawTable) -> TableOutcome {
    if table.row_count() < MIN_TABLE_ROWS {
        return TableOutcome::Empty;
    }
    match build_record_batch(table) {
        Ok(batch) => TableOutcome::Appended(batch),
        Err(error) => TableOutcome::Failed(error),
    }
}

pub fn process_page<D: TableDetector>(page: &PageText, detector: &D) -> PageOutcome {
    let tables = detector.detect(page);
    if tables.is_empty() {
        return PageOutcome::NoTables;
    }
    PageOutcome::Tables(tables.iter().map(process_table).collect())
}

/// Runs detection over already-read pages. Per-table failures end up in the
/// log; they never stop the remaining tables or pages.
pub fn extract_pages<D: TableDetector>(pages: &[PageText], detector: &D) -> Extraction {
    let mut log = Vec::new();
    let mut batches = Vec::new();

    for page in pages {
        let outcome = process_page(page, detector);
        let entries = outcome.log_entries(page.page_number);
        for entry in &entries {
            tracing::debug!(
                page = entry.page,
                table = entry.table,
                severity = entry.severity.as_str(),
                "{}",
                entry.message
            );
        }
        log.extend(entries);

        if let PageOutcome::Tables(outcomes) = outcome {
            batches.extend(outcomes.into_iter().filter_map(|outcome| match outcome {
                TableOutcome::Appended(batch) => Some(batch),
                TableOutcome::Empty | TableOutcome::Failed(_) => None,
            }));
        }
    }

    let dataset = merge_batches(&batches);
    tracing::info!(
        pages = pages.len(),
        batches = batches.len(),
        rows = dataset.row_count(),
        "table extraction finished"
    );

    Extraction {
        dataset,
        log,
        page_count: pages.len(),
    }
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }
    Ok(())
}

/// Opens `pdf_bytes`, detects tables on every selected page and combines them.
///
/// Only an unreadable document (or invalid options) fails the call; table
/// level problems are reported through [`Extraction::log`].
pub fn extract_all(
    pdf_bytes: &[u8],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    validate_options(options)?;

    let document = open_document(pdf_bytes)?;
    let pages = document.read_pages(options.pages.as_ref())?;
    let detector = TextLayoutDetector::new(options.min_cols);
    Ok(extract_pages(&pages, &detector))
}

pub fn extract_pdf_file(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let bytes = std::fs::read(input_pdf)?;
    extract_all(&bytes, options)
}

#[cfg(test)]
mod tests {
    use super::{
        ExtractOptions, ExtractError, PageText, RawTable, Severity, TableDetector, TableOutcome,
        extract_all, extract_pages, process_table,
    };

    /// Hands out fixed tables per page number.
    struct FixedTables(Vec<(u32, Vec<RawTable>)>);

    impl TableDetector for FixedTables {
        fn detect(&self, page: &PageText) -> Vec<RawTable> {
            self.0
                .iter()
                .find(|(number, _)| *number == page.page_number)
                .map(|(_, tables)| tables.clone())
                .unwrap_or_default()
        }
    }

    fn pages(count: u32) -> Vec<PageText> {
        (1..=count)
            .map(|page_number| PageText {
                page_number,
                text: String::new(),
            })
            .collect()
    }

    #[test]
    fn pages_without_tables_log_one_info_each() {
        let extraction = extract_pages(&pages(4), &FixedTables(Vec::new()));
        assert!(extraction.dataset.is_empty());
        assert_eq!(extraction.log.len(), 4);
        for (index, entry) in extraction.log.iter().enumerate() {
            assert_eq!(entry.severity, Severity::Info);
            assert_eq!(entry.page as usize, index + 1);
        }
    }

    #[test]
    fn mixed_document_keeps_good_rows_and_logs_failures() {
        let detector = FixedTables(vec![
            (
                1,
                vec![RawTable::from_strings([["Item", "Qty"], ["A", "1"], ["B", "2"]])],
            ),
            (
                3,
                vec![RawTable::from_strings(vec![vec!["Item", "Qty"], vec!["C", "3", "x"]])],
            ),
        ]);

        let extraction = extract_pages(&pages(3), &detector);

        assert_eq!(extraction.dataset.columns, vec!["Item", "Qty"]);
        assert_eq!(extraction.dataset.row_count(), 2);
        assert_eq!(extraction.dataset.value(0, 0), Some("A"));
        assert_eq!(extraction.dataset.value(1, 1), Some("2"));
        assert_eq!(
            extraction.log_lines(),
            vec![
                "[✅ Success] Page 1: 2 rows extracted.",
                "[ℹ️ Info] Page 2: No table found.",
                "[❌ Error] Page 3: Failed to process table - 2 columns passed, data row 1 had 3 columns",
            ]
        );

        let summary = extraction.summary();
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.tables, 2);
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn failed_table_does_not_stop_later_tables_or_pages() {
        let detector = FixedTables(vec![
            (
                1,
                vec![
                    RawTable::from_strings(vec![vec!["Item", "Qty"], vec!["C", "3", "x"]]),
                    RawTable::from_strings([["Item", "Qty"], ["D", "4"]]),
                ],
            ),
            (2, vec![RawTable::from_strings([["Item", "Qty"], ["E", "5"], ["F", "6"]])]),
        ]);

        let extraction = extract_pages(&pages(2), &detector);

        assert_eq!(extraction.dataset.columns, vec!["Item", "Qty"]);
        assert_eq!(extraction.dataset.row_count(), 3);
        assert_eq!(extraction.dataset.value(0, 0), Some("D"));
        assert_eq!(extraction.dataset.value(1, 0), Some("E"));
        assert_eq!(extraction.dataset.value(2, 1), Some("6"));
        assert_eq!(
            extraction.log_lines(),
            vec![
                "[❌ Error] Page 1: Failed to process table - 2 columns passed, data row 1 had 3 columns",
                "[✅ Success] Page 1: 1 rows extracted.",
                "[✅ Success] Page 2: 2 rows extracted.",
            ]
        );
        assert_eq!(extraction.log[1].table, Some(2));
    }

    #[test]
    fn short_tables_warn_and_add_nothing() {
        let detector = FixedTables(vec![(
            1,
            vec![
                RawTable::from_strings([["Item", "Qty"]]),
                RawTable::default(),
            ],
        )]);

        let extraction = extract_pages(&pages(1), &detector);
        assert!(extraction.dataset.is_empty());
        assert_eq!(extraction.log.len(), 2);
        assert!(
            extraction
                .log
                .iter()
                .all(|entry| entry.severity == Severity::Warning)
        );
    }

    #[test]
    fn row_count_is_sum_of_successful_batches() {
        let detector = FixedTables(vec![
            (
                1,
                vec![
                    RawTable::from_strings([["Item", "Qty"], ["A", "1"]]),
                    RawTable::from_strings([["Item", "Price"], ["B", "9"], ["C", "7"]]),
                ],
            ),
            (2, vec![RawTable::from_strings([["Tax", "Rate"], ["VAT", "20%"]])]),
        ]);

        let extraction = extract_pages(&pages(2), &detector);
        assert_eq!(extraction.dataset.row_count(), 4);
        assert_eq!(
            extraction.dataset.columns,
            vec!["Item", "Qty", "Price", "Tax", "Rate"]
        );
        assert_eq!(extraction.dataset.value(3, 3), Some("VAT"));
        assert_eq!(extraction.dataset.value(3, 0), None);
    }

    #[test]
    fn classifies_single_tables() {
        assert_eq!(process_table(&RawTable::default()), TableOutcome::Empty);
        assert!(matches!(
            process_table(&RawTable::from_strings([["a"], ["b"]])),
            TableOutcome::Appended(_)
        ));
    }

    #[test]
    fn rejects_min_cols_below_two() {
        let options = ExtractOptions {
            min_cols: 1,
            ..ExtractOptions::default()
        };
        let error = extract_all(b"%PDF-1.5", &options).expect_err("min_cols=1 should fail");
        assert!(matches!(error, ExtractError::InvalidOption(_)));
    }
}
