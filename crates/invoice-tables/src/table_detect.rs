use crate::model::{PageText, RawTable};
use crate::table_parse::{looks_like_sentence, soft_split_line_into_cells, split_line_into_cells};

/// Widest row accepted from the single-space fallback when it holds no digits.
const SOFT_SPLIT_MAX_TEXT_CELLS: usize = 6;

/// Finds the tables on one page, in reading order.
pub trait TableDetector {
    fn detect(&self, page: &PageText) -> Vec<RawTable>;
}

impl<T: TableDetector + ?Sized> TableDetector for &T {
    fn detect(&self, page: &PageText) -> Vec<RawTable> {
        (**self).detect(page)
    }
}

/// Detects tables as runs of consecutive lines that split into enough cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayoutDetector {
    min_cols: usize,
}

impl TextLayoutDetector {
    #[must_use]
    pub fn new(min_cols: usize) -> Self {
        Self {
            min_cols: min_cols.max(2),
        }
    }

    fn row_cells(&self, line: &str) -> Option<Vec<String>> {
        let cells = split_line_into_cells(line);
        if cells.len() >= self.min_cols {
            return Some(cells);
        }

        let soft_cells = soft_split_line_into_cells(line);
        let has_numeric = soft_cells
            .iter()
            .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
        (soft_cells.len() >= self.min_cols
            && !looks_like_sentence(line)
            && (has_numeric || soft_cells.len() <= SOFT_SPLIT_MAX_TEXT_CELLS))
            .then_some(soft_cells)
    }
}

impl Default for TextLayoutDetector {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TableDetector for TextLayoutDetector {
    fn detect(&self, page: &PageText) -> Vec<RawTable> {
        let mut tables = Vec::new();
        let mut run: Vec<Vec<String>> = Vec::new();

        let mut flush = |run: &mut Vec<Vec<String>>| {
            if run.len() >= 2 {
                tables.push(RawTable::from_strings(std::mem::take(run)));
            } else {
                run.clear();
            }
        };

        for line in page.text.lines() {
            match self.row_cells(line) {
                Some(cells) => run.push(cells),
                None => flush(&mut run),
            }
        }
        flush(&mut run);

        tables
    }
}
