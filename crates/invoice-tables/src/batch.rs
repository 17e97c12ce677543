use crate::error::TableError;
use crate::model::{Cell, RawTable, RecordBatch};

/// A table needs a header and at least one more row to carry data.
pub(crate) const MIN_TABLE_ROWS: usize = 2;

/// Splits `table` into header and data rows.
///
/// Short data rows are padded with empty cells; a data row wider than the
/// header is rejected, as is a header without cells.
pub(crate) fn build_record_batch(table: &RawTable) -> Result<RecordBatch, TableError> {
    let Some((header, data)) = table.rows.split_first() else {
        return Err(TableError::EmptyHeader);
    };
    if header.is_empty() {
        return Err(TableError::EmptyHeader);
    }

    let headers = header
        .iter()
        .map(|cell| cell.as_deref().unwrap_or_default().trim().to_string())
        .collect::<Vec<_>>();
    let header_width = headers.len();

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(data.len());
    for (index, row) in data.iter().enumerate() {
        if row.len() > header_width {
            return Err(TableError::RowTooWide {
                row: index + 1,
                width: row.len(),
                header_width,
            });
        }
        let mut out = row.clone();
        out.resize(header_width, None);
        rows.push(out);
    }

    Ok(RecordBatch { headers, rows })
}
