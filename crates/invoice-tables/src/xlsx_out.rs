use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExtractError;
use crate::model::CombinedDataset;

pub const SHEET_NAME: &str = "Combined_Table";
pub const DOWNLOAD_FILENAME: &str = "combined_invoice_table.xlsx";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLUMNS: usize = 16_384;

fn build_workbook(dataset: &CombinedDataset) -> Result<Workbook, ExtractError> {
    // One row is taken by the header.
    if dataset.row_count() >= MAX_SHEET_ROWS || dataset.columns.len() > MAX_SHEET_COLUMNS {
        return Err(ExtractError::SheetTooLarge {
            rows: dataset.row_count(),
            columns: dataset.columns.len(),
        });
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in (0..).zip(&dataset.columns) {
        if !name.is_empty() {
            worksheet.write_string_with_format(0, col, name, &header_format)?;
        }
    }

    for (row_index, row) in (1..).zip(&dataset.rows) {
        for (col, cell) in (0..).zip(row) {
            if let Some(value) = cell.as_deref().filter(|value| !value.is_empty()) {
                worksheet.write_string(row_index, col, value)?;
            }
        }
    }

    Ok(workbook)
}

/// Writes the dataset as a single-sheet workbook held in memory.
pub fn to_spreadsheet(dataset: &CombinedDataset) -> Result<Vec<u8>, ExtractError> {
    let mut workbook = build_workbook(dataset)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_spreadsheet(path: &Path, dataset: &CombinedDataset) -> Result<(), ExtractError> {
    let mut workbook = build_workbook(dataset)?;
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::to_spreadsheet;
    use crate::model::CombinedDataset;

    #[test]
    fn empty_dataset_still_produces_a_zip_container() {
        let bytes = to_spreadsheet(&CombinedDataset::default()).expect("export should succeed");
        assert!(bytes.starts_with(b"PK"));
    }
}
