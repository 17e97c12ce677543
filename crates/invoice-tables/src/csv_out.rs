use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::CombinedDataset;

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    dataset: &CombinedDataset,
) -> Result<(), ExtractError> {
    writer.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(
    path: &Path,
    dataset: &CombinedDataset,
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_records(&mut writer, dataset)
}

pub fn to_csv_string(dataset: &CombinedDataset, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_records(&mut writer, dataset)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
