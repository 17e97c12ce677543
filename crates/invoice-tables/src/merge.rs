use std::collections::HashMap;

use crate::model::{CombinedDataset, RecordBatch};

/// Maps each batch column onto the union schema. The k-th occurrence of a
/// name inside one batch lands on the k-th column of that name in the union.
fn column_positions(
    batch: &RecordBatch,
    columns: &mut Vec<String>,
    index: &mut HashMap<(String, usize), usize>,
) -> Vec<usize> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    batch
        .headers
        .iter()
        .map(|header| {
            let occurrence = seen.entry(header.as_str()).or_insert(0);
            let key = (header.clone(), *occurrence);
            *occurrence += 1;
            *index.entry(key).or_insert_with(|| {
                columns.push(header.clone());
                columns.len() - 1
            })
        })
        .collect()
}

/// Concatenates all batches in order in one pass: the union schema is
/// resolved first, then every row is placed exactly once.
pub(crate) fn merge_batches(batches: &[RecordBatch]) -> CombinedDataset {
    let mut columns = Vec::new();
    let mut index = HashMap::new();
    let positions = batches
        .iter()
        .map(|batch| column_positions(batch, &mut columns, &mut index))
        .collect::<Vec<_>>();

    let total = batches.iter().map(RecordBatch::row_count).sum();
    let mut rows = Vec::with_capacity(total);
    for (batch, positions) in batches.iter().zip(&positions) {
        for source in &batch.rows {
            let mut row = vec![None; columns.len()];
            for (cell, &target) in source.iter().zip(positions) {
                row[target].clone_from(cell);
            }
            rows.push(row);
        }
    }

    CombinedDataset { columns, rows }
}
