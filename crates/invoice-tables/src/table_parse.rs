/// Splits a text line into cells at tabs and at runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    for segment in line.split('\t') {
        let mut current = String::new();
        let mut pending_space = 0_usize;
        for ch in segment.trim().chars() {
            if ch.is_whitespace() {
                pending_space += 1;
                continue;
            }
            if pending_space >= 2 {
                cells.push(std::mem::take(&mut current));
            } else if pending_space == 1 {
                current.push(' ');
            }
            pending_space = 0;
            current.push(ch);
        }
        if !current.is_empty() {
            cells.push(current);
        }
    }
    cells
}

/// Splits at any whitespace; used for tightly typeset rows.
pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn looks_like_sentence(line: &str) -> bool {
    ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation))
}
