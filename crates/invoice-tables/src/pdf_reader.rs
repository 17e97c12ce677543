use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::panic::AssertUnwindSafe;

use encoding_rs::{BIG5, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSelection;
use crate::table_parse::{soft_split_line_into_cells, split_line_into_cells};

const FORM_FEED: char = '\u{000C}';

/// An uploaded PDF that parsed successfully and can be read page by page.
pub struct PdfDocument<'a> {
    bytes: &'a [u8],
    document: Document,
}

impl std::fmt::Debug for PdfDocument<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("bytes", &self.bytes.len())
            .field("pages", &self.page_count())
            .finish()
    }
}

/// Parses `bytes` as a PDF. Anything lopdf cannot load is a `DocumentOpen` error.
pub fn open_document(bytes: &[u8]) -> Result<PdfDocument<'_>, ExtractError> {
    let document = Document::load_mem(bytes)?;
    Ok(PdfDocument { bytes, document })
}

impl PdfDocument<'_> {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text of every selected page, in document order.
    pub fn read_pages(
        &self,
        selection: Option<&PageSelection>,
    ) -> Result<Vec<PageText>, ExtractError> {
        let pages_map = self.document.get_pages();

        // pdf-extract reports the whole document; it is only usable per page
        // when its form feeds line up with the page tree.
        let split_pages = whole_document_text(self.bytes)
            .map(|text| split_text_into_pages(&text))
            .filter(|pages| pages.len() == pages_map.len());

        let mut pages = Vec::new();
        for (index, (&page_number, &page_id)) in pages_map.iter().enumerate() {
            if selection.is_some_and(|selection| !selection.contains(page_number)) {
                continue;
            }

            let mut candidates = Vec::with_capacity(3);
            if let Some(text) = split_pages
                .as_ref()
                .and_then(|split| split.get(index))
                .filter(|text| !text.trim().is_empty())
            {
                candidates.push(text.clone());
            }
            if let Some(text) = text_from_content_stream(&self.document, page_id) {
                candidates.push(text);
            }
            if let Some(text) = self
                .document
                .extract_text(&[page_number])
                .ok()
                .filter(|text| !text.trim().is_empty())
            {
                candidates.push(text);
            }

            tracing::trace!(page = page_number, candidates = candidates.len(), "read page text");
            pages.push(PageText {
                page_number,
                text: choose_best_text(candidates),
            });
        }

        if selection.is_some() && pages.is_empty() {
            return Err(ExtractError::NoPagesSelected);
        }

        Ok(pages)
    }
}

/// pdf-extract panics on some documents lopdf accepts, so a panic only drops
/// this candidate.
#[cfg(not(target_arch = "wasm32"))]
fn whole_document_text(bytes: &[u8]) -> Option<String> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(error)) => {
            tracing::debug!(?error, "pdf-extract could not read the document");
            None
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked; using lopdf text only");
            None
        }
    }
}

// Panics abort on wasm32, so the worker relies on the lopdf candidates.
#[cfg(target_arch = "wasm32")]
fn whole_document_text(_bytes: &[u8]) -> Option<String> {
    None
}

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text.split(FORM_FEED).map(str::to_string).collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn is_cjk(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&ch) || is_cjk_ext_a(ch)
}

fn is_cjk_ext_a(ch: char) -> bool {
    ('\u{3400}'..='\u{4DBF}').contains(&ch)
}

/// Heuristic for text that came out of the wrong decoder.
fn looks_decoding_broken(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let (mut total, mut replacement, mut control, mut cjk, mut ext_a) = (0, 0, 0, 0, 0);
    for ch in text.chars() {
        total += 1;
        if ch == '\u{FFFD}' {
            replacement += 1;
        }
        if ch.is_control() && !matches!(ch, '\n' | '\r' | '\t') {
            control += 1;
        }
        if is_cjk(ch) {
            cjk += 1;
        }
        if is_cjk_ext_a(ch) {
            ext_a += 1;
        }
    }

    total > 0 && (replacement * 8 > total || control * 5 > total || (cjk > 20 && ext_a * 4 > cjk))
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
    (!had_errors && !text.is_empty()).then(|| text.into_owned())
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if bytes.starts_with(&[0xFE, 0xFF]) || bytes.starts_with(&[0xFF, 0xFE]) {
        if let Some(text) = decode_utf16(bytes.get(2..).unwrap_or_default()) {
            return text;
        }
    }

    let hint = encoding.map(str::to_ascii_lowercase).unwrap_or_default();
    if ["utf16", "ucs2", "identity-h", "unicode"]
        .iter()
        .any(|name| hint.contains(name))
    {
        if let Some(text) = decode_utf16(bytes) {
            return text;
        }
    }
    if ["big5", "b5", "eten", "cns"].iter().any(|name| hint.contains(name)) {
        let (text, _, had_errors) = BIG5.decode(bytes);
        if !had_errors && !text.is_empty() {
            return text.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Scores how table-like a page text is: multi-cell lines weigh most, lines
/// with figures next, and mis-decoded text is pushed to the bottom.
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut score = 0_i64;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        score += 1;
        if split_line_into_cells(line).len() >= 2 || soft_split_line_into_cells(line).len() >= 3 {
            score += 50;
        }
        if line.chars().any(|ch| ch.is_ascii_digit()) {
            score += 15;
        }
    }

    if looks_decoding_broken(text) {
        score -= 800;
    }
    score
}

fn choose_best_text(candidates: Vec<String>) -> String {
    candidates
        .into_iter()
        .max_by_key(|text| extraction_quality_score(text))
        .unwrap_or_default()
}

/// Walks the page content stream and rebuilds text lines from the text
/// showing operators, switching decoders as fonts change.
fn text_from_content_stream(document: &Document, page_id: ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                // Large negative kerning inside TJ is a visual word gap.
                Object::Integer(value) if *value < -100 => text.push(' '),
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => collect_text(&mut current, encoding, &operation.operands),
            "T*" | "Td" | "TD" | "ET" if !current.trim().is_empty() => {
                lines.push(std::mem::take(&mut current));
            }
            _ => {}
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::{
        choose_best_text, decode_pdf_bytes, looks_decoding_broken, open_document,
        split_text_into_pages,
    };
    use crate::error::ExtractError;

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_text_into_pages("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn decodes_big5_when_encoding_hint_is_present() {
        let (bytes, _, had_errors) = encoding_rs::BIG5.encode("發票");
        assert!(!had_errors);
        let decoded = decode_pdf_bytes(Some("ETen-B5-H"), &bytes);
        assert_eq!(decoded, "發票");
    }

    #[test]
    fn flags_replacement_heavy_text() {
        assert!(looks_decoding_broken("\u{FFFD}\u{FFFD}ab"));
        assert!(!looks_decoding_broken("Item  Qty"));
        assert!(!looks_decoding_broken(""));
    }

    #[test]
    fn prefers_tabular_candidate() {
        let best = choose_best_text(vec![
            "Item Qty A 1 B 2".to_string(),
            "Item  Qty\nA  1\nB  2".to_string(),
        ]);
        assert_eq!(best, "Item  Qty\nA  1\nB  2");
    }

    #[test]
    fn rejects_bytes_that_are_not_a_pdf() {
        let error = open_document(b"this is not a pdf").expect_err("garbage should not open");
        assert!(matches!(error, ExtractError::DocumentOpen(_)));
    }
}
