// PDF text extraction via lopdf

use lopdf::Document;
use tracing::warn;

use super::{DocumentFormat, ExtractionError};

pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(data)
        .map_err(|e| ExtractionError::corrupt(DocumentFormat::Pdf, e))?;

    // get_pages is keyed by page number in document order.
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Ok(String::new());
    }

    match doc.extract_text(&page_numbers) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(error = %e, "Whole-document PDF extraction failed, retrying page by page");
            extract_page_by_page(&doc, &page_numbers)
        }
    }
}

// Keeps whatever pages are readable; fails only when none are.
fn extract_page_by_page(doc: &Document, page_numbers: &[u32]) -> Result<String, ExtractionError> {
    let mut out = String::new();
    let mut last_error = None;

    for page in page_numbers {
        match doc.extract_text(&[*page]) {
            Ok(text) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&text);
            }
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) if out.is_empty() => Err(ExtractionError::corrupt(DocumentFormat::Pdf, e)),
        _ => Ok(out),
    }
}
