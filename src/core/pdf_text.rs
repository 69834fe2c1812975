use log::debug;
use lopdf::Document;

use crate::error::scrape::{ErrorKind, ScrapeError};

/// Extracts the text of every page of an in-memory PDF and concatenates it in
/// page order. A page whose text cannot be decoded fails the whole document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ScrapeError> {
    let doc = Document::load_mem(bytes).map_err(|err| ScrapeError::wrap(ErrorKind::Pdf, err))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ScrapeError::new(ErrorKind::Pdf, "document has no pages"));
    }

    let all_text = pages_text(&doc, pages.keys().copied())?;
    debug!("extracted {} chars from {} pages", all_text.len(), pages.len());

    if all_text.trim().is_empty() {
        return Err(ScrapeError::new(ErrorKind::Pdf, "document contains no extractable text"));
    }
    Ok(all_text)
}

fn pages_text(doc: &Document, page_numbers: impl IntoIterator<Item = u32>) -> Result<String, ScrapeError> {
    let mut all_text = String::new();
    for page_num in page_numbers {
        let text = doc.extract_text(&[page_num]).map_err(|err| {
            ScrapeError::new(ErrorKind::Pdf, format!("page {}: {}", page_num, err))
        })?;
        all_text.push_str(&text);
    }
    Ok(all_text)
}
