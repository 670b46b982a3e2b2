//! Resume text extraction from PDF bytes.

use tracing::warn;

/// Extracted page text joined with single spaces. Pages without text add nothing.
///
/// Never fails: an unreadable PDF (parse error or extractor panic) yields an
/// empty string, which scores as an empty resume.
pub fn extract_text_from_pdf(bytes: &[u8]) -> String {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => join_pages(&text),
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF text extraction panicked; treating document as empty");
            String::new()
        }
    }
}

/// The extractor separates pages with form feeds.
fn join_pages(raw: &str) -> String {
    raw.split('\u{c}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
