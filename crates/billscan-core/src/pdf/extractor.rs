//! Per-page PDF text extraction.
//!
//! lopdf validates the document and counts pages; pdf-extract lays out the text
//! of each page so lines positioned with `Td`/`T*` come out on separate lines.

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    pages: Vec<String>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            pages: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| {
            PdfError::TextExtraction {
                page: 0,
                reason: e.to_string(),
            }
        })?;
        if pages.len() != page_count {
            debug!(
                "pdf-extract returned {} pages for a {} page document",
                pages.len(),
                page_count
            );
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.pages = pages;
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        let text = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .ok_or_else(|| PdfError::TextExtraction {
                page,
                reason: "no text layer for page".to_string(),
            })?;
        trace!("Page {} yielded {} characters", page, text.len());
        Ok(text)
    }
}
