//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the text of the pages chosen by `selection`.
    fn extract_selected_text(&self, selection: &PageSelection) -> Result<String> {
        let pages = selection
            .page_numbers(self.page_count())
            .map(|page| self.extract_page_text(page))
            .collect::<Result<Vec<_>>>()?;
        Ok(pages.join("\n"))
    }
}

/// Which pages of a document are searched for bill fields.
///
/// Bills put account details on the cover page and the billing data on the
/// pages right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSelection {
    /// Leading pages to drop.
    pub skip: usize,
    /// Pages to keep after the dropped ones.
    pub take: usize,
}

impl PageSelection {
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(config.skip_pages, config.max_pages)
    }

    /// 1-indexed page numbers selected from a document of `page_count` pages.
    pub fn page_numbers(&self, page_count: u32) -> impl Iterator<Item = u32> {
        (1..=page_count).skip(self.skip).take(self.take)
    }

    /// Concatenate the selected pages of already extracted page texts.
    pub fn apply<I, S>(&self, pages: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        pages
            .into_iter()
            .skip(self.skip)
            .take(self.take)
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PageSelection {
    fn default() -> Self {
        Self::from_config(&PdfConfig::default())
    }
}
