//! Document discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::debug;

use crate::error::{BillError, Result};
use crate::models::config::PdfConfig;
use crate::pdf::{PageSelection, PdfExtractor, PdfProcessor};

/// Where batch documents come from.
pub trait DocumentSource {
    /// Documents in `folder` whose names match `pattern`, in listing order.
    ///
    /// A missing folder or an invalid pattern is a configuration error.
    fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Full byte content of a document.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Text of the pages that carry bill data.
    fn text(&self, path: &Path, bytes: &[u8]) -> Result<String>;
}

/// Files in `folder` matching a glob `pattern`, sorted by path.
pub fn list_documents(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(BillError::Config(format!(
            "document folder not found: {}",
            folder.display()
        )));
    }

    let folder_str = folder.to_str().ok_or_else(|| {
        BillError::Config(format!("folder path is not valid UTF-8: {}", folder.display()))
    })?;
    let full_pattern = format!("{}/{}", Pattern::escape(folder_str), pattern);

    let entries = glob(&full_pattern)
        .map_err(|e| BillError::Config(format!("invalid file pattern {:?}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                return Err(BillError::Config(format!(
                    "cannot list {}: {}",
                    e.path().display(),
                    e.error()
                )));
            }
        }
    }
    files.sort();

    debug!("Matched {} documents with {}", files.len(), full_pattern);
    Ok(files)
}

/// File-system source reading PDF bills.
#[derive(Debug, Clone, Default)]
pub struct PdfDocumentSource {
    selection: PageSelection,
}

impl PdfDocumentSource {
    pub fn new(selection: PageSelection) -> Self {
        Self { selection }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(PageSelection::from_config(config))
    }

    pub fn selection(&self) -> PageSelection {
        self.selection
    }
}

impl DocumentSource for PdfDocumentSource {
    fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        list_documents(folder, pattern)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| BillError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }

    fn text(&self, path: &Path, bytes: &[u8]) -> Result<String> {
        let mut extractor = PdfExtractor::new();
        extractor.load(bytes)?;

        let text = extractor.extract_selected_text(&self.selection)?;
        debug!(
            "Extracted {} characters from {} of {} pages of {}",
            text.len(),
            self.selection.page_numbers(extractor.page_count()).count(),
            extractor.page_count(),
            path.display()
        );
        Ok(text)
    }
}
