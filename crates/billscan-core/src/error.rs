//! Error types for the billscan-core library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the billscan library.
#[derive(Error, Debug)]
pub enum BillError {
    /// The document could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was readable but its text could not be recovered.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A field pattern or numeric parse failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The assembled record does not satisfy its invariant.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The record could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persistence store failed a dedup check or a save.
    #[error("store {operation} failed: {source}")]
    Persistence {
        operation: StoreOperation,
        #[source]
        source: StoreError,
    },

    /// Configuration error, reported before any document is touched.
    #[error("configuration error: {0}")]
    Config(String),

    /// Another batch run holds the orchestrator.
    #[error("a batch run is already in progress")]
    RunInProgress,
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Extraction phase a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Period,
    Consumption,
    Financial,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Period => "period",
            Stage::Consumption => "consumption",
            Stage::Financial => "financial",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staged failure of field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("stage={stage}: {kind}")]
pub struct ExtractionError {
    /// Phase that failed.
    pub stage: Stage,
    /// Underlying failure.
    pub kind: ExtractionErrorKind,
}

impl ExtractionError {
    pub fn missing(stage: Stage, field: &'static str) -> Self {
        Self {
            stage,
            kind: ExtractionErrorKind::MissingField(field),
        }
    }

    pub fn parse(stage: Stage, field: &'static str, value: impl Into<String>) -> Self {
        Self {
            stage,
            kind: ExtractionErrorKind::Parse {
                field,
                value: value.into(),
            },
        }
    }
}

/// What went wrong inside an extraction stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value:?}")]
    Parse { field: &'static str, value: String },
}

/// Store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Exists,
    Save,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Exists => f.write_str("exists"),
            StoreOperation::Save => f.write_str("save"),
        }
    }
}

/// Errors raised by persistence store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O failure in the backing medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("corrupt entry: {0}")]
    Corrupt(String),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Result type for the billscan library.
pub type Result<T> = std::result::Result<T, BillError>;
