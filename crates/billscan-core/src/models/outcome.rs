//! Aggregate result of one batch run.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{BillError, Stage, StoreOperation};

/// Tally and failure log of one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
    /// Documents matched by the file pattern.
    pub files_found: usize,
    /// Documents extracted and saved.
    pub processed: usize,
    /// Documents whose fingerprint was already known.
    pub skipped: usize,
    /// Documents that failed at some stage.
    pub failed: usize,
    /// One entry per failed document, in processing order.
    pub failures: Vec<DocumentFailure>,
    /// The run was stopped before every document was attempted.
    pub cancelled: bool,
}

impl ProcessingOutcome {
    pub(crate) fn new(files_found: usize) -> Self {
        Self {
            files_found,
            ..Self::default()
        }
    }

    pub(crate) fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn record_failure(&mut self, failure: DocumentFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Number of documents attempted so far.
    pub fn attempted(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Every matched document was attempted.
    pub fn is_complete(&self) -> bool {
        self.attempted() == self.files_found
    }

    /// Human-readable failure messages, tagged by file name.
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

/// Point in the per-document pipeline where a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Reading the document bytes.
    Read,
    /// Recovering page text from a readable document.
    Document,
    /// Checking the fingerprint against the store.
    Dedup,
    /// One of the field extraction phases.
    Extraction(Stage),
    /// Record invariant check.
    Validation,
    /// Encoding the record.
    Serialize,
    /// Saving the record.
    Persist,
    /// Run-level errors that never belong to a single document.
    Setup,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Read => "read",
            FailureStage::Document => "document",
            FailureStage::Dedup => "dedup",
            FailureStage::Extraction(stage) => stage.as_str(),
            FailureStage::Validation => "validation",
            FailureStage::Serialize => "serialize",
            FailureStage::Persist => "persist",
            FailureStage::Setup => "setup",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FailureStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl BillError {
    /// Pipeline stage this error is reported under.
    pub fn failure_stage(&self) -> FailureStage {
        match self {
            BillError::FileAccess { .. } => FailureStage::Read,
            BillError::Pdf(_) => FailureStage::Document,
            BillError::Extraction(e) => FailureStage::Extraction(e.stage),
            BillError::Validation { .. } => FailureStage::Validation,
            BillError::Serialization(_) => FailureStage::Serialize,
            BillError::Persistence {
                operation: StoreOperation::Exists,
                ..
            } => FailureStage::Dedup,
            BillError::Persistence {
                operation: StoreOperation::Save,
                ..
            } => FailureStage::Persist,
            BillError::Config(_) | BillError::RunInProgress => FailureStage::Setup,
        }
    }
}

/// A document that could not be taken through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// File name of the document.
    pub file: String,
    pub stage: FailureStage,
    /// Underlying error message.
    pub detail: String,
}

impl DocumentFailure {
    pub fn new(file: impl Into<String>, error: &BillError) -> Self {
        let detail = match error {
            // The stage tag already carries the phase.
            BillError::Extraction(e) => e.kind.to_string(),
            other => other.to_string(),
        };
        Self {
            file: file.into(),
            stage: error.failure_stage(),
            detail,
        }
    }
}

impl fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: stage={}: {}", self.file, self.stage, self.detail)
    }
}
