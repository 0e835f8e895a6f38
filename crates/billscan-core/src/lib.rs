//! Core library for utility bill scraping.
//!
//! This crate provides:
//! - PDF page selection and text extraction
//! - Bill field extraction (billing period, consumption, financial totals)
//! - Offered (zero-cost) period classification
//! - SHA-256 content fingerprints and a deduplication gate
//! - A batch orchestrator that isolates per-document failures

pub mod batch;
pub mod bill;
pub mod classify;
pub mod error;
pub mod hash;
pub mod models;
pub mod pdf;
pub mod record;
pub mod source;
pub mod store;

pub use batch::{BatchOrchestrator, Disposition};
pub use bill::{BillParser, BillTextParser, ExtractionResult};
pub use classify::OfferedPeriodClassifier;
pub use error::{BillError, ExtractionError, PdfError, Result, Stage, StoreError};
pub use hash::{compute_hash, hash_bytes, Fingerprint};
pub use models::{
    BillRecord, BillscanConfig, Consumption, DocumentFailure, ExtractedFields, FailureStage,
    Financial, ProcessingOutcome,
};
pub use pdf::{PageSelection, PdfExtractor, PdfProcessor};
pub use record::RecordBuilder;
pub use source::{list_documents, DocumentSource, PdfDocumentSource};
pub use store::{BillStore, DeduplicationGate, MemoryStore, StoreResult};

/// Re-export so callers can cancel runs without naming the dependency.
pub use tokio_util::sync::CancellationToken;
