//! Batch orchestration: fingerprint, dedup, extract, classify and persist.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bill::rules::MissingFieldPolicy;
use crate::bill::{BillParser, BillTextParser};
use crate::classify::OfferedPeriodClassifier;
use crate::error::{BillError, Result, StoreOperation};
use crate::hash::{hash_bytes, Fingerprint};
use crate::models::config::BillscanConfig;
use crate::models::outcome::{DocumentFailure, ProcessingOutcome};
use crate::record::{RecordBuilder, DEFAULT_MIN_VALID_YEAR};
use crate::source::{DocumentSource, PdfDocumentSource};
use crate::store::{BillStore, DeduplicationGate};

/// What happened to one document that made it through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Extracted and saved under this fingerprint.
    Processed(Fingerprint),
    /// Fingerprint already stored; not parsed.
    Skipped(Fingerprint),
}

/// Drives a folder of bills through the pipeline, one document at a time.
///
/// Only one run may be active per orchestrator; a second concurrent call gets
/// [`BillError::RunInProgress`] without touching any document.
pub struct BatchOrchestrator<S, D = PdfDocumentSource> {
    store: S,
    source: D,
    parser: BillTextParser,
    classifier: OfferedPeriodClassifier,
    min_valid_year: i32,
    running: AtomicBool,
}

impl<S: BillStore, D: DocumentSource> BatchOrchestrator<S, D> {
    pub fn new(store: S, source: D) -> Self {
        Self {
            store,
            source,
            parser: BillTextParser::new(),
            classifier: OfferedPeriodClassifier::new(),
            min_valid_year: DEFAULT_MIN_VALID_YEAR,
            running: AtomicBool::new(false),
        }
    }

    /// Apply extraction settings from configuration.
    pub fn with_config(self, config: &BillscanConfig) -> Self {
        let extraction = &config.extraction;
        if extraction.zero_default_missing_fields {
            info!("Missing consumption/financial fields will default to zero");
        }
        self.with_parser(BillTextParser::new().with_missing_field_policy(
            MissingFieldPolicy::from_zero_default(extraction.zero_default_missing_fields),
        ))
        .with_classifier(OfferedPeriodClassifier::with_keywords(
            &extraction.offered_keywords,
        ))
        .with_min_valid_year(extraction.min_valid_year)
    }

    pub fn with_parser(mut self, parser: BillTextParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_classifier(mut self, classifier: OfferedPeriodClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_min_valid_year(mut self, year: i32) -> Self {
        self.min_valid_year = year;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Process every document in `folder` matching `pattern`.
    pub fn process(&self, folder: &Path, pattern: &str) -> Result<ProcessingOutcome> {
        self.process_with_cancel(folder, pattern, &CancellationToken::new())
    }

    /// Like [`process`](Self::process), checking `cancel` before each document.
    ///
    /// A cancelled run returns the outcome gathered so far with `cancelled` set.
    pub fn process_with_cancel(
        &self,
        folder: &Path,
        pattern: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessingOutcome> {
        let _guard = RunGuard::acquire(&self.running)?;
        let start = Instant::now();

        let paths = self.source.list(folder, pattern)?;
        info!(
            "Starting batch over {} documents in {}",
            paths.len(),
            folder.display()
        );

        let mut outcome = ProcessingOutcome::new(paths.len());
        for path in &paths {
            if cancel.is_cancelled() {
                info!(
                    "Batch cancelled after {} of {} documents",
                    outcome.attempted(),
                    outcome.files_found
                );
                outcome.cancelled = true;
                break;
            }

            match self.process_document(path) {
                Ok(Disposition::Processed(fingerprint)) => {
                    debug!("Saved {} as {}", path.display(), fingerprint);
                    outcome.record_processed();
                }
                Ok(Disposition::Skipped(fingerprint)) => {
                    debug!("Skipping {}: {} already stored", path.display(), fingerprint);
                    outcome.record_skipped();
                }
                Err(e) => {
                    let failure = DocumentFailure::new(file_label(path), &e);
                    warn!("Failed to process {}: {}", path.display(), failure);
                    outcome.record_failure(failure);
                }
            }
        }

        info!(
            "Batch finished in {:?}: {} found, {} processed, {} skipped, {} failed",
            start.elapsed(),
            outcome.files_found,
            outcome.processed,
            outcome.skipped,
            outcome.failed
        );
        Ok(outcome)
    }

    /// Take one document through the pipeline.
    pub fn process_document(&self, path: &Path) -> Result<Disposition> {
        let bytes = self.source.read(path)?;
        let fingerprint = hash_bytes(&bytes);

        if DeduplicationGate::new(&self.store).is_known(&fingerprint)? {
            return Ok(Disposition::Skipped(fingerprint));
        }

        let text = self.source.text(path, &bytes)?;
        let extracted = self.parser.parse(&text)?;
        if !extracted.defaulted.is_empty() {
            warn!(
                "{}: defaulted to zero: {}",
                path.display(),
                extracted.defaulted.join(", ")
            );
        }

        let offered = self.classifier.classify(
            &text,
            &extracted.fields.financial,
            &extracted.fields.consumption,
        );
        let record = RecordBuilder::new(extracted.fields)
            .source_path(path)
            .offered_period(offered)
            .min_valid_year(self.min_valid_year)
            .build()?;

        let serialized = serde_json::to_string(&record)?;
        self.store
            .save(&record, fingerprint.as_str(), &serialized)
            .map_err(|source| BillError::Persistence {
                operation: StoreOperation::Save,
                source,
            })?;

        Ok(Disposition::Processed(fingerprint))
    }
}

/// Clears the running flag when the run ends, including on early return.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BillError::RunInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
