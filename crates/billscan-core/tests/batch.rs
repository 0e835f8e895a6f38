mod common;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use billscan_core::{
    hash_bytes, BatchOrchestrator, BillError, BillscanConfig, CancellationToken, DocumentSource,
    FailureStage, MemoryStore, ProcessingOutcome, Result, Stage,
};

use common::{write_doc, BillPage, BrokenStore, FormFeedSource, Unreadable};

fn orchestrator() -> BatchOrchestrator<MemoryStore, FormFeedSource> {
    BatchOrchestrator::new(MemoryStore::new(), FormFeedSource::default())
}

fn tally(outcome: &ProcessingOutcome) -> (usize, usize, usize, usize) {
    (
        outcome.files_found,
        outcome.processed,
        outcome.skipped,
        outcome.failed,
    )
}

#[test]
fn well_formed_bill_is_processed() {
    let dir = tempfile::tempdir().unwrap();
    let content = BillPage::default().document();
    write_doc(dir.path(), "jan.txt", &content);

    let orchestrator = orchestrator();
    let outcome = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (1, 1, 0, 0));
    assert!(outcome.failures.is_empty());
    assert!(!outcome.cancelled);

    let stored = orchestrator
        .store()
        .get(hash_bytes(content.as_bytes()).as_str())
        .unwrap();
    let record = stored.record;
    assert_eq!(record.month(), "January");
    assert_eq!(record.year(), 2025);
    assert!(!record.is_offered_period());
    assert_eq!(record.consumption().total_units(), 150);
    assert_eq!(record.consumption().base_price(), Decimal::new(15, 2));
    assert_eq!(
        record.consumption().price_after_discount(),
        record.consumption().base_price() - record.consumption().discount_value()
    );
    assert_eq!(record.financial().total_amount, Decimal::new(4530, 2));
    assert_eq!(record.source_path(), dir.path().join("jan.txt"));

    let json: serde_json::Value = serde_json::from_str(&stored.serialized).unwrap();
    assert_eq!(json["month"], "January");
    assert_eq!(json["financial"]["totalAmount"], "45.30");
}

#[test]
fn second_run_skips_known_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "jan.txt", &BillPage::default().document());

    let orchestrator = orchestrator();
    let first = orchestrator.process(dir.path(), "*.txt").unwrap();
    let second = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&first), (1, 1, 0, 0));
    assert_eq!(tally(&second), (1, 0, 1, 0));
    assert_eq!(orchestrator.store().len(), 1);
}

#[test]
fn rerun_over_many_documents_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let periods = [
        "01 Jan 2025 to 31 Jan 2025",
        "01 Fev 2025 a 28 Fev 2025",
        "01 Mar 2025 a 31 Mar 2025",
    ];
    for (i, period) in periods.into_iter().enumerate() {
        let page = BillPage {
            period,
            ..BillPage::default()
        };
        write_doc(dir.path(), &format!("bill-{i}.txt"), &page.document());
    }
    write_doc(dir.path(), "broken.txt", "capa\x0csem dados");

    let orchestrator = orchestrator();
    let first = orchestrator.process(dir.path(), "*.txt").unwrap();
    assert_eq!(tally(&first), (4, 3, 0, 1));

    let second = orchestrator.process(dir.path(), "*.txt").unwrap();
    assert_eq!(second.skipped, 3);
    assert_eq!(second.failed, 1);
    assert!(second.is_complete());
}

#[test]
fn missing_period_fails_with_period_stage() {
    let dir = tempfile::tempdir().unwrap();
    let page = BillPage {
        period: "janeiro de 2025",
        ..BillPage::default()
    };
    write_doc(dir.path(), "no-period.txt", &page.document());

    let outcome = orchestrator().process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (1, 0, 0, 1));
    assert_eq!(outcome.failures[0].stage, FailureStage::Extraction(Stage::Period));
    let message = &outcome.messages()[0];
    assert!(message.starts_with("no-period.txt: "), "{message}");
    assert!(message.contains("stage=period"), "{message}");
}

#[test]
fn cover_page_is_not_searched() {
    let dir = tempfile::tempdir().unwrap();
    let content = "Período: 01 Jan 2025 to 31 Jan 2025\x0cConsumo total: 150 kWh\n\x0cInformação legal";
    write_doc(dir.path(), "cover-only.txt", content);

    let outcome = orchestrator().process(dir.path(), "*.txt").unwrap();
    assert_eq!(outcome.failures[0].stage, FailureStage::Extraction(Stage::Period));
}

#[test]
fn unreadable_document_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "a.txt", &BillPage::default().document());
    write_doc(dir.path(), "b-locked.txt", &BillPage::default().document());
    let march = BillPage {
        period: "01 Mar 2025 a 31 Mar 2025",
        ..BillPage::default()
    };
    write_doc(dir.path(), "c.txt", &march.document());

    let source = Unreadable {
        inner: FormFeedSource::default(),
        names: vec!["b-locked.txt"],
    };
    let outcome = BatchOrchestrator::new(MemoryStore::new(), source)
        .process(dir.path(), "*.txt")
        .unwrap();

    assert_eq!(tally(&outcome), (3, 2, 0, 1));
    assert_eq!(outcome.failures[0].file, "b-locked.txt");
    assert_eq!(outcome.failures[0].stage, FailureStage::Read);
    assert!(outcome.messages()[0].contains("stage=read"));
}

#[test]
fn identical_content_under_two_names_is_saved_once() {
    let dir = tempfile::tempdir().unwrap();
    let content = BillPage::default().document();
    write_doc(dir.path(), "jan.txt", &content);
    write_doc(dir.path(), "jan-copy.txt", &content);

    let orchestrator = orchestrator();
    let outcome = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (2, 1, 1, 0));
    assert_eq!(orchestrator.store().len(), 1);
}

#[test]
fn zero_total_with_usage_is_offered() {
    let dir = tempfile::tempdir().unwrap();
    let page = BillPage {
        total: "0,00",
        ..BillPage::default()
    };
    write_doc(dir.path(), "free.txt", &page.document());

    let orchestrator = orchestrator();
    orchestrator.process(dir.path(), "*.txt").unwrap();

    let records = orchestrator.store().records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_offered_period());
}

#[test]
fn promotional_label_is_offered() {
    let dir = tempfile::tempdir().unwrap();
    let page = BillPage {
        notice: "Mês de oferta de boas-vindas",
        ..BillPage::default()
    };
    write_doc(dir.path(), "promo.txt", &page.document());

    let orchestrator = orchestrator();
    orchestrator.process(dir.path(), "*.txt").unwrap();
    assert!(orchestrator.store().records()[0].is_offered_period());
}

#[test]
fn year_not_after_2000_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let page = BillPage {
        period: "01 Dez 1999 a 31 Dez 1999",
        ..BillPage::default()
    };
    write_doc(dir.path(), "old.txt", &page.document());

    let orchestrator = orchestrator();
    let outcome = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (1, 0, 0, 1));
    assert_eq!(outcome.failures[0].stage, FailureStage::Validation);
    assert!(orchestrator.store().is_empty());
}

#[test]
fn strict_config_rejects_missing_amounts() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "partial.txt",
        "capa\x0cPeríodo: 01 Jan 2025 to 31 Jan 2025\nConsumo total: 150 kWh\n",
    );

    let mut config = BillscanConfig::default();
    config.extraction.zero_default_missing_fields = false;
    let strict = orchestrator().with_config(&config);
    let outcome = strict.process(dir.path(), "*.txt").unwrap();
    assert_eq!(
        outcome.failures[0].stage,
        FailureStage::Extraction(Stage::Consumption)
    );

    let lenient = orchestrator().with_config(&BillscanConfig::default());
    let outcome = lenient.process(dir.path(), "*.txt").unwrap();
    assert_eq!(outcome.processed, 1);
}

#[test]
fn dedup_failure_is_a_document_failure() {
    struct CountingSource {
        inner: FormFeedSource,
        text_calls: AtomicUsize,
    }

    impl DocumentSource for CountingSource {
        fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
            self.inner.list(folder, pattern)
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>> {
            self.inner.read(path)
        }

        fn text(&self, path: &Path, bytes: &[u8]) -> Result<String> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.text(path, bytes)
        }
    }

    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "jan.txt", &BillPage::default().document());

    let source = CountingSource {
        inner: FormFeedSource::default(),
        text_calls: AtomicUsize::new(0),
    };
    let orchestrator = BatchOrchestrator::new(BrokenStore { fail_exists: true }, source);
    let outcome = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (1, 0, 0, 1));
    assert_eq!(outcome.failures[0].stage, FailureStage::Dedup);
    assert!(outcome.failures[0].detail.contains("connection refused"));
    assert_eq!(orchestrator.source().text_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn save_failure_is_a_document_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "jan.txt", &BillPage::default().document());

    let orchestrator =
        BatchOrchestrator::new(BrokenStore { fail_exists: false }, FormFeedSource::default());
    let outcome = orchestrator.process(dir.path(), "*.txt").unwrap();

    assert_eq!(tally(&outcome), (1, 0, 0, 1));
    assert_eq!(outcome.failures[0].stage, FailureStage::Persist);
}

#[test]
fn empty_folder_yields_zero_outcome() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "readme.md", "not a bill");

    let outcome = orchestrator().process(dir.path(), "*.txt").unwrap();
    assert_eq!(outcome, ProcessingOutcome::default());
}

#[test]
fn missing_folder_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = orchestrator()
        .process(&dir.path().join("missing"), "*.txt")
        .unwrap_err();
    assert!(matches!(err, BillError::Config(_)));
}

#[test]
fn cancelled_before_start_attempts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "a.txt", &BillPage::default().document());
    write_doc(dir.path(), "b.txt", "capa\x0csem dados");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = orchestrator()
        .process_with_cancel(dir.path(), "*.txt", &cancel)
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(tally(&outcome), (2, 0, 0, 0));
    assert!(!outcome.is_complete());
}

#[test]
fn cancellation_between_documents_keeps_progress() {
    struct CancelAfterFirst {
        inner: FormFeedSource,
        cancel: CancellationToken,
    }

    impl DocumentSource for CancelAfterFirst {
        fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
            self.inner.list(folder, pattern)
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>> {
            self.cancel.cancel();
            self.inner.read(path)
        }

        fn text(&self, path: &Path, bytes: &[u8]) -> Result<String> {
            self.inner.text(path, bytes)
        }
    }

    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "a.txt", &BillPage::default().document());
    let march = BillPage {
        period: "01 Mar 2025 a 31 Mar 2025",
        ..BillPage::default()
    };
    write_doc(dir.path(), "b.txt", &march.document());

    let cancel = CancellationToken::new();
    let source = CancelAfterFirst {
        inner: FormFeedSource::default(),
        cancel: cancel.clone(),
    };
    let outcome = BatchOrchestrator::new(MemoryStore::new(), source)
        .process_with_cancel(dir.path(), "*.txt", &cancel)
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(tally(&outcome), (2, 1, 0, 0));
}

#[test]
fn concurrent_run_is_rejected() {
    struct GatedSource {
        inner: FormFeedSource,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl DocumentSource for GatedSource {
        fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
            self.inner.list(folder, pattern)
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            self.inner.read(path)
        }

        fn text(&self, path: &Path, bytes: &[u8]) -> Result<String> {
            self.inner.text(path, bytes)
        }
    }

    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "jan.txt", &BillPage::default().document());

    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let source = GatedSource {
        inner: FormFeedSource::default(),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    let orchestrator = Arc::new(BatchOrchestrator::new(MemoryStore::new(), source));

    let background = Arc::clone(&orchestrator);
    let folder = dir.path().to_path_buf();
    let handle = thread::spawn(move || background.process(&folder, "*.txt"));

    entered_rx.recv().unwrap();
    assert!(orchestrator.is_running());
    assert!(matches!(
        orchestrator.process(dir.path(), "*.txt"),
        Err(BillError::RunInProgress)
    ));

    release_tx.send(()).unwrap();
    let outcome = handle.join().unwrap().unwrap();
    assert_eq!(tally(&outcome), (1, 1, 0, 0));
    assert!(!orchestrator.is_running());
}
