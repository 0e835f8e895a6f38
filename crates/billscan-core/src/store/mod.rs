//! Persistence seam and the deduplication gate in front of it.

mod memory;

pub use memory::{MemoryStore, StoredBill};

use std::sync::Arc;

use tracing::debug;

use crate::error::{BillError, Result, StoreError, StoreOperation};
use crate::hash::Fingerprint;
use crate::models::bill::BillRecord;

/// Result type for store implementations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// External persistence for saved bills.
///
/// A successful `save` must be visible to the next `exists` call for the same
/// fingerprint.
pub trait BillStore {
    /// Whether a bill with this fingerprint has been saved.
    fn exists(&self, fingerprint: &str) -> StoreResult<bool>;

    /// Persist a record with its fingerprint and serialized form.
    fn save(&self, record: &BillRecord, fingerprint: &str, serialized: &str) -> StoreResult<()>;
}

impl<T: BillStore + ?Sized> BillStore for Arc<T> {
    fn exists(&self, fingerprint: &str) -> StoreResult<bool> {
        (**self).exists(fingerprint)
    }

    fn save(&self, record: &BillRecord, fingerprint: &str, serialized: &str) -> StoreResult<()> {
        (**self).save(record, fingerprint, serialized)
    }
}

/// Skip-or-process decision, made before any parsing happens.
pub struct DeduplicationGate<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: BillStore + ?Sized> DeduplicationGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Whether the fingerprint is already stored.
    ///
    /// Store failures are errors, never "not found".
    pub fn is_known(&self, fingerprint: &Fingerprint) -> Result<bool> {
        let known = self
            .store
            .exists(fingerprint.as_str())
            .map_err(|source| BillError::Persistence {
                operation: StoreOperation::Exists,
                source,
            })?;
        debug!("Fingerprint {} known: {}", fingerprint, known);
        Ok(known)
    }
}
