//! In-process bill store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{BillStore, StoreResult};
use crate::error::StoreError;
use crate::models::bill::BillRecord;

/// A saved bill.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBill {
    pub record: BillRecord,
    pub serialized: String,
}

/// Store holding bills in a map keyed by fingerprint.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bills: RwLock<HashMap<String, StoredBill>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved bills.
    pub fn len(&self) -> usize {
        self.bills.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Saved bill for a fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<StoredBill> {
        self.bills.read().ok()?.get(fingerprint).cloned()
    }

    /// All saved records, in no particular order.
    pub fn records(&self) -> Vec<BillRecord> {
        self.bills
            .read()
            .map(|b| b.values().map(|s| s.record.clone()).collect())
            .unwrap_or_default()
    }
}

impl BillStore for MemoryStore {
    fn exists(&self, fingerprint: &str) -> StoreResult<bool> {
        let bills = self
            .bills
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(bills.contains_key(fingerprint))
    }

    fn save(&self, record: &BillRecord, fingerprint: &str, serialized: &str) -> StoreResult<()> {
        let mut bills = self
            .bills
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        bills.insert(
            fingerprint.to_string(),
            StoredBill {
                record: record.clone(),
                serialized: serialized.to_string(),
            },
        );
        Ok(())
    }
}
