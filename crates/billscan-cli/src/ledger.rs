//! Append-only JSON-lines ledger used as the CLI's bill store.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use billscan_core::store::StoreResult;
use billscan_core::{BillRecord, BillStore, StoreError};

/// One saved bill.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub fingerprint: String,
    pub saved_at: DateTime<Utc>,
    pub record: serde_json::Value,
}

/// Bill store backed by a ledger file, one entry per line.
///
/// Fingerprints are indexed in memory at open; each save is flushed before the
/// index is updated.
pub struct LedgerStore {
    path: PathBuf,
    index: RwLock<HashSet<String>>,
    file: Mutex<File>,
}

impl LedgerStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let index = if path.exists() {
            load_index(path)?
        } else {
            HashSet::new()
        };
        debug!("Opened ledger {} with {} entries", path.display(), index.len());

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            index: RwLock::new(index),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bills in the ledger.
    pub fn len(&self) -> usize {
        self.index.read().map(|i| i.len()).unwrap_or(0)
    }
}

/// Read every fingerprint in the ledger.
///
/// An unparsable last line with no trailing newline is a write that never
/// finished; it is cut off so later appends start on a fresh line. Any other
/// malformed line is corruption.
fn load_index(path: &Path) -> StoreResult<HashSet<String>> {
    let bytes = fs::read(path)?;
    let mut index = HashSet::new();
    let mut good_len = 0usize;
    let mut truncated = false;
    let mut missing_newline = false;

    for (n, chunk) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
        let complete = chunk.ends_with(b"\n");
        let line = chunk.trim_ascii();
        if !line.is_empty() {
            match serde_json::from_slice::<LedgerEntry>(line) {
                Ok(entry) => {
                    index.insert(entry.fingerprint);
                    missing_newline = !complete;
                }
                Err(e) if !complete => {
                    warn!(
                        "Dropping unfinished last entry of {} (line {}): {}",
                        path.display(),
                        n + 1,
                        e
                    );
                    truncated = true;
                    break;
                }
                Err(e) => {
                    return Err(StoreError::Corrupt(format!(
                        "{} line {}: {}",
                        path.display(),
                        n + 1,
                        e
                    )));
                }
            }
        }
        good_len += chunk.len();
    }

    if truncated {
        OpenOptions::new()
            .write(true)
            .open(path)?
            .set_len(good_len as u64)?;
    } else if missing_newline {
        OpenOptions::new().append(true).open(path)?.write_all(b"\n")?;
    }
    Ok(index)
}

impl BillStore for LedgerStore {
    fn exists(&self, fingerprint: &str) -> StoreResult<bool> {
        let index = self
            .index
            .read()
            .map_err(|_| StoreError::Backend("ledger index lock poisoned".to_string()))?;
        Ok(index.contains(fingerprint))
    }

    fn save(&self, _record: &BillRecord, fingerprint: &str, serialized: &str) -> StoreResult<()> {
        let entry = LedgerEntry {
            fingerprint: fingerprint.to_string(),
            saved_at: Utc::now(),
            record: serde_json::from_str(serialized)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        };
        let line = serde_json::to_string(&entry).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut file = self
            .file
            .lock()
            .map_err(|_| StoreError::Backend("ledger file lock poisoned".to_string()))?;
        file.write_all(format!("{}\n", line).as_bytes())?;
        file.flush()?;

        self.index
            .write()
            .map_err(|_| StoreError::Backend("ledger index lock poisoned".to_string()))?
            .insert(entry.fingerprint);
        Ok(())
    }
}
