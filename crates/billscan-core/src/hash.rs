//! Content fingerprints for deduplication.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{BillError, Result};

/// Uppercase hex SHA-256 of a document's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fingerprint content already in memory.
pub fn hash_bytes(bytes: &[u8]) -> Fingerprint {
    Fingerprint(hex::encode_upper(Sha256::digest(bytes)))
}

/// Fingerprint a document on disk, streaming its full content.
pub fn compute_hash(path: &Path) -> Result<Fingerprint> {
    let file_access = |source: io::Error| BillError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(file_access)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(file_access)?;

    Ok(Fingerprint(hex::encode_upper(hasher.finalize())))
}
