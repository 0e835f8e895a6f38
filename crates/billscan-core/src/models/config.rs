//! Configuration structures for the bill pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classify::DEFAULT_OFFERED_KEYWORDS;

/// Main configuration for the billscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillscanConfig {
    /// PDF page selection.
    pub pdf: PdfConfig,

    /// Field extraction and classification.
    pub extraction: ExtractionConfig,

    /// Batch run defaults.
    pub batch: BatchConfig,
}

/// Which pages of a bill carry the scraped data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Leading pages to ignore (cover page).
    pub skip_pages: usize,

    /// Pages to keep after the skipped ones.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            skip_pages: 1,
            max_pages: 2,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Treat an unmatched consumption or financial field as zero.
    ///
    /// Defaulted fields are logged at warn level either way. When disabled, a
    /// missing field fails its extraction stage.
    pub zero_default_missing_fields: bool,

    /// Records must have a year strictly greater than this.
    pub min_valid_year: i32,

    /// Case-insensitive labels that mark a promotional period.
    pub offered_keywords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            zero_default_missing_fields: true,
            min_valid_year: 2000,
            offered_keywords: DEFAULT_OFFERED_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Batch run defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Glob pattern matched inside the folder.
    pub file_pattern: String,

    /// Ledger file used by the CLI store.
    pub ledger_path: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            file_pattern: "*.pdf".to_string(),
            ledger_path: None,
        }
    }
}

impl BillscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
