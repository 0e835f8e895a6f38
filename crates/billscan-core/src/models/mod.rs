//! Data models for bills, run outcomes and configuration.

pub mod bill;
pub mod config;
pub mod outcome;

pub use bill::{BillRecord, Consumption, ExtractedFields, Financial};
pub use config::BillscanConfig;
pub use outcome::{DocumentFailure, FailureStage, ProcessingOutcome};
