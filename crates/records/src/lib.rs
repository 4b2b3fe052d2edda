//! Record file support for the surgical tracker.
//!
//! This crate provides the **wire model** and **translation helpers** for one patient's record
//! graph stored as a YAML file:
//! - strict parsing (unknown keys and wrong types are rejected with the failing path)
//! - rendering back to YAML
//! - small file helpers for a flat records directory (`<patient-id>.yaml`)
//!
//! The wire model is private; callers only see `surgtrack_core::Patient`.

pub mod patient_file;

pub use patient_file::PatientFile;

/// Errors returned by the record file crate.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("invalid patient record: {0}")]
    Core(#[from] surgtrack_core::PatientError),
}

/// Type alias for Results that can fail with a [`RecordError`].
pub type RecordResult<T> = Result<T, RecordError>;
