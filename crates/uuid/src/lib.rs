//! Identifier types for patients and their clinical sub-records.
//!
//! Identifiers use a *canonical* UUID representation: **32 lowercase hexadecimal characters**
//! (no hyphens), e.g. `550e8400e29b41d4a716446655440000`. This is the same value
//! `Uuid::new_v4().simple().to_string()` produces.
//!
//! - [`PatientId`] identifies a patient record. It is assigned once at registration and never
//!   changes afterwards.
//! - [`RecordId`] identifies a sub-record owned by a patient (initial presentation, operative
//!   data, follow-up) so an editing layer can address it individually.
//!
//! Externally supplied identifiers (CLI arguments, record files) must already be canonical.
//! Uppercase, hyphenated, wrong-length or non-hex values are rejected rather than normalised.

mod ids;

pub use ids::{PatientId, RecordId};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;

/// Returns true if `input` is in canonical UUID form.
///
/// This is a purely syntactic check: exactly 32 bytes, only `0-9` and `a-f`.
pub fn is_canonical(input: &str) -> bool {
    input.len() == 32
        && input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn parse_canonical(kind: &str, input: &str) -> UuidResult<Uuid> {
    if !is_canonical(input) {
        return Err(UuidError::InvalidInput(format!(
            "{kind} must be 32 lowercase hex characters without hyphens, got: '{input}'"
        )));
    }
    Uuid::parse_str(input)
        .map_err(|e| UuidError::InvalidInput(format!("{kind} is not a valid UUID: {e}")))
}
