//! Input validation used on the editing and loading paths.
//!
//! Derivations never fail; these checks exist for callers that must refuse a record, such as a
//! store loading a file or a workflow that needs full demographics before it proceeds.

use crate::demographics::missing_demographics;
use crate::{Patient, PatientError, PatientResult};
use std::collections::HashSet;
use surgtrack_uuid::RecordId;

/// Rejects a set of sub-record ids containing a duplicate.
///
/// # Errors
///
/// Returns `PatientError::InvalidInput` naming the first repeated id.
pub fn validate_unique_record_ids(ids: impl IntoIterator<Item = RecordId>) -> PatientResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PatientError::InvalidInput(format!(
                "duplicate record id {id}"
            )));
        }
    }
    Ok(())
}

/// Gate for workflows that need full demographics.
///
/// # Errors
///
/// Returns `PatientError::InvalidInput` listing every missing field.
pub fn require_complete_demographics(patient: &Patient) -> PatientResult<()> {
    let missing = missing_demographics(patient);
    if missing.is_empty() {
        return Ok(());
    }
    Err(PatientError::InvalidInput(format!(
        "patient {} is missing demographics: {}",
        patient.id(),
        missing.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gender;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn unique_ids_pass() {
        validate_unique_record_ids([RecordId::new(), RecordId::new()]).expect("distinct ids");
        validate_unique_record_ids(Vec::<RecordId>::new()).expect("no ids");
    }

    #[test]
    fn repeated_id_is_reported() {
        let id = RecordId::new();
        let err = validate_unique_record_ids([id, RecordId::new(), id]).expect_err("repeat");
        match err {
            PatientError::InvalidInput(msg) => assert!(msg.contains(&id.to_string())),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn gate_lists_missing_fields() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut patient = Patient::register("Sarah", "", now);

        let err = require_complete_demographics(&patient).expect_err("incomplete");
        let msg = err.to_string();
        assert!(msg.contains("last_name"));
        assert!(msg.contains("date_of_birth"));
        assert!(msg.contains("gender"));
        assert!(msg.contains("medical_record_number"));
        assert!(!msg.contains("first_name"));

        patient.edit(now, |f| {
            f.last_name = "Williams".into();
            f.date_of_birth = NaiveDate::from_ymd_opt(1992, 3, 20);
            f.gender = Some(Gender::Female);
            f.medical_record_number = Some("MRN-7".into());
        });
        require_complete_demographics(&patient).expect("complete");
    }
}
