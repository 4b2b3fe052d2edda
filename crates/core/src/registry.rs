//! In-memory patient registry.
//!
//! The registry is the single-writer/multiple-reader boundary in front of the aggregator:
//! readers receive a cloned, fully materialised snapshot of a patient, so derivations never
//! observe a half-applied edit. It is a working stand-in for a durable store, not a
//! persistence engine.

use crate::summary::PatientSummary;
use crate::{Patient, PatientError, PatientResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use surgtrack_uuid::PatientId;

/// Shared, thread-safe collection of patients keyed by id.
#[derive(Clone, Debug, Default)]
pub struct PatientRegistry {
    patients: Arc<RwLock<HashMap<PatientId, Patient>>>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PatientResult<RwLockReadGuard<'_, HashMap<PatientId, Patient>>> {
        self.patients.read().map_err(|_| PatientError::LockPoisoned)
    }

    fn write(&self) -> PatientResult<RwLockWriteGuard<'_, HashMap<PatientId, Patient>>> {
        self.patients.write().map_err(|_| PatientError::LockPoisoned)
    }

    /// Adds a patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyExists` if a patient with the same id is registered.
    pub fn insert(&self, patient: Patient) -> PatientResult<PatientId> {
        let id = patient.id();
        let mut patients = self.write()?;
        if patients.contains_key(&id) {
            return Err(PatientError::AlreadyExists(format!("patient {id}")));
        }
        patients.insert(id, patient);
        tracing::debug!(patient_id = %id, "added patient to registry");
        Ok(id)
    }

    /// A snapshot of one patient and all its records.
    pub fn get(&self, id: &PatientId) -> PatientResult<Option<Patient>> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Applies an edit under the write lock.
    ///
    /// The closure receives the live patient, so its mutation methods refresh `updated_at` as
    /// usual.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, or whatever the closure returns.
    pub fn update<T>(
        &self,
        id: &PatientId,
        f: impl FnOnce(&mut Patient) -> PatientResult<T>,
    ) -> PatientResult<T> {
        let mut patients = self.write()?;
        let patient = patients
            .get_mut(id)
            .ok_or_else(|| PatientError::NotFound(format!("patient {id}")))?;
        f(patient)
    }

    /// Removes a patient and, by ownership, every record attached to it. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id.
    pub fn purge(&self, id: &PatientId) -> PatientResult<Patient> {
        let removed = self
            .write()?
            .remove(id)
            .ok_or_else(|| PatientError::NotFound(format!("patient {id}")))?;
        tracing::info!(
            patient_id = %id,
            procedures = removed.procedures().len(),
            follow_ups = removed.follow_ups().len(),
            "purged patient"
        );
        Ok(removed)
    }

    pub fn len(&self) -> PatientResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> PatientResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// All patients, sorted by last name then first name.
    pub fn list(&self) -> PatientResult<Vec<Patient>> {
        let mut patients: Vec<Patient> = self.read()?.values().cloned().collect();
        patients.sort_by(|a, b| {
            let (a, b) = (a.fields(), b.fields());
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(patients)
    }

    /// Summaries of every patient, in [`PatientRegistry::list`] order.
    pub fn summaries(&self, today: NaiveDate) -> PatientResult<Vec<PatientSummary>> {
        Ok(self
            .list()?
            .iter()
            .map(|p| PatientSummary::build(p, today))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FollowUp, JourneyStage, OperativeData};
    use chrono::{DateTime, TimeZone, Utc};
    use std::thread;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn insert_and_get_snapshot() {
        let registry = PatientRegistry::new();
        let id = registry
            .insert(Patient::register("Alice", "Smith", now()))
            .expect("insert should succeed");

        let snapshot = registry.get(&id).expect("lock").expect("present");
        assert_eq!(snapshot.fields().first_name, "Alice");
        assert!(registry.get(&PatientId::new()).expect("lock").is_none());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let registry = PatientRegistry::new();
        let patient = Patient::register("Alice", "Smith", now());
        registry.insert(patient.clone()).expect("first insert");

        let err = registry.insert(patient).expect_err("second insert");
        assert!(matches!(err, PatientError::AlreadyExists(_)));
    }

    #[test]
    fn update_applies_edit_and_refreshes_timestamp() {
        let registry = PatientRegistry::new();
        let id = registry
            .insert(Patient::register("Alice", "Smith", now()))
            .expect("insert");

        let later = now() + chrono::Duration::hours(1);
        registry
            .update(&id, |p| {
                p.set_discharged(true, later);
                Ok(())
            })
            .expect("update");

        let snapshot = registry.get(&id).expect("lock").expect("present");
        assert!(snapshot.is_discharged());
        assert_eq!(snapshot.updated_at(), later);
    }

    #[test]
    fn update_unknown_patient_is_not_found() {
        let registry = PatientRegistry::new();
        let err = registry
            .update(&PatientId::new(), |_| Ok(()))
            .expect_err("unknown id");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn purge_cascades_and_is_final() {
        let registry = PatientRegistry::new();
        let mut patient = Patient::register("Alice", "Smith", now());
        patient
            .attach_procedure(
                OperativeData::new("Cholecystectomy", now().date_naive()),
                now(),
            )
            .expect("fresh record");
        patient
            .attach_follow_up(FollowUp::new(None), now())
            .expect("fresh record");
        let id = registry.insert(patient).expect("insert");

        let removed = registry.purge(&id).expect("purge");
        assert_eq!(removed.procedures().len(), 1);
        assert!(registry.get(&id).expect("lock").is_none());
        assert!(registry.is_empty().expect("lock"));

        let err = registry.purge(&id).expect_err("already purged");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn list_sorts_by_last_then_first_name() {
        let registry = PatientRegistry::new();
        registry.insert(Patient::register("Bob", "Jones", now())).expect("insert");
        registry.insert(Patient::register("Carol", "Adams", now())).expect("insert");
        registry.insert(Patient::register("Alice", "Jones", now())).expect("insert");

        let names: Vec<String> = registry
            .list()
            .expect("lock")
            .iter()
            .map(Patient::display_name)
            .collect();
        assert_eq!(names, vec!["Carol Adams", "Alice Jones", "Bob Jones"]);

        let summaries = registry.summaries(now().date_naive()).expect("lock");
        assert_eq!(summaries.len(), 3);
        assert!(summaries
            .iter()
            .all(|s| s.journey_stage == JourneyStage::Registered));
    }

    #[test]
    fn concurrent_readers_see_consistent_snapshots() {
        let registry = PatientRegistry::new();
        let id = registry
            .insert(Patient::register("Alice", "Smith", now()))
            .expect("insert");

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let snapshot = registry.get(&id).expect("lock").expect("present");
                    PatientSummary::build(&snapshot, now().date_naive()).journey_stage
                })
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.join().expect("reader thread"), JourneyStage::Registered);
        }
    }
}
