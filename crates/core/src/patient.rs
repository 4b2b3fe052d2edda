//! The patient root entity and its lifecycle.
//!
//! A [`Patient`] exclusively owns its initial presentation, operative data and follow-ups.
//! Every mutation goes through a method that takes the current time and refreshes
//! `updated_at`, which is never allowed to fall behind `created_at`. The identifier is fixed at
//! registration.

use crate::clinical::{FollowUp, InitialPresentation, OperativeData};
use crate::demographics::{ContactDetails, Gender};
use crate::bmi::Measurements;
use crate::validation::validate_unique_record_ids;
use crate::{PatientError, PatientResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surgtrack_uuid::{PatientId, RecordId};

/// Directly editable patient fields.
///
/// The editing layer changes these through [`Patient::edit`], never by reaching into the
/// patient, so the modification timestamp cannot be forgotten.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_record_number: Option<String>,
    pub gender: Option<Gender>,
    pub contact: ContactDetails,
    pub measurements: Measurements,
    /// Stored length of stay, in days, for the current admission.
    pub length_of_stay_days: Option<u32>,
    /// Whether the patient is currently discharged.
    pub discharged: bool,
}

/// Everything needed to rebuild a [`Patient`] that was loaded from a store.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientParts {
    pub id: PatientId,
    pub fields: PatientFields,
    pub presentation: Option<InitialPresentation>,
    pub procedures: Vec<OperativeData>,
    pub follow_ups: Vec<FollowUp>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A patient and the clinical records attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: PatientId,
    fields: PatientFields,
    presentation: Option<InitialPresentation>,
    procedures: Vec<OperativeData>,
    follow_ups: Vec<FollowUp>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Patient {
    /// Registers a new patient with a freshly allocated identifier and no clinical records.
    pub fn register(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PatientId::new(),
            fields: PatientFields {
                first_name: first_name.into(),
                last_name: last_name.into(),
                ..PatientFields::default()
            },
            presentation: None,
            procedures: Vec::new(),
            follow_ups: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a patient from stored parts.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if `updated_at` precedes `created_at` or if two
    /// sub-records share an identifier.
    pub fn restore(parts: PatientParts) -> PatientResult<Self> {
        if parts.updated_at < parts.created_at {
            return Err(PatientError::InvalidInput(format!(
                "patient {} was last modified ({}) before it was created ({})",
                parts.id, parts.updated_at, parts.created_at
            )));
        }

        validate_unique_record_ids(
            parts
                .presentation
                .iter()
                .map(|p| p.id)
                .chain(parts.procedures.iter().map(|p| p.id))
                .chain(parts.follow_ups.iter().map(|f| f.id)),
        )?;

        Ok(Self {
            id: parts.id,
            fields: parts.fields,
            presentation: parts.presentation,
            procedures: parts.procedures,
            follow_ups: parts.follow_ups,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn fields(&self) -> &PatientFields {
        &self.fields
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn presentation(&self) -> Option<&InitialPresentation> {
        self.presentation.as_ref()
    }

    /// Procedures in the order they were attached.
    pub fn procedures(&self) -> &[OperativeData] {
        &self.procedures
    }

    /// Procedures ordered by operation date, oldest first. Ties keep attachment order.
    pub fn procedures_by_date(&self) -> Vec<&OperativeData> {
        let mut sorted: Vec<&OperativeData> = self.procedures.iter().collect();
        sorted.sort_by_key(|p| p.operation_date);
        sorted
    }

    /// Follow-ups in the order they were attached.
    pub fn follow_ups(&self) -> &[FollowUp] {
        &self.follow_ups
    }

    pub fn is_discharged(&self) -> bool {
        self.fields.discharged
    }

    /// "First Last", skipping whichever part is blank.
    pub fn display_name(&self) -> String {
        [
            self.fields.first_name.trim(),
            self.fields.last_name.trim(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Decomposes the patient into its stored parts.
    pub fn into_parts(self) -> PatientParts {
        PatientParts {
            id: self.id,
            fields: self.fields,
            presentation: self.presentation,
            procedures: self.procedures,
            follow_ups: self.follow_ups,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Refreshes the modification timestamp.
    ///
    /// A clock that reads earlier than `created_at` is clamped to `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Applies an edit to the patient's direct fields.
    pub fn edit<T>(&mut self, now: DateTime<Utc>, f: impl FnOnce(&mut PatientFields) -> T) -> T {
        let out = f(&mut self.fields);
        self.touch(now);
        out
    }

    pub fn set_discharged(&mut self, discharged: bool, now: DateTime<Utc>) {
        self.edit(now, |fields| fields.discharged = discharged);
    }

    pub fn set_length_of_stay(&mut self, days: Option<u32>, now: DateTime<Utc>) {
        self.edit(now, |fields| fields.length_of_stay_days = days);
    }

    /// Fails if `id` already belongs to an attached sub-record. The current presentation is
    /// ignored when it is about to be replaced.
    fn ensure_record_id_free(
        &self,
        id: RecordId,
        replacing_presentation: bool,
    ) -> PatientResult<()> {
        let taken = (!replacing_presentation && self.presentation.iter().any(|p| p.id == id))
            || self.procedures.iter().any(|p| p.id == id)
            || self.follow_ups.iter().any(|f| f.id == id);
        if taken {
            return Err(PatientError::AlreadyExists(format!(
                "record {id} is already attached to patient {}",
                self.id
            )));
        }
        Ok(())
    }

    /// Sets the initial presentation, returning the one it replaces.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyExists` if a procedure or follow-up already uses the
    /// presentation's id.
    pub fn set_presentation(
        &mut self,
        presentation: InitialPresentation,
        now: DateTime<Utc>,
    ) -> PatientResult<Option<InitialPresentation>> {
        self.ensure_record_id_free(presentation.id, true)?;
        let previous = self.presentation.replace(presentation);
        self.touch(now);
        Ok(previous)
    }

    pub fn clear_presentation(&mut self, now: DateTime<Utc>) -> Option<InitialPresentation> {
        let previous = self.presentation.take();
        self.touch(now);
        previous
    }

    /// Attaches a procedure after any already attached.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyExists` if a sub-record with the same id is attached.
    pub fn attach_procedure(
        &mut self,
        procedure: OperativeData,
        now: DateTime<Utc>,
    ) -> PatientResult<RecordId> {
        let id = procedure.id;
        self.ensure_record_id_free(id, false)?;
        self.procedures.push(procedure);
        self.touch(now);
        Ok(id)
    }

    /// Detaches a procedure.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no procedure has this id.
    pub fn detach_procedure(
        &mut self,
        id: RecordId,
        now: DateTime<Utc>,
    ) -> PatientResult<OperativeData> {
        let index = self
            .procedures
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PatientError::NotFound(format!("procedure {id}")))?;
        let removed = self.procedures.remove(index);
        self.touch(now);
        Ok(removed)
    }

    /// Attaches a follow-up after any already attached.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyExists` if a sub-record with the same id is attached.
    pub fn attach_follow_up(
        &mut self,
        follow_up: FollowUp,
        now: DateTime<Utc>,
    ) -> PatientResult<RecordId> {
        let id = follow_up.id;
        self.ensure_record_id_free(id, false)?;
        self.follow_ups.push(follow_up);
        self.touch(now);
        Ok(id)
    }

    /// Detaches a follow-up.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no follow-up has this id.
    pub fn detach_follow_up(&mut self, id: RecordId, now: DateTime<Utc>) -> PatientResult<FollowUp> {
        let index = self
            .follow_ups
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| PatientError::NotFound(format!("follow-up {id}")))?;
        let removed = self.follow_ups.remove(index);
        self.touch(now);
        Ok(removed)
    }
}
