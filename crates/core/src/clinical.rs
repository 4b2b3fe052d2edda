//! Clinical sub-records owned by a patient.
//!
//! A patient owns at most one [`InitialPresentation`], and any number of [`OperativeData`] and
//! [`FollowUp`] records. None of these are shared between patients; they live inside the
//! owning [`Patient`](crate::Patient) and are dropped with it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surgtrack_uuid::RecordId;

/// The pre-operative clinical assessment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPresentation {
    pub id: RecordId,
    /// Working diagnosis at presentation. May be absent or blank.
    pub diagnosis: Option<String>,
    pub presenting_complaint: Option<String>,
    pub presented_on: Option<NaiveDate>,
}

impl InitialPresentation {
    pub fn new(diagnosis: Option<String>) -> Self {
        Self {
            id: RecordId::new(),
            diagnosis,
            presenting_complaint: None,
            presented_on: None,
        }
    }

    pub fn with_complaint(mut self, complaint: impl Into<String>) -> Self {
        self.presenting_complaint = Some(complaint.into());
        self
    }

    pub fn presented_on(mut self, date: NaiveDate) -> Self {
        self.presented_on = Some(date);
        self
    }
}

/// One performed surgical procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperativeData {
    pub id: RecordId,
    pub procedure_name: String,
    pub operation_date: NaiveDate,
    pub surgeon: Option<String>,
    pub notes: Option<String>,
}

impl OperativeData {
    pub fn new(procedure_name: impl Into<String>, operation_date: NaiveDate) -> Self {
        Self {
            id: RecordId::new(),
            procedure_name: procedure_name.into(),
            operation_date,
            surgeon: None,
            notes: None,
        }
    }

    pub fn with_surgeon(mut self, surgeon: impl Into<String>) -> Self {
        self.surgeon = Some(surgeon.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A post-operative check-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: RecordId,
    pub seen_on: Option<NaiveDate>,
    /// Complications noted at this visit. Absent or blank means none were noted.
    pub complications: Option<String>,
    pub notes: Option<String>,
}

impl FollowUp {
    pub fn new(complications: Option<String>) -> Self {
        Self {
            id: RecordId::new(),
            seen_on: None,
            complications,
            notes: None,
        }
    }

    pub fn seen_on(mut self, date: NaiveDate) -> Self {
        self.seen_on = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
