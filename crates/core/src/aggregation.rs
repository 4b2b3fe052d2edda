//! Clinical summary facts derived from a patient's record graph.
//!
//! Everything here is a read-only query over an already loaded [`Patient`]. Missing data makes
//! a result absent; nothing here returns an error.

use crate::Patient;
use chrono::NaiveDate;
use surgtrack_types::NonEmptyText;

impl Patient {
    /// Free-text clinical issues in presentation order.
    ///
    /// The initial diagnosis comes first, then procedure names in attachment order, then
    /// complication notes in follow-up order. Absent and blank entries are skipped.
    pub fn current_medical_issues(&self) -> Vec<NonEmptyText> {
        let diagnosis = self
            .presentation()
            .and_then(|p| NonEmptyText::from_optional(p.diagnosis.as_deref()));
        let procedures = self
            .procedures()
            .iter()
            .filter_map(|p| NonEmptyText::from_optional(Some(p.procedure_name.as_str())));
        let complications = self
            .follow_ups()
            .iter()
            .filter_map(|f| NonEmptyText::from_optional(f.complications.as_deref()));

        diagnosis
            .into_iter()
            .chain(procedures)
            .chain(complications)
            .collect()
    }

    /// Latest operation date among attached procedures.
    pub fn most_recent_surgery_date(&self) -> Option<NaiveDate> {
        self.procedures().iter().map(|p| p.operation_date).max()
    }

    /// Total length of stay in days.
    ///
    /// Currently the stored length of stay of the single recorded admission.
    // TODO: sum across admission records once admissions are modelled separately.
    pub fn total_length_of_stay(&self) -> Option<u32> {
        self.fields().length_of_stay_days
    }
}
