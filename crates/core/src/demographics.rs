//! Patient demographics: gender, contact details, age and completeness gates.

use crate::Patient;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use surgtrack_types::is_present;

/// Recorded gender.
///
/// `Unknown` is a recorded answer; a gender that was never asked is `None` on the patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
    Unknown,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Some(Gender::Female),
            "male" | "m" => Some(Gender::Male),
            "other" => Some(Gender::Other),
            "unknown" => Some(Gender::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ways of reaching the patient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    /// General free-text contact information (email, next of kin, ...).
    pub contact_info: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactDetails {
    /// True if at least one contact channel holds non-blank text.
    pub fn is_available(&self) -> bool {
        [&self.contact_info, &self.phone, &self.address]
            .into_iter()
            .any(|field| is_present(field.as_deref()))
    }
}

/// Whole calendar years between `date_of_birth` and `today`.
///
/// A birthday later in the year than `today` has not been reached yet, so it does not count.
/// Returns `None` when the date of birth is absent or lies after `today`.
pub fn age_on(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    today.years_since(date_of_birth?)
}

/// Demographic fields that are still missing, by name.
pub(crate) fn missing_demographics(patient: &Patient) -> Vec<&'static str> {
    let fields = patient.fields();
    let mut missing = Vec::new();

    if !is_present(Some(fields.first_name.as_str())) {
        missing.push("first_name");
    }
    if !is_present(Some(fields.last_name.as_str())) {
        missing.push("last_name");
    }
    if fields.date_of_birth.is_none() {
        missing.push("date_of_birth");
    }
    if fields.gender.is_none() {
        missing.push("gender");
    }
    if !is_present(fields.medical_record_number.as_deref()) {
        missing.push("medical_record_number");
    }

    missing
}

impl Patient {
    /// Age on the given date. See [`age_on`].
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_on(self.fields().date_of_birth, today)
    }

    /// Age today by the UTC clock.
    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }

    /// True iff first name, last name, date of birth, gender and medical record number are all
    /// recorded (text fields must be non-blank after trimming).
    pub fn has_complete_demographics(&self) -> bool {
        missing_demographics(self).is_empty()
    }

    /// True iff at least one of general contact info, phone or address is recorded.
    pub fn has_contact_details(&self) -> bool {
        self.fields().contact.is_available()
    }
}
