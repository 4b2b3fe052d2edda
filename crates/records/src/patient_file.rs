//! YAML wire model for a patient record graph and translation helpers.
//!
//! Responsibilities:
//! - Define a strict wire model for serialisation/deserialisation
//! - Translate between `surgtrack_core` domain types and the wire model
//! - Read, write, list and remove record files in a records directory
//!
//! Notes:
//! - Dates are `YYYY-MM-DD`, timestamps RFC 3339
//! - A record file is mutable and overwritten on every save

use crate::{RecordError, RecordResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use surgtrack_core::constants::{DATE_FORMAT, RECORD_FILE_EXTENSION};
use surgtrack_core::{
    ContactDetails, FollowUp, Gender, InitialPresentation, Measurements, OperativeData, Patient,
    PatientFields, PatientId, PatientParts, RecordId,
};

// ============================================================================
// Public PatientFile operations
// ============================================================================

/// Patient record file operations.
///
/// This is a zero-sized type used for namespacing record-file operations.
/// All methods are associated functions.
pub struct PatientFile;

impl PatientFile {
    /// File name for a patient's record: `<id>.yaml`.
    pub fn file_name(id: PatientId) -> String {
        format!("{id}.{RECORD_FILE_EXTENSION}")
    }

    pub fn path_in(records_dir: &Path, id: PatientId) -> PathBuf {
        records_dir.join(Self::file_name(id))
    }

    /// Parse a patient record graph from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `procedures[0].operation_date`) to the failing field when the YAML does not match the
    /// wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if:
    /// - the YAML does not match the wire schema (including unknown keys),
    /// - an identifier is not canonical,
    /// - a date, timestamp or gender cannot be parsed,
    /// - the record violates a patient invariant (for example `updated_at < created_at`).
    pub fn parse(yaml_text: &str) -> RecordResult<Patient> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, PatientWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(RecordError::Translation(format!(
                    "Patient record schema mismatch at {path}: {source}"
                )));
            }
        };

        wire_to_domain(wire)
    }

    /// Render a patient record graph as YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidYaml`] if serialisation fails.
    pub fn render(patient: &Patient) -> RecordResult<String> {
        let wire = domain_to_wire(patient);
        Ok(serde_yaml::to_string(&wire)?)
    }

    pub fn load(path: &Path) -> RecordResult<Patient> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Writes the patient's record file into `records_dir`, creating the directory if needed.
    pub fn save(records_dir: &Path, patient: &Patient) -> RecordResult<PathBuf> {
        fs::create_dir_all(records_dir)?;
        let path = Self::path_in(records_dir, patient.id());
        fs::write(&path, Self::render(patient)?)?;
        tracing::debug!(patient_id = %patient.id(), path = %path.display(), "saved record");
        Ok(path)
    }

    /// Loads the record of one patient from `records_dir`.
    pub fn load_by_id(records_dir: &Path, id: PatientId) -> RecordResult<Patient> {
        let path = Self::path_in(records_dir, id);
        if !path.is_file() {
            return Err(RecordError::InvalidInput(format!(
                "no record file for patient {id} in {}",
                records_dir.display()
            )));
        }
        let patient = Self::load(&path)?;
        if patient.id() != id {
            return Err(RecordError::InvalidInput(format!(
                "record file {} holds patient {}",
                path.display(),
                patient.id()
            )));
        }
        Ok(patient)
    }

    /// Loads every readable record file in `records_dir`.
    ///
    /// Files that cannot be parsed are logged and skipped. A missing directory yields an empty
    /// list.
    pub fn list(records_dir: &Path) -> Vec<Patient> {
        let mut patients = Vec::new();

        let entries = match fs::read_dir(records_dir) {
            Ok(it) => it,
            Err(_) => return patients,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_record = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(RECORD_FILE_EXTENSION);
            if !is_record {
                continue;
            }

            match Self::load(&path) {
                Ok(patient) => patients.push(patient),
                Err(e) => {
                    tracing::warn!("failed to load patient record {}: {}", path.display(), e);
                }
            }
        }

        patients
    }

    /// Deletes a patient's record file. Irreversible.
    pub fn remove(records_dir: &Path, id: PatientId) -> RecordResult<()> {
        let path = Self::path_in(records_dir, id);
        if !path.is_file() {
            return Err(RecordError::InvalidInput(format!(
                "no record file for patient {id} in {}",
                records_dir.display()
            )));
        }
        fs::remove_file(&path)?;
        tracing::info!(patient_id = %id, "purged patient record file");
        Ok(())
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a patient record for on-disk YAML.
///
/// All structs use `#[serde(deny_unknown_fields)]` for strict validation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct PatientWire {
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_record_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "ContactWire::is_empty")]
    pub contact: ContactWire,

    #[serde(default, skip_serializing_if = "MeasurementsWire::is_empty")]
    pub measurements: MeasurementsWire,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_of_stay_days: Option<u32>,

    #[serde(default)]
    pub discharged: bool,

    pub created_at: String,

    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationWire>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<ProcedureWire>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<FollowUpWire>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ContactWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactWire {
    fn is_empty(&self) -> bool {
        self.contact_info.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct MeasurementsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl MeasurementsWire {
    fn is_empty(&self) -> bool {
        self.height_cm.is_none() && self.weight_kg.is_none()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PresentationWire {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presenting_complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presented_on: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ProcedureWire {
    pub id: String,
    pub procedure_name: String,
    pub operation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgeon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct FollowUpWire {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn parse_record_id(field: &str, raw: &str) -> RecordResult<RecordId> {
    RecordId::parse(raw).map_err(|e| RecordError::InvalidUuid(format!("{field}: {e}")))
}

fn parse_date(field: &str, raw: &str) -> RecordResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| RecordError::Translation(format!("{field}: invalid date '{raw}': {e}")))
}

fn parse_optional_date(field: &str, raw: Option<String>) -> RecordResult<Option<NaiveDate>> {
    raw.map(|r| parse_date(field, &r)).transpose()
}

fn parse_timestamp(field: &str, raw: &str) -> RecordResult<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| RecordError::Translation(format!("{field}: invalid timestamp '{raw}': {e}")))
}

/// Convert wire format to the domain patient, enforcing core invariants.
fn wire_to_domain(wire: PatientWire) -> RecordResult<Patient> {
    let id = PatientId::parse(&wire.id)
        .map_err(|e| RecordError::InvalidUuid(format!("id: {e}")))?;

    let gender = wire
        .gender
        .map(|g| {
            Gender::parse(&g)
                .ok_or_else(|| RecordError::InvalidInput(format!("gender: unknown value '{g}'")))
        })
        .transpose()?;

    let presentation = wire
        .presentation
        .map(|p| -> RecordResult<InitialPresentation> {
            Ok(InitialPresentation {
                id: parse_record_id("presentation.id", &p.id)?,
                diagnosis: p.diagnosis,
                presenting_complaint: p.presenting_complaint,
                presented_on: parse_optional_date("presentation.presented_on", p.presented_on)?,
            })
        })
        .transpose()?;

    let procedures = wire
        .procedures
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            Ok(OperativeData {
                id: parse_record_id(&format!("procedures[{i}].id"), &p.id)?,
                procedure_name: p.procedure_name,
                operation_date: parse_date(
                    &format!("procedures[{i}].operation_date"),
                    &p.operation_date,
                )?,
                surgeon: p.surgeon,
                notes: p.notes,
            })
        })
        .collect::<RecordResult<Vec<_>>>()?;

    let follow_ups = wire
        .follow_ups
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            Ok(FollowUp {
                id: parse_record_id(&format!("follow_ups[{i}].id"), &f.id)?,
                seen_on: parse_optional_date(&format!("follow_ups[{i}].seen_on"), f.seen_on)?,
                complications: f.complications,
                notes: f.notes,
            })
        })
        .collect::<RecordResult<Vec<_>>>()?;

    let parts = PatientParts {
        id,
        fields: PatientFields {
            first_name: wire.first_name,
            last_name: wire.last_name,
            date_of_birth: parse_optional_date("date_of_birth", wire.date_of_birth)?,
            medical_record_number: wire.medical_record_number,
            gender,
            contact: ContactDetails {
                contact_info: wire.contact.contact_info,
                phone: wire.contact.phone,
                address: wire.contact.address,
            },
            measurements: Measurements::new(
                wire.measurements.height_cm,
                wire.measurements.weight_kg,
            ),
            length_of_stay_days: wire.length_of_stay_days,
            discharged: wire.discharged,
        },
        presentation,
        procedures,
        follow_ups,
        created_at: parse_timestamp("created_at", &wire.created_at)?,
        updated_at: parse_timestamp("updated_at", &wire.updated_at)?,
    };

    Patient::restore(parts).map_err(RecordError::from)
}

/// Convert the domain patient to wire format.
fn domain_to_wire(patient: &Patient) -> PatientWire {
    let fields = patient.fields();

    PatientWire {
        id: patient.id().to_string(),
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        date_of_birth: fields.date_of_birth.map(|d| d.to_string()),
        medical_record_number: fields.medical_record_number.clone(),
        gender: fields.gender.map(|g| g.as_str().to_string()),
        contact: ContactWire {
            contact_info: fields.contact.contact_info.clone(),
            phone: fields.contact.phone.clone(),
            address: fields.contact.address.clone(),
        },
        measurements: MeasurementsWire {
            height_cm: fields.measurements.height_cm,
            weight_kg: fields.measurements.weight_kg,
        },
        length_of_stay_days: fields.length_of_stay_days,
        discharged: fields.discharged,
        created_at: patient.created_at().to_rfc3339(),
        updated_at: patient.updated_at().to_rfc3339(),
        presentation: patient.presentation().map(|p| PresentationWire {
            id: p.id.to_string(),
            diagnosis: p.diagnosis.clone(),
            presenting_complaint: p.presenting_complaint.clone(),
            presented_on: p.presented_on.map(|d| d.to_string()),
        }),
        procedures: patient
            .procedures()
            .iter()
            .map(|p| ProcedureWire {
                id: p.id.to_string(),
                procedure_name: p.procedure_name.clone(),
                operation_date: p.operation_date.to_string(),
                surgeon: p.surgeon.clone(),
                notes: p.notes.clone(),
            })
            .collect(),
        follow_ups: patient
            .follow_ups()
            .iter()
            .map(|f| FollowUpWire {
                id: f.id.to_string(),
                seen_on: f.seen_on.map(|d| d.to_string()),
                complications: f.complications.clone(),
                notes: f.notes.clone(),
            })
            .collect(),
    }
}
