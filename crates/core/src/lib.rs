//! # Surgtrack Core
//!
//! Patient clinical aggregation for surgical practices.
//!
//! This crate holds the patient record graph (demographics, initial presentation, operative
//! data, follow-ups) and the pure derivations over it:
//! - age, BMI and BMI band
//! - demographic completeness and contact availability
//! - the ordered list of current clinical issues
//! - most recent surgery date and length of stay
//! - the surgical journey stage
//!
//! Derivations read an already loaded [`Patient`] and never fail; missing data yields `None`.
//! Errors exist only on the editing and loading paths ([`PatientError`]).
//!
//! **No storage or UI concerns**: record files live in `surgtrack-records`, the command line in
//! `surgtrack-cli`.

pub mod aggregation;
pub mod bmi;
pub mod clinical;
pub mod config;
pub mod constants;
pub mod demographics;
pub mod error;
pub mod journey;
pub mod patient;
pub mod registry;
pub mod summary;
pub mod validation;

pub use bmi::{Bmi, BmiCategory, Measurements};
pub use clinical::{FollowUp, InitialPresentation, OperativeData};
pub use config::CoreConfig;
pub use demographics::{age_on, ContactDetails, Gender};
pub use error::{PatientError, PatientResult};
pub use journey::{JourneyMilestones, JourneyStage, Milestone};
pub use patient::{Patient, PatientFields, PatientParts};
pub use registry::PatientRegistry;
pub use summary::PatientSummary;

pub use surgtrack_types::{NonEmptyText, TextError};
pub use surgtrack_uuid::{PatientId, RecordId};
