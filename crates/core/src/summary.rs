//! Derived view model handed to a presentation layer.

use crate::bmi::{Bmi, BmiCategory};
use crate::journey::{JourneyStage, Milestone};
use crate::Patient;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surgtrack_types::NonEmptyText;
use surgtrack_uuid::PatientId;

/// Every derived fact about one patient, computed from a single snapshot.
///
/// Undefined values are `None` and are left out when serialised; they are never replaced by a
/// number such as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: PatientId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Bmi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi_category: Option<BmiCategory>,
    pub has_valid_height: bool,
    pub has_valid_weight: bool,
    pub has_complete_demographics: bool,
    pub has_contact_details: bool,
    pub current_medical_issues: Vec<NonEmptyText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_recent_surgery_date: Option<NaiveDate>,
    pub journey_stage: JourneyStage,
    pub missing_milestones: Vec<Milestone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length_of_stay: Option<u32>,
    pub discharged: bool,
    pub updated_at: DateTime<Utc>,
}

impl PatientSummary {
    /// Builds the summary with `today` as the reference date for age.
    pub fn build(patient: &Patient, today: NaiveDate) -> Self {
        let milestones = patient.journey_milestones();
        let journey_stage = JourneyStage::from_milestones(milestones);

        tracing::debug!(
            patient_id = %patient.id(),
            stage = %journey_stage,
            "built patient summary"
        );

        Self {
            id: patient.id(),
            display_name: patient.display_name(),
            age: patient.age_on(today),
            bmi: patient.bmi(),
            bmi_category: patient.bmi_category(),
            has_valid_height: patient.has_valid_height(),
            has_valid_weight: patient.has_valid_weight(),
            has_complete_demographics: patient.has_complete_demographics(),
            has_contact_details: patient.has_contact_details(),
            current_medical_issues: patient.current_medical_issues(),
            most_recent_surgery_date: patient.most_recent_surgery_date(),
            journey_stage,
            missing_milestones: milestones.missing(),
            total_length_of_stay: patient.total_length_of_stay(),
            discharged: patient.is_discharged(),
            updated_at: patient.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FollowUp, InitialPresentation, Measurements, OperativeData};
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap()
    }

    fn registered_patient() -> Patient {
        let mut p = Patient::register("Sarah", "Williams", now());
        p.edit(now(), |f| {
            f.date_of_birth = NaiveDate::from_ymd_opt(1981, 10, 16);
            f.measurements = Measurements::new(Some(170.0), Some(68.0));
        });
        p
    }

    #[test]
    fn registered_patient_scenario() {
        let summary = PatientSummary::build(&registered_patient(), today());

        assert_eq!(summary.age, Some(45));
        assert_eq!(summary.bmi.map(Bmi::value), Some(23.5));
        assert_eq!(summary.bmi_category, Some(BmiCategory::NormalWeight));
        assert_eq!(summary.journey_stage, JourneyStage::Registered);
        assert_eq!(summary.missing_milestones.len(), 4);
        assert!(summary.current_medical_issues.is_empty());
    }

    #[test]
    fn completed_journey_scenario() {
        let mut p = registered_patient();
        p.set_presentation(InitialPresentation::new(Some("Appendicitis".into())), now())
            .expect("fresh record");
        p.attach_procedure(OperativeData::new("Appendectomy", today()), now())
            .expect("fresh record");
        p.attach_follow_up(FollowUp::new(Some(String::new())), now())
            .expect("fresh record");
        p.set_discharged(true, now());

        let summary = PatientSummary::build(&p, today());

        assert_eq!(summary.current_medical_issues, vec!["Appendicitis", "Appendectomy"]);
        assert_eq!(summary.journey_stage, JourneyStage::Completed);
        assert!(summary.missing_milestones.is_empty());
        assert_eq!(summary.most_recent_surgery_date, Some(today()));
        assert!(summary.discharged);
    }

    #[test]
    fn undefined_values_are_omitted_not_zeroed() {
        let p = Patient::register("Sarah", "Williams", now());
        let json = serde_json::to_value(PatientSummary::build(&p, today())).expect("serialise");

        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("age"));
        assert!(!obj.contains_key("bmi"));
        assert!(!obj.contains_key("bmi_category"));
        assert!(!obj.contains_key("most_recent_surgery_date"));
        assert!(!obj.contains_key("total_length_of_stay"));
        assert_eq!(obj["journey_stage"], "registered");
        assert_eq!(obj["has_valid_height"], false);
    }

    #[test]
    fn serialises_bmi_as_plain_number() {
        let json = serde_json::to_value(PatientSummary::build(&registered_patient(), today()))
            .expect("serialise");
        assert_eq!(json["bmi"], 23.5);
        assert_eq!(json["bmi_category"], "normal_weight");
    }

    #[test]
    fn summary_json_reads_back_unchanged() {
        let summary = PatientSummary::build(&registered_patient(), today());
        let json = serde_json::to_string(&summary).expect("serialise");
        let back: PatientSummary = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, summary);

        let tampered = json.replace("\"bmi\":23.5", "\"bmi\":-4.0");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<PatientSummary>(&tampered).is_err());
    }
}
