//! Body measurements, body-mass index and BMI banding.
//!
//! A height or weight that is absent, zero, negative or not finite counts as "not recorded".
//! BMI is only defined when both are recorded; there is no fallback number, because a made-up
//! value would land in a real band.

use crate::constants::{
    BMI_NORMAL_FROM, BMI_OBESITY_III_FROM, BMI_OBESITY_II_FROM, BMI_OBESITY_I_FROM,
    BMI_OVERWEIGHT_FROM,
};
use crate::Patient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Height and weight as entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

fn recorded(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl Measurements {
    pub fn new(height_cm: Option<f64>, weight_kg: Option<f64>) -> Self {
        Self {
            height_cm,
            weight_kg,
        }
    }

    /// Height in centimetres, if meaningfully recorded.
    pub fn height(&self) -> Option<f64> {
        recorded(self.height_cm)
    }

    /// Weight in kilograms, if meaningfully recorded.
    pub fn weight(&self) -> Option<f64> {
        recorded(self.weight_kg)
    }

    pub fn has_valid_height(&self) -> bool {
        self.height().is_some()
    }

    pub fn has_valid_weight(&self) -> bool {
        self.weight().is_some()
    }

    pub fn bmi(&self) -> Option<Bmi> {
        Bmi::from_measurements(self.height()?, self.weight()?)
    }
}

/// A body-mass index, rounded to one decimal place.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Bmi(f64);

impl Bmi {
    /// weight(kg) / height(m)², rounded half away from zero to one decimal.
    ///
    /// Returns `None` unless both inputs are finite and strictly positive.
    pub fn from_measurements(height_cm: f64, weight_kg: f64) -> Option<Self> {
        let height_cm = recorded(Some(height_cm))?;
        let weight_kg = recorded(Some(weight_kg))?;
        let height_m = height_cm / 100.0;
        let raw = weight_kg / (height_m * height_m);
        if !raw.is_finite() {
            return None;
        }
        Some(Self(round_to_tenth(raw)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Band of the rounded value, so the figure shown and its band always agree.
    pub fn category(self) -> BmiCategory {
        BmiCategory::classify(self.0)
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl<'de> Deserialize<'de> for Bmi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value <= 0.0 || round_to_tenth(value) != value {
            return Err(serde::de::Error::custom(format!(
                "{value} is not a positive BMI rounded to one decimal"
            )));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Clinical weight category.
///
/// Bands are half-open and a boundary value belongs to the higher band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    ClassIObesity,
    ClassIIObesity,
    ClassIIIObesity,
}

impl BmiCategory {
    pub fn classify(bmi: f64) -> Self {
        if bmi >= BMI_OBESITY_III_FROM {
            BmiCategory::ClassIIIObesity
        } else if bmi >= BMI_OBESITY_II_FROM {
            BmiCategory::ClassIIObesity
        } else if bmi >= BMI_OBESITY_I_FROM {
            BmiCategory::ClassIObesity
        } else if bmi >= BMI_OVERWEIGHT_FROM {
            BmiCategory::Overweight
        } else if bmi >= BMI_NORMAL_FROM {
            BmiCategory::NormalWeight
        } else {
            BmiCategory::Underweight
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ClassIObesity => "Class I obesity",
            BmiCategory::ClassIIObesity => "Class II obesity",
            BmiCategory::ClassIIIObesity => "Class III obesity",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Patient {
    pub fn bmi(&self) -> Option<Bmi> {
        self.fields().measurements.bmi()
    }

    /// Undefined whenever [`Patient::bmi`] is.
    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.bmi().map(Bmi::category)
    }

    pub fn has_valid_height(&self) -> bool {
        self.fields().measurements.has_valid_height()
    }

    pub fn has_valid_weight(&self) -> bool {
        self.fields().measurements.has_valid_weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_and_rounds_to_one_decimal() {
        let bmi = Bmi::from_measurements(170.0, 68.0).expect("both recorded");
        assert_eq!(bmi.value(), 23.5);
        assert_eq!(bmi.to_string(), "23.5");
        assert_eq!(bmi.category(), BmiCategory::NormalWeight);
    }

    #[test]
    fn undefined_without_both_measurements() {
        let cases = [
            Measurements::new(None, Some(70.0)),
            Measurements::new(Some(170.0), None),
            Measurements::new(Some(0.0), Some(70.0)),
            Measurements::new(Some(170.0), Some(0.0)),
            Measurements::new(Some(-170.0), Some(70.0)),
            Measurements::new(Some(f64::NAN), Some(70.0)),
            Measurements::new(Some(170.0), Some(f64::INFINITY)),
            Measurements::default(),
        ];

        for m in cases {
            assert!(m.bmi().is_none(), "expected no BMI for {m:?}");
            assert!(m.bmi().map(Bmi::category).is_none());
        }
    }

    #[test]
    fn validity_flags_follow_recorded_values() {
        let m = Measurements::new(Some(182.0), Some(0.0));
        assert!(m.has_valid_height());
        assert!(!m.has_valid_weight());
    }

    #[test]
    fn boundaries_belong_to_the_higher_band() {
        assert_eq!(BmiCategory::classify(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::classify(24.9), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::ClassIObesity);
        assert_eq!(BmiCategory::classify(34.9), BmiCategory::ClassIObesity);
        assert_eq!(BmiCategory::classify(35.0), BmiCategory::ClassIIObesity);
        assert_eq!(BmiCategory::classify(39.9), BmiCategory::ClassIIObesity);
        assert_eq!(BmiCategory::classify(40.0), BmiCategory::ClassIIIObesity);
        assert_eq!(BmiCategory::classify(72.3), BmiCategory::ClassIIIObesity);
    }

    #[test]
    fn classification_is_monotonic() {
        let mut previous = BmiCategory::classify(0.1);
        let mut bmi = 0.1;
        while bmi < 60.0 {
            let current = BmiCategory::classify(bmi);
            assert!(current >= previous, "band went down at {bmi}");
            previous = current;
            bmi += 0.05;
        }
        assert_eq!(previous, BmiCategory::ClassIIIObesity);
    }

    #[test]
    fn category_uses_rounded_value() {
        // 24.96 raw rounds to 25.0, which is overweight.
        let bmi = Bmi::from_measurements(100.0, 24.96).expect("recorded");
        assert_eq!(bmi.value(), 25.0);
        assert_eq!(bmi.category(), BmiCategory::Overweight);
    }

    #[test]
    fn labels_match_clinical_names() {
        assert_eq!(BmiCategory::NormalWeight.label(), "Normal weight");
        assert_eq!(BmiCategory::ClassIIIObesity.to_string(), "Class III obesity");
    }

    #[test]
    fn deserialising_rejects_values_no_measurement_could_produce() {
        let bmi: Bmi = serde_json::from_str("23.5").expect("rounded and positive");
        assert_eq!(bmi.value(), 23.5);

        for raw in ["-23.5", "0", "23.456"] {
            assert!(
                serde_json::from_str::<Bmi>(raw).is_err(),
                "accepted {raw} as a BMI"
            );
        }
    }
}
