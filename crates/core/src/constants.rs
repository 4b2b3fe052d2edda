//! Constants used throughout the surgtrack core crate.

/// Default directory for patient record files when no explicit directory is configured.
pub const DEFAULT_RECORDS_DIR: &str = "patient_records";

/// File extension of a single patient record file.
pub const RECORD_FILE_EXTENSION: &str = "yaml";

/// Environment variable naming the records directory.
pub const RECORDS_DIR_ENV: &str = "SURGTRACK_RECORDS_DIR";

/// Environment variable overriding "today" (YYYY-MM-DD) for derivations.
pub const AS_OF_ENV: &str = "SURGTRACK_AS_OF";

/// Date format accepted for configuration and CLI input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lower bounds (inclusive) of the BMI bands above underweight, in kg/m².
pub const BMI_NORMAL_FROM: f64 = 18.5;
pub const BMI_OVERWEIGHT_FROM: f64 = 25.0;
pub const BMI_OBESITY_I_FROM: f64 = 30.0;
pub const BMI_OBESITY_II_FROM: f64 = 35.0;
pub const BMI_OBESITY_III_FROM: f64 = 40.0;
