//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request-time code never reads process-wide environment variables. The `*_from_env_value`
//! helpers take the raw (optional) string so callers decide where values come from.

use crate::constants::{DATE_FORMAT, DEFAULT_RECORDS_DIR};
use crate::{PatientError, PatientResult};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_dir: PathBuf,
    as_of: Option<NaiveDate>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `as_of` pins the date treated as "today" by age derivation; `None` uses the UTC wall
    /// clock at the time of each call.
    pub fn new(records_dir: PathBuf, as_of: Option<NaiveDate>) -> PatientResult<Self> {
        if records_dir.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "records_dir cannot be empty".into(),
            ));
        }

        Ok(Self { records_dir, as_of })
    }

    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    /// The date derivations should treat as today.
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Resolve the records directory from an optional raw value.
///
/// `None` or a blank value falls back to [`DEFAULT_RECORDS_DIR`].
pub fn records_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_DIR))
}

/// Parse the "as of" date from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns `Ok(None)` (use the wall clock).
///
/// # Errors
///
/// Returns `PatientError::InvalidInput` if a non-blank value is not a `YYYY-MM-DD` date.
pub fn as_of_from_env_value(value: Option<String>) -> PatientResult<Option<NaiveDate>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, DATE_FORMAT).map_err(|e| {
                PatientError::InvalidInput(format!("as-of date '{v}' is not YYYY-MM-DD: {e}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_records_dir() {
        let err = CoreConfig::new(PathBuf::new(), None).expect_err("empty path rejected");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn as_of_pins_today() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        let cfg = CoreConfig::new(PathBuf::from("records"), Some(day)).expect("valid config");
        assert_eq!(cfg.today(), day);
    }

    #[test]
    fn records_dir_defaults_when_blank() {
        assert_eq!(
            records_dir_from_env_value(None),
            PathBuf::from(DEFAULT_RECORDS_DIR)
        );
        assert_eq!(
            records_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_RECORDS_DIR)
        );
        assert_eq!(
            records_dir_from_env_value(Some(" /srv/records ".into())),
            PathBuf::from("/srv/records")
        );
    }

    #[test]
    fn as_of_parses_or_rejects() {
        assert_eq!(as_of_from_env_value(None).expect("none is fine"), None);
        assert_eq!(as_of_from_env_value(Some("".into())).expect("blank"), None);
        assert_eq!(
            as_of_from_env_value(Some("2026-10-16".into())).expect("valid"),
            NaiveDate::from_ymd_opt(2026, 10, 16)
        );

        let err = as_of_from_env_value(Some("16/10/2026".into())).expect_err("wrong format");
        assert!(matches!(err, PatientError::InvalidInput(msg) if msg.contains("16/10/2026")));
    }
}
