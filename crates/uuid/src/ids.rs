use crate::{parse_canonical, UuidError, UuidResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            /// Allocates a fresh random (v4) identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Validates and parses an identifier that must already be canonical.
            ///
            /// # Errors
            ///
            /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
            pub fn parse(input: &str) -> UuidResult<Self> {
                parse_canonical($kind, input).map(Self)
            }

            /// Returns true if `input` could be parsed by [`Self::parse`].
            pub fn is_canonical(input: &str) -> bool {
                crate::is_canonical(input)
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = UuidError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

canonical_id!(
    /// Identifier of a patient record.
    ///
    /// Assigned once when the patient is registered; there is no way to change the id of an
    /// existing record.
    PatientId,
    "patient id"
);

canonical_id!(
    /// Identifier of a clinical sub-record (presentation, procedure or follow-up).
    RecordId,
    "record id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_display_canonically() {
        let id = PatientId::new();
        let shown = id.to_string();
        assert_eq!(shown.len(), 32);
        assert!(PatientId::is_canonical(&shown));
        assert_eq!(PatientId::parse(&shown).expect("round trip"), id);
    }

    #[test]
    fn parse_rejects_hyphenated_and_uppercase() {
        let hyphenated = "550e8400-e29b-41d4-a716-446655440000";
        let err = PatientId::parse(hyphenated).expect_err("hyphens rejected");
        match err {
            UuidError::InvalidInput(msg) => assert!(msg.contains("patient id")),
        }

        assert!(RecordId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(RecordId::parse("").is_err());
        assert!(RecordId::parse("zz0e8400e29b41d4a716446655440000").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let raw = "550e8400e29b41d4a716446655440000";
        let parsed: RecordId = raw.parse().expect("canonical");
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let id = PatientId::parse("550e8400e29b41d4a716446655440000").expect("canonical");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let err = serde_json::from_str::<PatientId>("\"not-an-id\"").expect_err("invalid id");
        assert!(err.to_string().contains("32 lowercase hex"));
    }
}
