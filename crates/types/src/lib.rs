//! Validated text primitives shared across the surgical tracker crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so a
/// `NonEmptyText` always holds at least one non-whitespace character and never carries
/// surrounding blanks. Clinical issue lists are built from this type, which is how an
/// empty entry is ruled out before it can reach a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Lifts an optional free-text field into `NonEmptyText`.
    ///
    /// Absent and blank inputs both map to `None`.
    pub fn from_optional(input: Option<&str>) -> Option<Self> {
        input.and_then(|s| Self::new(s).ok())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Returns true when `input` is present and holds something other than whitespace.
pub fn is_present(input: Option<&str>) -> bool {
    input.is_some_and(|s| !s.trim().is_empty())
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for NonEmptyText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Appendicitis \n").expect("non-empty");
        assert_eq!(text.as_str(), "Appendicitis");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn from_optional_drops_absent_and_blank() {
        assert!(NonEmptyText::from_optional(None).is_none());
        assert!(NonEmptyText::from_optional(Some(" \t")).is_none());
        assert_eq!(
            NonEmptyText::from_optional(Some(" wound infection ")).expect("present"),
            "wound infection"
        );
    }

    #[test]
    fn is_present_ignores_whitespace() {
        assert!(!is_present(None));
        assert!(!is_present(Some("  ")));
        assert!(is_present(Some("x")));
    }

    #[test]
    fn deserialising_blank_string_fails() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"").expect_err("blank rejected");
        assert!(err.to_string().contains("empty"));
    }
}
