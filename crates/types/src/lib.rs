//! # GUIA Types
//!
//! Small validated value types shared by the GUIA crates.
//!
//! Form fields arrive as free text from both the REST API and the CLI. Wrapping them in
//! [`NonEmptyText`] at the boundary means the renderer and the record store never see a blank
//! section or authority name.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so
/// `"  Seção X "` and `"Seção X"` produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a `NonEmptyText` from an optional field, treating `None` as empty.
    pub fn from_optional(input: Option<&str>) -> Result<Self, TextError> {
        Self::new(input.unwrap_or_default())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
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
