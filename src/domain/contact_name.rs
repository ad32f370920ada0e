use super::{grapheme_len, FormField, ValidationError, ValidationReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactName(String);

impl ContactName {
    /// Returns an instance of `ContactName` if the input satisfies all our validation constraints
    /// on sender names, the reason it does not otherwise.
    ///
    /// # Type Driven Development
    /// Making an incorrect usage pattern unrepresentable, by construction, lets the compiler make
    /// sure a `SubmissionRequest` is never assembled from a name nobody checked. The value is kept
    /// trimmed.
    pub fn parse(s: &str) -> Result<ContactName, ValidationError> {
        // `.trim()` returns a view over the input `s` without trailing whitespace-like characters.
        let trimmed = s.trim();

        if trimmed.is_empty() {
            Err(ValidationError::new(FormField::Name, ValidationReason::Required))
        } else if grapheme_len(trimmed) < 2 {
            Err(ValidationError::new(FormField::Name, ValidationReason::TooShort))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

/// Exposes the trimmed name. There is no mutable counterpart, so a `ContactName` stays valid.
impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
