use super::{FormField, ValidationError, ValidationReason};
use once_cell::sync::Lazy;
use regex::Regex;

// One or more non-space, non-@ characters, "@", the same again, ".", the same again.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// `true` if `s` looks like `local@domain.tld`.
///
/// Only the shape is checked. Whether the mailbox exists is for the relay service to find out.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: &str) -> Result<ContactEmail, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            Err(ValidationError::new(FormField::Email, ValidationReason::Required))
        } else if !is_valid_email(trimmed) {
            Err(ValidationError::new(
                FormField::Email,
                ValidationReason::InvalidFormat,
            ))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
