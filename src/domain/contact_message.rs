use super::{grapheme_len, FormField, ValidationError, ValidationReason};

const MIN_MESSAGE_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn parse(s: &str) -> Result<ContactMessage, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            Err(ValidationError::new(
                FormField::Message,
                ValidationReason::Required,
            ))
        } else if grapheme_len(trimmed) < MIN_MESSAGE_LENGTH {
            Err(ValidationError::new(
                FormField::Message,
                ValidationReason::TooShort,
            ))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
