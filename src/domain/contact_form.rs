use super::{ContactEmail, ContactMessage, ContactName, FormField, ValidationError};

/// Raw values read from the form fields on a submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormInput {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            name: ContactName::parse(&self.name),
            email: ContactEmail::parse(&self.email),
            message: ContactMessage::parse(&self.message),
        }
    }
}

/// Checks a single raw value against the rule of `field`.
pub(crate) fn validate_field(field: FormField, raw: &str) -> Result<(), ValidationError> {
    match field {
        FormField::Name => ContactName::parse(raw).map(|_| ()),
        FormField::Email => ContactEmail::parse(raw).map(|_| ()),
        FormField::Message => ContactMessage::parse(raw).map(|_| ()),
    }
}

/// Outcome of validating every field of the form.
///
/// All three fields are always checked, so the page can flag every problem at once instead of one
/// per submit attempt.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    name: Result<ContactName, ValidationError>,
    email: Result<ContactEmail, ValidationError>,
    message: Result<ContactMessage, ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn error(&self, field: FormField) -> Option<&ValidationError> {
        match field {
            FormField::Name => self.name.as_ref().err(),
            FormField::Email => self.email.as_ref().err(),
            FormField::Message => self.message.as_ref().err(),
        }
    }

    /// Failures in field order.
    pub fn errors(&self) -> Vec<&ValidationError> {
        FormField::ALL
            .iter()
            .filter_map(|field| self.error(*field))
            .collect()
    }

    pub fn into_valid(self) -> Result<ValidContactForm, Vec<ValidationError>> {
        match (self.name, self.email, self.message) {
            (Ok(name), Ok(email), Ok(message)) => Ok(ValidContactForm {
                name,
                email,
                message,
            }),
            (name, email, message) => Err([name.err(), email.err(), message.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}

/// A contact form whose every field passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContactForm {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

impl TryFrom<FormInput> for ValidContactForm {
    type Error = Vec<ValidationError>;

    fn try_from(value: FormInput) -> Result<Self, Self::Error> {
        value.validate().into_valid()
    }
}
