mod contact_email;
mod contact_form;
mod contact_message;
mod contact_name;
mod submission_request;

pub use contact_email::{is_valid_email, ContactEmail};
pub(crate) use contact_form::validate_field;
pub use contact_form::{FormInput, ValidContactForm, ValidationReport};
pub use contact_message::ContactMessage;
pub use contact_name::ContactName;
pub use submission_request::SubmissionRequest;

use unicode_segmentation::UnicodeSegmentation;

/// The three inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    /// Id of the matching input in the page.
    pub fn input_id(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Required,
    TooShort,
    InvalidFormat,
}

/// A field that failed validation, and why.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", failure_message(.field, .reason))]
pub struct ValidationError {
    pub field: FormField,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: FormField, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    /// The text shown next to the offending input.
    pub fn message(&self) -> &'static str {
        failure_message(&self.field, &self.reason)
    }
}

fn failure_message(field: &FormField, reason: &ValidationReason) -> &'static str {
    use FormField::*;
    use ValidationReason::*;

    match (field, reason) {
        (Name, Required) => "Name is required",
        (Name, _) => "Name must be at least 2 characters",
        (Email, Required) => "Email is required",
        (Email, _) => "Please enter a valid email address",
        (Message, Required) => "Message is required",
        (Message, _) => "Message must be at least 10 characters",
    }
}

/// Length in user-perceived characters.
///
/// A grapheme is defined by the Unicode standard as a "user-perceived" character: `a°` is a single
/// grapheme, but it is composed of two characters (`a` and `°`). `true` selects the extended
/// grapheme definition set, the recommended one.
fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}
