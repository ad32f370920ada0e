use super::ValidContactForm;
use secrecy::Secret;

/// Everything the form-submission service needs for one message.
///
/// The access credential travels with the request but stays wrapped in `Secret`: it never shows up
/// in `Debug` output, and therefore never in our logs.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub access_key: Secret<String>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: String,
}

impl SubmissionRequest {
    pub fn new(form: &ValidContactForm, access_key: Secret<String>) -> Self {
        let name = form.name.as_ref().to_string();
        Self {
            access_key,
            subject: subject_for(&name),
            name,
            email: form.email.as_ref().to_string(),
            message: form.message.as_ref().to_string(),
        }
    }
}

fn subject_for(name: &str) -> String {
    format!("New message from {name} - Portfolio Contact Form")
}
