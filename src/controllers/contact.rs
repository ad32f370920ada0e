use super::Reaction;
use crate::bindings::{ContactFormBindings, FieldBindings};
use crate::dom::{Dom, DomEffect, ElementRef};
use crate::domain::{validate_field, FormField, FormInput, SubmissionRequest, ValidationError};
use secrecy::Secret;
use std::time::Duration;

pub const LOADING_LABEL: &str = "Sending...";
pub const DEFAULT_SUBMIT_LABEL: &str = "Send Message";
pub const SUCCESS_STATUS: &str = "Thank you! Your message has been sent successfully.";
pub const FAILURE_STATUS: &str = "Oops! Something went wrong. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// A request is in flight; the label to restore on the submit control once it settles.
    Submitting { original_label: String },
}

/// What the visitor gets to know about a submission. The reason of a failure is for the logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    Failure(String),
}

/// Result of the synchronous half of a submit: either the form was rejected locally, or it is
/// ready to be sent.
#[derive(Debug)]
pub enum SubmitStep {
    Invalid(Reaction),
    Ready {
        request: SubmissionRequest,
        reaction: Reaction,
    },
}

/// The contact form state machine:
///
/// `Idle -> Validating -> (Invalid -> Idle) | (Valid -> Submitting) -> (Success | Failure) -> Idle`
///
/// The network call itself is not made here. `begin_submit` validates and hands back the request,
/// the caller performs it, and `finish_submit` settles the page whatever happened.
#[derive(Debug, Clone)]
pub struct ContactFormController {
    state: SubmissionState,
    status_clear_delay: Duration,
    status_clear_at: Option<Duration>,
}

impl ContactFormController {
    pub fn new(status_clear_delay: Duration) -> Self {
        Self {
            state: SubmissionState::Idle,
            status_clear_delay,
            status_clear_at: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.status_clear_at
    }

    pub fn read_input(dom: &dyn Dom, contact: &ContactFormBindings) -> FormInput {
        let value = |field: FormField| {
            contact
                .field(field)
                .map(|binding| dom.value(binding.input))
                .unwrap_or_default()
        };
        FormInput {
            name: value(FormField::Name),
            email: value(FormField::Email),
            message: value(FormField::Message),
        }
    }

    #[tracing::instrument(name = "Validating contact form", skip_all)]
    pub fn begin_submit(
        &mut self,
        dom: &dyn Dom,
        contact: &ContactFormBindings,
        access_key: &Secret<String>,
    ) -> SubmitStep {
        let mut effects = self.clear_status(contact);

        let report = Self::read_input(dom, contact).validate();
        for binding in &contact.fields {
            match report.error(binding.field) {
                Some(error) => effects.extend(show_field_error(binding, error)),
                None => effects.extend(clear_field_error(binding)),
            }
        }

        let form = match report.into_valid() {
            Ok(form) => form,
            Err(errors) => {
                tracing::debug!(failed_fields = errors.len(), "Contact form is invalid");
                return SubmitStep::Invalid(Reaction::with_effects(effects).prevent_default());
            }
        };

        let original_label = contact
            .submit
            .map(|submit| dom.text(submit))
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBMIT_LABEL.to_string());
        if let Some(submit) = contact.submit {
            effects.push(DomEffect::SetDisabled {
                target: submit,
                disabled: true,
            });
            effects.push(DomEffect::SetText {
                target: submit,
                text: LOADING_LABEL.into(),
            });
        }
        self.state = SubmissionState::Submitting { original_label };

        SubmitStep::Ready {
            request: SubmissionRequest::new(&form, access_key.clone()),
            reaction: Reaction::with_effects(effects).prevent_default(),
        }
    }

    /// Settles the page after the request. Always re-enables the submit control, whatever the
    /// outcome.
    pub fn finish_submit(
        &mut self,
        contact: &ContactFormBindings,
        outcome: &SubmissionOutcome,
        now: Duration,
    ) -> Reaction {
        let mut effects = vec![];

        match outcome {
            SubmissionOutcome::Success => {
                effects.extend(set_status(contact, SUCCESS_STATUS, "success"));
                effects.extend(contact.fields.iter().map(|binding| DomEffect::SetValue {
                    target: binding.input,
                    value: String::new(),
                }));
                self.status_clear_at = Some(now + self.status_clear_delay);
            }
            SubmissionOutcome::Failure(_) => {
                effects.extend(set_status(contact, FAILURE_STATUS, "error"));
            }
        }

        let previous = std::mem::replace(&mut self.state, SubmissionState::Idle);
        let original_label = match previous {
            SubmissionState::Submitting { original_label } => original_label,
            SubmissionState::Idle => DEFAULT_SUBMIT_LABEL.to_string(),
        };
        if let Some(submit) = contact.submit {
            effects.push(DomEffect::SetDisabled {
                target: submit,
                disabled: false,
            });
            effects.push(DomEffect::SetText {
                target: submit,
                text: original_label,
            });
        }
        Reaction::with_effects(effects)
    }

    /// Clears the status once its display time is over.
    pub fn on_tick(&mut self, contact: &ContactFormBindings, now: Duration) -> Reaction {
        match self.status_clear_at {
            Some(deadline) if now >= deadline => Reaction::with_effects(self.clear_status(contact)),
            _ => Reaction::none(),
        }
    }

    /// Empties the status line and cancels any pending auto-clear. Safe to call repeatedly.
    pub fn clear_status(&mut self, contact: &ContactFormBindings) -> Vec<DomEffect> {
        self.status_clear_at = None;
        match contact.status {
            Some(status) => vec![
                DomEffect::SetText {
                    target: status,
                    text: String::new(),
                },
                DomEffect::RemoveClass {
                    target: status,
                    class: "success",
                },
                DomEffect::RemoveClass {
                    target: status,
                    class: "error",
                },
            ],
            None => vec![],
        }
    }

    /// Re-validates a field when it loses focus, unless it was left empty.
    pub fn on_blur(
        &self,
        dom: &dyn Dom,
        contact: &ContactFormBindings,
        input: ElementRef,
    ) -> Reaction {
        let binding = match contact.field_for_input(input) {
            Some(binding) => binding,
            None => return Reaction::none(),
        };
        let value = dom.value(input);
        if value.trim().is_empty() {
            return Reaction::none();
        }
        let effects = match validate_field(binding.field, &value) {
            Ok(()) => clear_field_error(binding),
            Err(error) => show_field_error(binding, &error),
        };
        Reaction::with_effects(effects)
    }

    /// Typing into a flagged field clears its error right away.
    pub fn on_input(
        &self,
        dom: &dyn Dom,
        contact: &ContactFormBindings,
        input: ElementRef,
    ) -> Reaction {
        match contact.field_for_input(input) {
            Some(binding) if binding.group.map_or(false, |g| dom.has_class(g, "error")) => {
                Reaction::with_effects(clear_field_error(binding))
            }
            _ => Reaction::none(),
        }
    }
}

fn set_status(contact: &ContactFormBindings, text: &str, class: &'static str) -> Vec<DomEffect> {
    match contact.status {
        Some(status) => vec![
            DomEffect::SetText {
                target: status,
                text: text.to_string(),
            },
            DomEffect::AddClass {
                target: status,
                class,
            },
        ],
        None => vec![],
    }
}

fn show_field_error(binding: &FieldBindings, error: &ValidationError) -> Vec<DomEffect> {
    let mut effects = vec![];
    if let Some(group) = binding.group {
        effects.push(DomEffect::AddClass {
            target: group,
            class: "error",
        });
    }
    if let Some(slot) = binding.error {
        effects.push(DomEffect::SetText {
            target: slot,
            text: error.message().to_string(),
        });
    }
    effects.push(DomEffect::SetAttribute {
        target: binding.input,
        name: "aria-invalid",
        value: "true".into(),
    });
    effects
}

fn clear_field_error(binding: &FieldBindings) -> Vec<DomEffect> {
    let mut effects = vec![];
    if let Some(group) = binding.group {
        effects.push(DomEffect::RemoveClass {
            target: group,
            class: "error",
        });
    }
    if let Some(slot) = binding.error {
        effects.push(DomEffect::SetText {
            target: slot,
            text: String::new(),
        });
    }
    effects.push(DomEffect::RemoveAttribute {
        target: binding.input,
        name: "aria-invalid",
    });
    effects
}
