//! # Controllers
//! Each controller is a small state machine: it takes its current state and an incoming event and
//! returns a `Reaction`, the DOM effects to apply plus whether the browser's default action should
//! be suppressed. Reads go through the `Dom` trait, writes are only ever described, never performed.
//! That is what lets the tests drive them without a browser or real timers.
mod contact;
mod menu;
mod navigation;
mod reveal;

pub use contact::{ContactFormController, SubmissionOutcome, SubmissionState, SubmitStep};
pub use menu::MenuController;
pub use navigation::{current_section, NavigationController};
pub use reveal::{observer_options, RevealController, REVEAL_GROUPS};

use crate::dom::DomEffect;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub effects: Vec<DomEffect>,
    pub prevent_default: bool,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_effects(effects: Vec<DomEffect>) -> Self {
        Self {
            effects,
            prevent_default: false,
        }
    }

    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    /// Appends `other` after `self`; the default action is suppressed if either asked for it.
    pub fn merge(mut self, other: Reaction) -> Self {
        self.effects.extend(other.effects);
        self.prevent_default |= other.prevent_default;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && !self.prevent_default
    }
}
