use crate::bindings::UiBindings;
use crate::controllers::Reaction;
use crate::dom::{Dom, DomEffect, ElementRef, ScrollBehavior};
use crate::rate_limit::Throttle;
use std::time::Duration;

/// A floating button that shows up once the visitor is far enough down the page.
#[derive(Debug, Clone)]
pub struct ScrollToTop {
    threshold: f64,
    throttle: Throttle,
}

impl ScrollToTop {
    pub fn new(threshold: f64, window: Duration) -> Self {
        Self {
            threshold,
            throttle: Throttle::new(window),
        }
    }

    pub fn on_scroll(&mut self, dom: &dyn Dom, bindings: &UiBindings, now: Duration) -> Reaction {
        let button = match bindings.scroll_to_top {
            Some(button) if self.throttle.should_run(now) => button,
            _ => return Reaction::none(),
        };
        let effect = if dom.scroll_y() > self.threshold {
            DomEffect::AddClass {
                target: button,
                class: "visible",
            }
        } else {
            DomEffect::RemoveClass {
                target: button,
                class: "visible",
            }
        };
        Reaction::with_effects(vec![effect])
    }

    pub fn on_click(&self, dom: &dyn Dom, bindings: &UiBindings, target: ElementRef) -> Reaction {
        match bindings.scroll_to_top {
            Some(button) if dom.contains(button, target) => {
                Reaction::with_effects(vec![DomEffect::ScrollTo {
                    top: 0.0,
                    behavior: ScrollBehavior::Smooth,
                }])
                .prevent_default()
            }
            _ => Reaction::none(),
        }
    }
}
