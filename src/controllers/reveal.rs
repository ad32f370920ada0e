use super::Reaction;
use crate::bindings::UiBindings;
use crate::dom::{Dom, DomEffect, IntersectionEntry, ObserverKind, ObserverOptions};

/// Element groups that fade in as they scroll into view. Delays are staggered within a group.
pub const REVEAL_GROUPS: [&str; 5] = [
    ".section-title",
    ".project-card",
    ".skill-category",
    ".timeline-item",
    ".contact-info",
];

const REVEAL_THRESHOLD: f64 = 0.1;

pub fn observer_options(observer: ObserverKind) -> ObserverOptions {
    match observer {
        ObserverKind::Reveal => ObserverOptions {
            threshold: REVEAL_THRESHOLD,
            root_margin: "0px 0px -50px 0px",
        },
        ObserverKind::LazyImage => ObserverOptions {
            threshold: 0.0,
            root_margin: "0px",
        },
    }
}

/// Fade-in reveals and lazy images. Both only ever react to the first intersection of an element:
/// after that the element is unobserved.
#[derive(Debug, Clone, Default)]
pub struct RevealController;

impl RevealController {
    pub fn new() -> Self {
        Self
    }

    /// Prepares every reveal target and starts observing it, along with the lazy images.
    pub fn on_load(&self, bindings: &UiBindings) -> Reaction {
        let mut effects = vec![];
        for group in &bindings.reveal_groups {
            for (index, element) in group.iter().enumerate() {
                effects.push(DomEffect::AddClass {
                    target: *element,
                    class: "fade-in",
                });
                effects.push(DomEffect::SetStyle {
                    target: *element,
                    property: "transition-delay",
                    value: stagger_delay(index),
                });
                effects.push(DomEffect::Observe {
                    observer: ObserverKind::Reveal,
                    target: *element,
                });
            }
        }
        for image in &bindings.lazy_images {
            effects.push(DomEffect::Observe {
                observer: ObserverKind::LazyImage,
                target: *image,
            });
        }
        Reaction::with_effects(effects)
    }

    pub fn on_intersection(
        &self,
        dom: &dyn Dom,
        observer: ObserverKind,
        entries: &[IntersectionEntry],
    ) -> Reaction {
        let effects = entries
            .iter()
            .filter(|entry| entry.is_intersecting)
            .flat_map(|entry| match observer {
                ObserverKind::Reveal => reveal(entry),
                ObserverKind::LazyImage => load_image(dom, entry),
            })
            .collect();
        Reaction::with_effects(effects)
    }
}

fn reveal(entry: &IntersectionEntry) -> Vec<DomEffect> {
    if entry.intersection_ratio < REVEAL_THRESHOLD {
        return vec![];
    }
    vec![
        DomEffect::AddClass {
            target: entry.target,
            class: "visible",
        },
        DomEffect::Unobserve {
            observer: ObserverKind::Reveal,
            target: entry.target,
        },
    ]
}

fn load_image(dom: &dyn Dom, entry: &IntersectionEntry) -> Vec<DomEffect> {
    let mut effects = vec![];
    if let Some(source) = dom.attribute(entry.target, "data-src") {
        effects.push(DomEffect::SetAttribute {
            target: entry.target,
            name: "src",
            value: source,
        });
        effects.push(DomEffect::RemoveAttribute {
            target: entry.target,
            name: "data-src",
        });
        effects.push(DomEffect::AddClass {
            target: entry.target,
            class: "loaded",
        });
    }
    effects.push(DomEffect::Unobserve {
        observer: ObserverKind::LazyImage,
        target: entry.target,
    });
    effects
}

/// `0s`, `0.1s`, `0.2s`, ...
fn stagger_delay(index: usize) -> String {
    format!("{}s", index as f64 / 10.0)
}
