//! # DOM adapter
//! The page is the only state store shared by the controllers. Rather than reaching into a global
//! `document`, every controller reads through the `Dom` trait and describes its writes as
//! `DomEffect` values. The application applies those effects in order.
//!
//! A browser host implements `Dom` on top of the real document; `InMemoryDom` implements it over a
//! small node tree, which is what the tests (and any headless host) use.
mod memory;

pub use memory::{InMemoryDom, InvalidSelector, NodeBuilder};

/// Opaque handle to a node known to the DOM adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(usize);

impl ElementRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// The two intersection observers the page runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    Reveal,
    LazyImage,
}

/// Options the host passes to its intersection observer implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

/// One record delivered by an intersection observer callback.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementRef,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub fn entering(target: ElementRef, intersection_ratio: f64) -> Self {
        Self {
            target,
            is_intersecting: true,
            intersection_ratio,
        }
    }

    pub fn leaving(target: ElementRef) -> Self {
        Self {
            target,
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// A single write against the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEffect {
    AddClass {
        target: ElementRef,
        class: &'static str,
    },
    RemoveClass {
        target: ElementRef,
        class: &'static str,
    },
    SetAttribute {
        target: ElementRef,
        name: &'static str,
        value: String,
    },
    RemoveAttribute {
        target: ElementRef,
        name: &'static str,
    },
    SetStyle {
        target: ElementRef,
        property: &'static str,
        value: String,
    },
    SetText {
        target: ElementRef,
        text: String,
    },
    SetValue {
        target: ElementRef,
        value: String,
    },
    SetDisabled {
        target: ElementRef,
        disabled: bool,
    },
    Focus {
        target: ElementRef,
    },
    ScrollTo {
        top: f64,
        behavior: ScrollBehavior,
    },
    Observe {
        observer: ObserverKind,
        target: ElementRef,
    },
    Unobserve {
        observer: ObserverKind,
        target: ElementRef,
    },
}

/// Read access to the page plus a single write entry point.
///
/// Selectors are CSS selectors, matched the way `querySelectorAll` and `Element.closest` match them.
/// A selector that does not parse matches nothing.
pub trait Dom {
    fn select_all(&self, selector: &str) -> Vec<ElementRef>;

    fn select_all_within(&self, scope: ElementRef, selector: &str) -> Vec<ElementRef>;

    fn select(&self, selector: &str) -> Option<ElementRef> {
        self.select_all(selector).into_iter().next()
    }

    fn select_within(&self, scope: ElementRef, selector: &str) -> Option<ElementRef> {
        self.select_all_within(scope, selector).into_iter().next()
    }

    /// The element itself or its nearest ancestor matching `selector`.
    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef>;

    /// `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementRef, node: ElementRef) -> bool;

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementRef, class: &str) -> bool;

    fn text(&self, element: ElementRef) -> String;

    /// Current value of a form control; empty for anything else.
    fn value(&self, element: ElementRef) -> String;

    fn offset_top(&self, element: ElementRef) -> f64;

    fn offset_height(&self, element: ElementRef) -> f64;

    /// Vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    fn active_element(&self) -> Option<ElementRef>;

    fn apply(&mut self, effect: DomEffect);

    fn apply_all(&mut self, effects: Vec<DomEffect>) {
        for effect in effects {
            self.apply(effect);
        }
    }
}
