use super::Reaction;
use crate::bindings::{SectionBinding, UiBindings};
use crate::configuration::InterfaceSettings;
use crate::dom::{Dom, DomEffect, ElementRef, ScrollBehavior};
use crate::rate_limit::{Debounce, Throttle};
use std::time::Duration;

const SCROLLED: &str = "scrolled";
const ACTIVE: &str = "active";

/// Keeps the navigation chrome in sync with the scroll position.
///
/// * the nav bar gets `scrolled` past a threshold, re-evaluated at most once per throttle window;
/// * the link of the section under the reading line gets `active`, re-evaluated once scrolling has
/// been quiet for the debounce period;
/// * same-page anchor clicks scroll smoothly to their target, below the fixed nav.
#[derive(Debug, Clone)]
pub struct NavigationController {
    scroll_threshold: f64,
    section_offset: f64,
    chrome: Throttle,
    active_section: Debounce,
}

impl NavigationController {
    pub fn new(settings: &InterfaceSettings) -> Self {
        Self {
            scroll_threshold: settings.nav_scroll_threshold,
            section_offset: settings.active_section_offset,
            chrome: Throttle::new(settings.scroll_throttle()),
            active_section: Debounce::new(settings.active_section_debounce()),
        }
    }

    /// The active link is computed once as soon as the page is ready.
    pub fn on_load(&mut self, dom: &dyn Dom, bindings: &UiBindings) -> Reaction {
        Reaction::with_effects(self.highlight_active_link(dom, bindings))
    }

    pub fn on_scroll(&mut self, dom: &dyn Dom, bindings: &UiBindings, now: Duration) -> Reaction {
        self.active_section.trigger(now);

        let nav = match bindings.nav {
            Some(nav) if self.chrome.should_run(now) => nav,
            _ => return Reaction::none(),
        };
        let class = SCROLLED;
        let effect = if dom.scroll_y() > self.scroll_threshold {
            DomEffect::AddClass { target: nav, class }
        } else {
            DomEffect::RemoveClass { target: nav, class }
        };
        Reaction::with_effects(vec![effect])
    }

    /// Runs the debounced active-section update once it is due.
    pub fn on_tick(&mut self, dom: &dyn Dom, bindings: &UiBindings, now: Duration) -> Reaction {
        if self.active_section.should_run(now) {
            Reaction::with_effects(self.highlight_active_link(dom, bindings))
        } else {
            Reaction::none()
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.active_section.deadline()
    }

    /// Smooth scroll for same-page links. Anything that is not one, or whose target does not
    /// exist, is left to the browser.
    pub fn on_click(&self, dom: &dyn Dom, bindings: &UiBindings, target: ElementRef) -> Reaction {
        let href = match dom
            .closest(target, "a[href^=\"#\"]")
            .and_then(|anchor| dom.attribute(anchor, "href"))
        {
            Some(href) => href,
            None => return Reaction::none(),
        };
        if href == "#" {
            return Reaction::none();
        }

        let destination = match dom.select(&href) {
            Some(destination) => destination,
            None => return Reaction::none(),
        };
        let nav_height = bindings.nav.map_or(0.0, |nav| dom.offset_height(nav));
        let top = dom.offset_top(destination) - nav_height;

        tracing::debug!(%href, top, "Scrolling to anchor");
        Reaction::with_effects(vec![DomEffect::ScrollTo {
            top,
            behavior: ScrollBehavior::Smooth,
        }])
        .prevent_default()
    }

    fn highlight_active_link(&self, dom: &dyn Dom, bindings: &UiBindings) -> Vec<DomEffect> {
        let layout: Vec<_> = bindings
            .sections
            .iter()
            .map(|SectionBinding { element, id }| {
                (id.as_str(), dom.offset_top(*element), dom.offset_height(*element))
            })
            .collect();

        // Outside every section, the previous highlight stays.
        let current = match current_section(dom.scroll_y(), self.section_offset, &layout) {
            Some(current) => format!("#{current}"),
            None => return vec![],
        };

        bindings
            .nav_links
            .iter()
            .map(|link| {
                if dom.attribute(*link, "href").as_deref() == Some(current.as_str()) {
                    DomEffect::AddClass {
                        target: *link,
                        class: ACTIVE,
                    }
                } else {
                    DomEffect::RemoveClass {
                        target: *link,
                        class: ACTIVE,
                    }
                }
            })
            .collect()
    }
}

/// Id of the section under the reading line `scroll_y + offset`, given `(id, top, height)` boxes.
///
/// Each section covers `[top, top + height)`. If boxes overlap, the last one in document order
/// wins, so at most one section is ever current.
pub fn current_section<'a>(
    scroll_y: f64,
    offset: f64,
    sections: &[(&'a str, f64, f64)],
) -> Option<&'a str> {
    let reading_line = scroll_y + offset;
    sections
        .iter()
        .filter(|(_, top, height)| reading_line >= *top && reading_line < top + height)
        .map(|(id, _, _)| *id)
        .last()
}
