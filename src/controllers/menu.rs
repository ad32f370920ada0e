use super::Reaction;
use crate::bindings::UiBindings;
use crate::dom::{Dom, DomEffect, ElementRef, KeyEvent};

const ACTIVE: &str = "active";
const FOCUSABLE: &str = "a[href], button, input, textarea, select";

/// The collapsible menu used on narrow screens.
#[derive(Debug, Clone, Default)]
pub struct MenuController {
    open: bool,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggle on the trigger; close on a nav link or anywhere outside the menu.
    pub fn on_click(&mut self, dom: &dyn Dom, bindings: &UiBindings, target: ElementRef) -> Reaction {
        let (toggle, menu) = match (bindings.nav_toggle, bindings.nav_menu) {
            (Some(toggle), Some(menu)) => (toggle, menu),
            _ => return Reaction::none(),
        };

        if dom.contains(toggle, target) {
            return if self.open {
                self.close_menu(bindings, toggle, menu)
            } else {
                self.open_menu(bindings, toggle, menu)
            };
        }
        if !self.open {
            return Reaction::none();
        }

        let on_nav_link = dom.closest(target, ".nav-link").is_some();
        let outside = !dom.contains(menu, target);
        if on_nav_link || outside {
            self.close_menu(bindings, toggle, menu)
        } else {
            Reaction::none()
        }
    }

    /// Escape closes the menu and hands focus back to the trigger; Tab cycles inside it.
    pub fn on_keydown(&mut self, dom: &dyn Dom, bindings: &UiBindings, key: &KeyEvent) -> Reaction {
        let (toggle, menu) = match (bindings.nav_toggle, bindings.nav_menu) {
            (Some(toggle), Some(menu)) if self.open => (toggle, menu),
            _ => return Reaction::none(),
        };

        match key.key.as_str() {
            "Escape" => {
                let mut reaction = self.close_menu(bindings, toggle, menu);
                reaction
                    .effects
                    .push(DomEffect::Focus { target: toggle });
                reaction
            }
            "Tab" => trap_focus(dom, menu, key.shift),
            _ => Reaction::none(),
        }
    }

    fn open_menu(&mut self, bindings: &UiBindings, toggle: ElementRef, menu: ElementRef) -> Reaction {
        tracing::debug!("Opening the navigation menu");
        self.open = true;
        let mut effects = vec![
            DomEffect::AddClass {
                target: menu,
                class: ACTIVE,
            },
            DomEffect::AddClass {
                target: toggle,
                class: ACTIVE,
            },
            DomEffect::SetAttribute {
                target: toggle,
                name: "aria-expanded",
                value: "true".into(),
            },
        ];
        if let Some(body) = bindings.body {
            effects.push(DomEffect::SetStyle {
                target: body,
                property: "overflow",
                value: "hidden".into(),
            });
        }
        Reaction::with_effects(effects)
    }

    fn close_menu(&mut self, bindings: &UiBindings, toggle: ElementRef, menu: ElementRef) -> Reaction {
        tracing::debug!("Closing the navigation menu");
        self.open = false;
        let mut effects = vec![
            DomEffect::RemoveClass {
                target: menu,
                class: ACTIVE,
            },
            DomEffect::RemoveClass {
                target: toggle,
                class: ACTIVE,
            },
            DomEffect::SetAttribute {
                target: toggle,
                name: "aria-expanded",
                value: "false".into(),
            },
        ];
        if let Some(body) = bindings.body {
            effects.push(DomEffect::SetStyle {
                target: body,
                property: "overflow",
                value: String::new(),
            });
        }
        Reaction::with_effects(effects)
    }
}

fn trap_focus(dom: &dyn Dom, menu: ElementRef, backwards: bool) -> Reaction {
    let focusable = dom.select_all_within(menu, FOCUSABLE);
    let (first, last) = match (focusable.first(), focusable.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Reaction::none(),
    };
    let focused = dom.active_element();

    let wrap_to = if backwards && focused == Some(first) {
        last
    } else if !backwards && focused == Some(last) {
        first
    } else {
        return Reaction::none();
    };
    Reaction::with_effects(vec![DomEffect::Focus { target: wrap_to }]).prevent_default()
}
