use crate::bindings::UiBindings;
use crate::controllers::Reaction;
use crate::dom::{Dom, DomEffect, ElementRef};
use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("{other} is not a known theme.")),
        }
    }
}

/// The stored preference, or the default dark theme if there is none (or it is garbage).
pub fn stored_theme(storage: &dyn KeyValueStore) -> Theme {
    match storage.get(THEME_KEY) {
        Some(stored) => Theme::try_from(stored.as_str()).unwrap_or_else(|e| {
            tracing::warn!(error.message = %e, "Ignoring the stored theme preference");
            Theme::default()
        }),
        None => Theme::default(),
    }
}

pub fn apply_theme(bindings: &UiBindings, theme: Theme) -> Vec<DomEffect> {
    match bindings.root {
        Some(root) => vec![DomEffect::SetAttribute {
            target: root,
            name: "data-theme",
            value: theme.as_str().into(),
        }],
        None => vec![],
    }
}

/// Flips between dark and light from the `.theme-toggle` control and remembers the choice.
#[derive(Debug, Clone)]
pub struct ThemeSwitcher {
    current: Theme,
}

impl ThemeSwitcher {
    pub fn new(current: Theme) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn on_click(
        &mut self,
        dom: &dyn Dom,
        bindings: &UiBindings,
        target: ElementRef,
        storage: &mut dyn KeyValueStore,
    ) -> Reaction {
        match bindings.theme_toggle {
            Some(toggle) if dom.contains(toggle, target) => {
                self.current = self.current.toggled();
                storage.set(THEME_KEY, self.current.as_str());
                tracing::debug!(theme = self.current.as_str(), "Switched theme");
                Reaction::with_effects(apply_theme(bindings, self.current))
            }
            _ => Reaction::none(),
        }
    }
}
