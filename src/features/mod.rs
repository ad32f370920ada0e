//! Optional page features. Each one is wired into the application only when its flag is set in
//! `FeatureSettings`; the theme preference itself is always read at startup.
mod analytics;
mod scroll_to_top;
mod theme;

pub use analytics::Analytics;
pub use scroll_to_top::ScrollToTop;
pub use theme::{apply_theme, stored_theme, Theme, ThemeSwitcher, THEME_KEY};
