//! Light/dark theme selection, persisted across launches.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::storage;

pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Current theme; views read this for their container classes.
pub static THEME: GlobalSignal<ThemeMode> = Signal::global(ThemeMode::default);

/// Restore the persisted theme at startup.
pub fn load() {
    if let Some(mode) = storage::load::<ThemeMode>(THEME_STORAGE_KEY) {
        *THEME.write() = mode;
    }
}

pub fn set_theme(mode: ThemeMode) {
    *THEME.write() = mode;
    let _ = storage::save(THEME_STORAGE_KEY, &mode);
}

pub fn is_dark() -> bool {
    *THEME.read() == ThemeMode::Dark
}
