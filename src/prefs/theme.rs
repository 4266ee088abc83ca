use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::signal::{Signal, Subscription};
use crate::storage::{SlotStore, StoreError, get_json, set_json};

pub const THEME_SLOT: &str = "theme";

/// The stored theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// A concrete scheme: what the OS reports, and what a theme resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Best guess at the terminal's scheme from `COLORFGBG`.
    pub fn detect() -> Option<Self> {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| parse_colorfgbg(&value))
    }
}

impl From<ColorScheme> for Theme {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Theme::Light,
            ColorScheme::Dark => Theme::Dark,
        }
    }
}

/// `COLORFGBG` looks like `15;0` or `15;default;0`; the last field is the
/// background palette index.
pub fn parse_colorfgbg(value: &str) -> Option<ColorScheme> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match background {
        0..=6 | 8 => Some(ColorScheme::Dark),
        _ => Some(ColorScheme::Light),
    }
}

fn resolve(theme: Theme, system: ColorScheme) -> ColorScheme {
    match theme {
        Theme::Light => ColorScheme::Light,
        Theme::Dark => ColorScheme::Dark,
        Theme::System => system,
    }
}

struct ThemeState {
    preference: Theme,
    resolved: ColorScheme,
}

pub struct ThemeStore {
    state: Arc<Mutex<ThemeState>>,
    system: Signal<ColorScheme>,
    store: Arc<dyn SlotStore>,
    _subscription: Subscription,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn SlotStore>, system: Signal<ColorScheme>) -> Self {
        let preference: Theme = get_json(store.as_ref(), THEME_SLOT).unwrap_or_default();
        let state = Arc::new(Mutex::new(ThemeState {
            preference,
            resolved: resolve(preference, system.get()),
        }));

        let watched = Arc::clone(&state);
        let subscription = system.subscribe(move |scheme| {
            let mut state = watched.lock();
            if state.preference == Theme::System {
                debug!(?scheme, "system color scheme changed");
                state.resolved = *scheme;
            }
        });

        Self {
            state,
            system,
            store,
            _subscription: subscription,
        }
    }

    pub fn theme(&self) -> Theme {
        self.state.lock().preference
    }

    pub fn resolved_theme(&self) -> ColorScheme {
        self.state.lock().resolved
    }

    /// Apply `theme` and persist it. The in-memory change stands even if
    /// persisting fails.
    pub fn set(&self, theme: Theme) -> Result<(), StoreError> {
        let system = self.system.get();
        {
            let mut state = self.state.lock();
            state.preference = theme;
            state.resolved = resolve(theme, system);
        }
        debug!(?theme, "theme changed");
        set_json(self.store.as_ref(), THEME_SLOT, &theme)
    }

    /// Flip between light and dark. From `System` the result is the explicit
    /// opposite of what the system currently resolves to.
    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let next = {
            let state = self.state.lock();
            match state.preference {
                Theme::Light => Theme::Dark,
                Theme::Dark => Theme::Light,
                Theme::System => state.resolved.opposite().into(),
            }
        };
        self.set(next)?;
        Ok(next)
    }
}
