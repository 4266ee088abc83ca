//! Persisted UI preferences and the external signals they follow.

mod sidebar;
mod signal;
mod theme;

pub use sidebar::{LEFT_SIDEBAR_SLOT, RIGHT_SIDEBAR_SLOT, SIDEBAR_BREAKPOINT, Side, SidebarStore};
pub use signal::{Signal, Subscription};
pub use theme::{ColorScheme, THEME_SLOT, Theme, ThemeStore, parse_colorfgbg};
