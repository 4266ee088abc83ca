use ratatui::style::Color;

use crate::prefs::ColorScheme;

/// Colors for one resolved scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub code: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Dark => Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                success: Color::Green,
                error: Color::Red,
                warning: Color::Yellow,
                code: Color::Yellow,
                border: Color::DarkGray,
            },
            ColorScheme::Light => Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                success: Color::Green,
                error: Color::Red,
                warning: Color::Magenta,
                code: Color::Magenta,
                border: Color::Gray,
            },
        }
    }

    /// Color for a score: green from 90, accent from 70, warning from 50.
    pub fn grade(&self, percent: u8) -> Color {
        match percent {
            90..=100 => self.success,
            70..=89 => self.accent,
            50..=69 => self.warning,
            _ => self.error,
        }
    }
}
