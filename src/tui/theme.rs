//! Color palettes for the two themes.

use ratatui::style::{Color, Modifier, Style};

use crate::core::prefs::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Whole-screen foreground/background.
    pub base: Style,
    /// Secondary text: time labels, hints, placeholder.
    pub muted: Style,
    pub user: Style,
    pub bot: Style,
    pub error: Style,
    /// Title bar and the loading indicator.
    pub accent: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                base: Style::default().fg(Color::Black).bg(Color::White),
                muted: Style::default().fg(Color::DarkGray),
                user: Style::default().fg(Color::Blue),
                bot: Style::default().fg(Color::Green),
                error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                accent: Style::default().fg(Color::Magenta),
            },
            Theme::Dark => Self {
                base: Style::default().fg(Color::White).bg(Color::Black),
                muted: Style::default().fg(Color::Gray),
                user: Style::default().fg(Color::Cyan),
                bot: Style::default().fg(Color::LightGreen),
                error: Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
                accent: Style::default().fg(Color::Yellow),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_have_opposite_backgrounds() {
        assert_eq!(Palette::for_theme(Theme::Light).base.bg, Some(Color::White));
        assert_eq!(Palette::for_theme(Theme::Dark).base.bg, Some(Color::Black));
    }
}
