//! Dark and light color schemes.
//!
//! Widgets never name colors directly. They ask `App::style` for a role such
//! as `"row_selected"`, which is looked up in the `StyleMap` built from the
//! active palette. `T` swaps the palette at runtime.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 2] = [Self::Dark, Self::Light];

    /// Case-insensitive lookup of the `theme` config value.
    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Shown in the status bar after cycling.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// One `Style` per UI role.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Story cards --
    pub story_title: Style,
    pub story_body: Style,
    pub story_date: Style,
    pub story_image: Style,
    pub story_link: Style,

    // -- List rows --
    pub row_title: Style,
    pub row_body: Style,
    pub row_date: Style,
    pub row_selected: Style,

    // -- Feed states --
    pub feed_empty: Style,
    pub feed_loading: Style,
    pub filter_badge: Style,

    // -- Chrome --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub picker_selected: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            story_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            story_body: Style::default(),
            story_date: Style::default().fg(Color::Gray),
            story_image: Style::default().fg(Color::Blue),
            story_link: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            row_title: Style::default().add_modifier(Modifier::BOLD),
            row_body: Style::default(),
            row_date: Style::default().fg(Color::DarkGray),
            row_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            feed_empty: Style::default().fg(Color::Gray),
            feed_loading: Style::default().fg(Color::Yellow),
            filter_badge: Style::default().fg(Color::Magenta),

            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            picker_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn light() -> Self {
        Self {
            story_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            story_body: Style::default().fg(Color::Black),
            story_date: Style::default().fg(Color::DarkGray),
            story_image: Style::default().fg(Color::Blue),
            story_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            row_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            row_body: Style::default().fg(Color::Black),
            row_date: Style::default().fg(Color::DarkGray),
            row_selected: Style::default().bg(Color::Blue).fg(Color::White),

            feed_empty: Style::default().fg(Color::DarkGray),
            feed_loading: Style::default().fg(Color::Magenta),
            filter_badge: Style::default().fg(Color::Magenta),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            picker_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

impl ColorPalette {
    /// Every role paired with its style. Role names match the field names.
    fn roles(&self) -> [(&'static str, Style); 19] {
        [
            ("story_title", self.story_title),
            ("story_body", self.story_body),
            ("story_date", self.story_date),
            ("story_image", self.story_image),
            ("story_link", self.story_link),
            ("row_title", self.row_title),
            ("row_body", self.row_body),
            ("row_date", self.row_date),
            ("row_selected", self.row_selected),
            ("feed_empty", self.feed_empty),
            ("feed_loading", self.feed_loading),
            ("filter_badge", self.filter_badge),
            ("tab_active", self.tab_active),
            ("tab_inactive", self.tab_inactive),
            ("status_bar", self.status_bar),
            ("status_error", self.status_error),
            ("panel_border", self.panel_border),
            ("panel_border_focused", self.panel_border_focused),
            ("picker_selected", self.picker_selected),
        ]
    }
}

/// Role name to `Style` for the active palette.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        Self {
            map: p.roles().into_iter().collect(),
        }
    }

    /// Unknown roles resolve to `Style::default()` rather than failing.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_selection_matches_status_bar() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.row_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
        assert_eq!(
            palette.status_bar,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn variants_are_distinct() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.row_selected, light.row_selected);
        assert_ne!(dark.story_title, light.story_title);
    }

    #[test]
    fn config_names_parse_case_insensitively() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name(" LIGHT "), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().name(), "Dark");
    }

    #[test]
    fn roles_resolve_to_palette_styles() {
        let palette = ThemeVariant::Dark.palette();
        let styles = StyleMap::from_palette(&palette);
        assert_eq!(styles.resolve("story_title"), palette.story_title);
        assert_eq!(styles.resolve("picker_selected"), palette.picker_selected);
        assert_eq!(styles.resolve("no_such_role"), Style::default());
    }

    #[test]
    fn role_names_are_unique() {
        for variant in ThemeVariant::ALL {
            let palette = variant.palette();
            let styles = StyleMap::from_palette(&palette);
            assert_eq!(styles.map.len(), palette.roles().len());
        }
    }
}
