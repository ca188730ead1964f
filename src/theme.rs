//! Theme provider: semantic colors and the widget color palette.
//!
//! Theme files are JSON documents:
//!
//! ```json
//! {
//!   "name": "Midnight",
//!   "colors": { "widget_base": "#1e1e1e", "alarm": "#ff3b30" },
//!   "widget_colors": ["#e74c3c", "#3498db"]
//! }
//! ```
//!
//! `widget_colors` is the ordered palette that datasets index into through
//! their palette slot; `colors` holds named semantic colors looked up with
//! the fixed keys in [`keys`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result, ResultExt};

/// Fixed semantic color keys
pub mod keys {
    pub const WIDGET_BASE: &str = "widget_base";
    pub const WIDGET_WINDOW: &str = "widget_window";
    pub const WIDGET_TEXT: &str = "widget_text";
    pub const WIDGET_HIGHLIGHT: &str = "widget_highlight";
    pub const GROUPBOX_BACKGROUND: &str = "groupbox_background";
    pub const GROUPBOX_HARD_BORDER: &str = "groupbox_hard_border";
    pub const ALARM: &str = "alarm";
}

/// An RGBA color
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || DashboardError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Resolve the palette color for a dataset's palette slot.
///
/// `palette[index]` when in range, otherwise wraps modulo the palette size.
/// An empty palette assigns no color.
pub fn resolve_palette_color(palette: &[Color], index: usize) -> Option<Color> {
    if palette.is_empty() {
        return None;
    }

    if index < palette.len() {
        Some(palette[index])
    } else {
        Some(palette[index % palette.len()])
    }
}

/// A loaded theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    #[serde(default)]
    pub colors: HashMap<String, Color>,

    #[serde(default)]
    pub widget_colors: Vec<Color>,
}

impl Theme {
    /// Names of the themes compiled into the binary
    pub fn builtin_names() -> &'static [&'static str] {
        &["Default", "Light"]
    }

    /// Look up a compiled-in theme by name (case-insensitive)
    pub fn builtin(name: &str) -> Option<Theme> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    fn default_dark() -> Self {
        Self::from_parts(
            "Default",
            &[
                (keys::WIDGET_BASE, Color::rgb(0x21, 0x25, 0x2b)),
                (keys::WIDGET_WINDOW, Color::rgb(0x28, 0x2c, 0x34)),
                (keys::WIDGET_TEXT, Color::rgb(0xdc, 0xdf, 0xe4)),
                (keys::WIDGET_HIGHLIGHT, Color::rgb(0x61, 0xaf, 0xef)),
                (keys::GROUPBOX_BACKGROUND, Color::rgb(0x1b, 0x1e, 0x23)),
                (keys::GROUPBOX_HARD_BORDER, Color::rgb(0x3e, 0x44, 0x51)),
                (keys::ALARM, Color::rgb(0xe0, 0x6c, 0x75)),
            ],
            &[
                Color::rgb(0xe0, 0x6c, 0x75),
                Color::rgb(0x98, 0xc3, 0x79),
                Color::rgb(0x61, 0xaf, 0xef),
                Color::rgb(0xe5, 0xc0, 0x7b),
                Color::rgb(0xc6, 0x78, 0xdd),
                Color::rgb(0x56, 0xb6, 0xc2),
                Color::rgb(0xd1, 0x9a, 0x66),
                Color::rgb(0xab, 0xb2, 0xbf),
            ],
        )
    }

    fn light() -> Self {
        Self::from_parts(
            "Light",
            &[
                (keys::WIDGET_BASE, Color::rgb(0xfa, 0xfa, 0xfa)),
                (keys::WIDGET_WINDOW, Color::rgb(0xf0, 0xf0, 0xf0)),
                (keys::WIDGET_TEXT, Color::rgb(0x38, 0x3a, 0x42)),
                (keys::WIDGET_HIGHLIGHT, Color::rgb(0x40, 0x78, 0xf2)),
                (keys::GROUPBOX_BACKGROUND, Color::rgb(0xff, 0xff, 0xff)),
                (keys::GROUPBOX_HARD_BORDER, Color::rgb(0xc8, 0xc8, 0xc8)),
                (keys::ALARM, Color::rgb(0xe4, 0x56, 0x49)),
            ],
            &[
                Color::rgb(0xe4, 0x56, 0x49),
                Color::rgb(0x50, 0xa1, 0x4f),
                Color::rgb(0x40, 0x78, 0xf2),
                Color::rgb(0xc1, 0x84, 0x01),
                Color::rgb(0xa6, 0x26, 0xa4),
                Color::rgb(0x01, 0x84, 0xbc),
            ],
        )
    }

    fn from_parts(name: &str, colors: &[(&str, Color)], palette: &[Color]) -> Self {
        Self {
            name: name.to_string(),
            colors: colors.iter().map(|(k, c)| (k.to_string(), *c)).collect(),
            widget_colors: palette.to_vec(),
        }
    }

    /// Parse a theme from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| DashboardError::Theme(e.to_string()))
    }

    /// Load a theme file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse theme file {:?}", path))
    }

    /// Save a theme file to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

/// Holds the active theme.
///
/// Widgets only ever read from it; changes go through
/// [`Dashboard::set_theme`](crate::dashboard::Dashboard::set_theme), which
/// publishes the theme-changed notification.
#[derive(Debug, Clone, Default)]
pub struct ThemeProvider {
    theme: Theme,
}

impl ThemeProvider {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Resolve a theme by built-in name or JSON file path.
    ///
    /// Falls back to the default theme when neither works.
    pub fn from_name_or_path(name_or_path: &str) -> Self {
        if let Some(theme) = Theme::builtin(name_or_path) {
            return Self::new(theme);
        }

        match Theme::load(name_or_path) {
            Ok(theme) => Self::new(theme),
            Err(e) => {
                tracing::warn!("Failed to load theme {:?}, using default: {}", name_or_path, e);
                Self::default()
            }
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Ordered widget palette
    pub fn palette(&self) -> &[Color] {
        &self.theme.widget_colors
    }

    /// Named semantic color
    pub fn color(&self, key: &str) -> Option<Color> {
        self.theme.colors.get(key).copied()
    }

    /// Palette color for a dataset palette slot
    pub fn palette_color(&self, index: usize) -> Option<Color> {
        resolve_palette_color(self.palette(), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::from_hex("#12abEF").unwrap();
        assert_eq!(c, Color::rgb(0x12, 0xab, 0xef));
        assert_eq!(c.to_hex(), "#12abef");

        let translucent = Color::from_hex("#00000080").unwrap();
        assert_eq!(translucent.a, 0x80);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::from_hex("12abef").is_err());
        assert!(Color::from_hex("#12ab").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_palette_resolution() {
        let palette = [Color::rgb(1, 0, 0), Color::rgb(2, 0, 0), Color::rgb(3, 0, 0)];
        assert_eq!(resolve_palette_color(&palette, 1), Some(palette[1]));
        assert_eq!(resolve_palette_color(&palette, 4), Some(palette[1]));
        assert_eq!(resolve_palette_color(&[], 0), None);
        assert_eq!(resolve_palette_color(&[], 7), None);
    }

    #[test]
    fn test_single_color_palette() {
        let palette = [Color::rgb(9, 9, 9)];
        assert_eq!(resolve_palette_color(&palette, 0), Some(palette[0]));
        assert_eq!(resolve_palette_color(&palette, 5), Some(palette[0]));
    }

    #[test]
    fn test_builtin_themes_have_required_keys() {
        for name in Theme::builtin_names() {
            let theme = Theme::builtin(name).unwrap();
            for key in [
                keys::WIDGET_BASE,
                keys::WIDGET_TEXT,
                keys::ALARM,
                keys::GROUPBOX_BACKGROUND,
            ] {
                assert!(theme.colors.contains_key(key), "{} lacks {}", name, key);
            }
            assert!(!theme.widget_colors.is_empty());
        }
    }

    #[test]
    fn test_theme_json_parsing() {
        let theme = Theme::from_json(
            r##"{"name":"Mono","colors":{"alarm":"#ff0000"},"widget_colors":["#ffffff"]}"##,
        )
        .unwrap();
        assert_eq!(theme.name, "Mono");
        assert_eq!(theme.colors["alarm"], Color::rgb(255, 0, 0));

        let provider = ThemeProvider::new(theme);
        assert_eq!(provider.palette_color(3), Some(Color::rgb(255, 255, 255)));
        assert_eq!(provider.color(keys::WIDGET_TEXT), None);
    }

    #[test]
    fn test_theme_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        let theme = Theme::builtin("light").unwrap();
        theme.save(&path).unwrap();
        assert_eq!(Theme::load(&path).unwrap(), theme);
    }

    #[test]
    fn test_missing_theme_falls_back_to_default() {
        let provider = ThemeProvider::from_name_or_path("/nonexistent/theme.json");
        assert_eq!(provider.theme().name, "Default");
    }

    proptest! {
        #[test]
        fn test_palette_index_wraps(len in 1usize..16, index in 0usize..1000) {
            let palette: Vec<Color> = (0..len).map(|i| Color::rgb(i as u8, 0, 0)).collect();
            let resolved = resolve_palette_color(&palette, index);
            prop_assert_eq!(resolved, Some(palette[index % len]));
        }
    }
}
