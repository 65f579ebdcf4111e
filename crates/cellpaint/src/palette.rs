//! Palette slots and theme loading.
//!
//! A [`Palette`] is fully resolved: every slot holds an [`Rgb`]. It is
//! replaced wholesale when the color scheme changes.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ThemeError;
use crate::style::{ColorRef, Rgb};

/// Slot of the default foreground color.
pub const FOREGROUND: u16 = 256;
/// Slot of the default background color.
pub const BACKGROUND: u16 = 257;
/// Slot of the cursor color.
pub const CURSOR: u16 = 258;
/// Total number of slots: 256 indexed colors plus foreground, background, cursor.
pub const NUM_SLOTS: usize = 259;

/// Standard xterm-256color ANSI palette.
const ANSI_COLORS: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// Resolved colors for every palette slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; NUM_SLOTS],
}

impl Default for Palette {
    fn default() -> Self {
        let mut colors = [Rgb::default(); NUM_SLOTS];
        for (idx, slot) in colors.iter_mut().take(256).enumerate() {
            *slot = xterm_color(idx);
        }
        colors[FOREGROUND as usize] = Rgb::new(255, 255, 255);
        colors[BACKGROUND as usize] = Rgb::new(0, 0, 0);
        colors[CURSOR as usize] = Rgb::new(255, 255, 255);
        Self { colors }
    }
}

impl Palette {
    pub fn new(colors: [Rgb; NUM_SLOTS]) -> Self {
        Self { colors }
    }

    /// Color of a slot. Out-of-range slots fall back to the default foreground.
    pub fn get(&self, slot: u16) -> Rgb {
        self.colors
            .get(slot as usize)
            .copied()
            .unwrap_or(self.colors[FOREGROUND as usize])
    }

    pub fn set(&mut self, slot: u16, color: Rgb) {
        if let Some(c) = self.colors.get_mut(slot as usize) {
            *c = color;
        }
    }

    pub fn foreground(&self) -> Rgb {
        self.colors[FOREGROUND as usize]
    }

    pub fn background(&self) -> Rgb {
        self.colors[BACKGROUND as usize]
    }

    pub fn cursor(&self) -> Rgb {
        self.colors[CURSOR as usize]
    }

    /// Resolve a foreground reference through this palette. Out-of-range
    /// slots give the default foreground.
    pub fn resolve(&self, color: ColorRef) -> Rgb {
        self.resolve_or(color, FOREGROUND)
    }

    /// Resolve a background reference. Out-of-range slots give the default
    /// background.
    pub fn resolve_background(&self, color: ColorRef) -> Rgb {
        self.resolve_or(color, BACKGROUND)
    }

    fn resolve_or(&self, color: ColorRef, fallback: u16) -> Rgb {
        match color {
            ColorRef::Rgb(rgb) => rgb,
            ColorRef::Indexed(slot) => self
                .colors
                .get(slot as usize)
                .copied()
                .unwrap_or(self.colors[fallback as usize]),
        }
    }

    /// Build a palette from a theme, starting from the xterm defaults.
    pub fn from_theme(theme: &Theme) -> Result<Self, ThemeError> {
        let mut palette = Palette::default();
        if let Some(fg) = &theme.foreground {
            palette.set(FOREGROUND, parse_hex(fg)?);
        }
        if let Some(bg) = &theme.background {
            palette.set(BACKGROUND, parse_hex(bg)?);
        }
        if let Some(cursor) = &theme.cursor {
            palette.set(CURSOR, parse_hex(cursor)?);
        }
        for (key, value) in &theme.colors {
            let slot: u16 = key
                .parse()
                .ok()
                .filter(|idx| *idx < 256)
                .ok_or_else(|| ThemeError::InvalidIndex(key.clone()))?;
            palette.set(slot, parse_hex(value)?);
        }
        Ok(palette)
    }
}

/// A color scheme as stored in JSON.
///
/// ```json
/// { "foreground": "#c0c0c0", "background": "#101010", "colors": { "1": "#ff5555" } }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub cursor: Option<String>,
    /// Overrides for indexed slots 0..256, keyed by decimal index.
    pub colors: BTreeMap<String, String>,
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> Result<Rgb, ThemeError> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 {
        return Err(ThemeError::InvalidColor(value.to_string()));
    }
    u32::from_str_radix(digits, 16)
        .map(Rgb::from_u32)
        .map_err(|_| ThemeError::InvalidColor(value.to_string()))
}

/// Default xterm color for an index in 0..256.
fn xterm_color(idx: usize) -> Rgb {
    if idx < 16 {
        ANSI_COLORS[idx]
    } else if idx < 232 {
        // 216-color cube (indices 16..232).
        let n = idx - 16;
        let r = (n / 36) % 6;
        let g = (n / 6) % 6;
        let b = n % 6;
        let to_byte = |v: usize| if v == 0 { 0u8 } else { (55 + 40 * v) as u8 };
        Rgb::new(to_byte(r), to_byte(g), to_byte(b))
    } else {
        // Grayscale ramp (indices 232..256).
        let v = (8 + 10 * (idx - 232)) as u8;
        Rgb::new(v, v, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        let palette = Palette::default();
        assert_eq!(palette.get(1), Rgb::new(205, 0, 0));
        assert_eq!(palette.foreground(), Rgb::new(255, 255, 255));
        assert_eq!(palette.background(), Rgb::new(0, 0, 0));
        assert_eq!(palette.cursor(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_cube_and_grays() {
        let palette = Palette::default();
        assert_eq!(palette.get(16), Rgb::new(0, 0, 0));
        assert_eq!(palette.get(196), Rgb::new(255, 0, 0));
        assert_eq!(palette.get(232), Rgb::new(8, 8, 8));
        assert_eq!(palette.get(255), Rgb::new(238, 238, 238));
    }

    #[test]
    fn test_resolve() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(ColorRef::Indexed(2)), Rgb::new(0, 205, 0));
        assert_eq!(
            palette.resolve(ColorRef::Rgb(Rgb::new(1, 2, 3))),
            Rgb::new(1, 2, 3)
        );
    }

    #[test]
    fn test_out_of_range_slot_falls_back() {
        let palette = Palette::default();
        assert_eq!(palette.get(511), palette.foreground());
        assert_eq!(palette.resolve(ColorRef::Indexed(300)), palette.foreground());
        assert_eq!(
            palette.resolve_background(ColorRef::Indexed(300)),
            palette.background()
        );
        assert_eq!(
            palette.resolve_background(ColorRef::Indexed(4)),
            palette.get(4)
        );
    }

    #[test]
    fn test_theme_from_json() {
        let json = r##"{
            "foreground": "#c0c0c0",
            "background": "101010",
            "colors": { "1": "#ff5555" }
        }"##;
        let theme = Theme::from_json(json).unwrap();
        let palette = Palette::from_theme(&theme).unwrap();
        assert_eq!(palette.foreground(), Rgb::new(0xc0, 0xc0, 0xc0));
        assert_eq!(palette.background(), Rgb::new(0x10, 0x10, 0x10));
        assert_eq!(palette.get(1), Rgb::new(0xff, 0x55, 0x55));
        // Untouched slots keep their defaults.
        assert_eq!(palette.get(2), Rgb::new(0, 205, 0));
    }

    #[test]
    fn test_theme_rejects_bad_color() {
        let theme = Theme {
            foreground: Some("#12345".to_string()),
            ..Theme::default()
        };
        assert!(matches!(
            Palette::from_theme(&theme),
            Err(ThemeError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_theme_rejects_bad_index() {
        let mut theme = Theme::default();
        theme.colors.insert("256".to_string(), "#000000".to_string());
        assert!(matches!(
            Palette::from_theme(&theme),
            Err(ThemeError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_theme_bad_json() {
        assert!(matches!(Theme::from_json("{"), Err(ThemeError::Json(_))));
    }
}
