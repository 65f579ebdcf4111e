use bitflags::bitflags;

/// RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from the low 24 bits of `0x__RRGGBB`.
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Attenuate each channel to two thirds, truncating (the xterm/libvte dim rule).
    pub const fn dimmed(self) -> Self {
        Self {
            r: (self.r as u16 * 2 / 3) as u8,
            g: (self.g as u16 * 2 / 3) as u8,
            b: (self.b as u16 * 2 / 3) as u8,
        }
    }
}

/// Where a cell's color comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorRef {
    /// A slot in the active [`Palette`](crate::Palette).
    Indexed(u16),
    /// A direct 24-bit color.
    Rgb(Rgb),
}

impl ColorRef {
    /// Decode the sentinel form used by emulators that keep colors in one
    /// integer: a high byte of `0xFF` marks a direct RGB value, anything else
    /// is a palette index.
    pub const fn from_argb(value: u32) -> Self {
        if value & 0xFF00_0000 == 0xFF00_0000 {
            ColorRef::Rgb(Rgb::from_u32(value))
        } else {
            ColorRef::Indexed((value & 0xFFFF) as u16)
        }
    }

    pub const fn to_argb(self) -> u32 {
        match self {
            ColorRef::Indexed(idx) => idx as u32,
            ColorRef::Rgb(rgb) => 0xFF00_0000 | rgb.to_u32(),
        }
    }
}

bitflags! {
    /// Character attributes. Bit positions match the low bits of the packed
    /// style word.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attributes: u16 {
        const BOLD          = 1;
        const ITALIC        = 1 << 1;
        const UNDERLINE     = 1 << 2;
        const BLINK         = 1 << 3;
        const INVERSE       = 1 << 4;
        const INVISIBLE     = 1 << 5;
        const STRIKETHROUGH = 1 << 6;
        /// Set by DECSCA; has no visual effect.
        const PROTECTED     = 1 << 7;
        const DIM           = 1 << 8;
    }
}

const TRUECOLOR_FOREGROUND: u64 = 1 << 9;
const TRUECOLOR_BACKGROUND: u64 = 1 << 10;
const EFFECT_MASK: u64 = 0b1_1111_1111;
const INDEX_MASK: u64 = 0x1FF;
const RGB_MASK: u64 = 0x00FF_FFFF;
const FG_SHIFT: u32 = 40;
const BG_SHIFT: u32 = 16;

/// The visual style shared by every column of a run.
///
/// Equality is structural: a palette slot and the direct color it resolves
/// to compare unequal. Run boundaries are found with `==`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Style {
    fg: ColorRef,
    bg: ColorRef,
    attrs: Attributes,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: ColorRef::Indexed(crate::palette::FOREGROUND),
            bg: ColorRef::Indexed(crate::palette::BACKGROUND),
            attrs: Attributes::empty(),
        }
    }
}

impl Style {
    pub const fn new(fg: ColorRef, bg: ColorRef, attrs: Attributes) -> Self {
        Self { fg, bg, attrs }
    }

    pub const fn foreground(&self) -> ColorRef {
        self.fg
    }

    pub const fn background(&self) -> ColorRef {
        self.bg
    }

    pub const fn attributes(&self) -> Attributes {
        self.attrs
    }

    pub fn with_foreground(self, fg: ColorRef) -> Self {
        Self { fg, ..self }
    }

    pub fn with_background(self, bg: ColorRef) -> Self {
        Self { bg, ..self }
    }

    pub fn with_attributes(self, attrs: Attributes) -> Self {
        Self { attrs, ..self }
    }

    /// Decode a packed 64-bit style word.
    ///
    /// Layout:
    /// - bits 0..9:   attribute flags
    /// - bit 9:       foreground is truecolor
    /// - bit 10:      background is truecolor
    /// - bits 16..40: background (24-bit RGB, or 9-bit palette index)
    /// - bits 40..64: foreground (24-bit RGB, or 9-bit palette index)
    pub fn from_word(word: u64) -> Self {
        let fg = if word & TRUECOLOR_FOREGROUND != 0 {
            ColorRef::Rgb(Rgb::from_u32(((word >> FG_SHIFT) & RGB_MASK) as u32))
        } else {
            ColorRef::Indexed(((word >> FG_SHIFT) & INDEX_MASK) as u16)
        };
        let bg = if word & TRUECOLOR_BACKGROUND != 0 {
            ColorRef::Rgb(Rgb::from_u32(((word >> BG_SHIFT) & RGB_MASK) as u32))
        } else {
            ColorRef::Indexed(((word >> BG_SHIFT) & INDEX_MASK) as u16)
        };
        let attrs = Attributes::from_bits_truncate((word & EFFECT_MASK) as u16);
        Self { fg, bg, attrs }
    }

    /// Pack into the word layout described on [`Style::from_word`].
    pub fn to_word(&self) -> u64 {
        let mut word = self.attrs.bits() as u64 & EFFECT_MASK;
        match self.fg {
            ColorRef::Rgb(rgb) => {
                word |= TRUECOLOR_FOREGROUND | ((rgb.to_u32() as u64) << FG_SHIFT)
            }
            ColorRef::Indexed(idx) => word |= (idx as u64 & INDEX_MASK) << FG_SHIFT,
        }
        match self.bg {
            ColorRef::Rgb(rgb) => {
                word |= TRUECOLOR_BACKGROUND | ((rgb.to_u32() as u64) << BG_SHIFT)
            }
            ColorRef::Indexed(idx) => word |= (idx as u64 & INDEX_MASK) << BG_SHIFT,
        }
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BACKGROUND, FOREGROUND};

    #[test]
    fn test_dim_white() {
        assert_eq!(Rgb::new(255, 255, 255).dimmed(), Rgb::new(170, 170, 170));
    }

    #[test]
    fn test_dim_truncates() {
        // 100 * 2 / 3 = 66.67 -> 66
        assert_eq!(Rgb::new(100, 1, 0).dimmed(), Rgb::new(66, 0, 0));
    }

    #[test]
    fn test_color_ref_sentinel() {
        assert_eq!(
            ColorRef::from_argb(0xFF12_3456),
            ColorRef::Rgb(Rgb::new(0x12, 0x34, 0x56))
        );
        assert_eq!(ColorRef::from_argb(7), ColorRef::Indexed(7));
        assert_eq!(ColorRef::from_argb(257), ColorRef::Indexed(257));
    }

    #[test]
    fn test_default_style_uses_default_slots() {
        let style = Style::default();
        assert_eq!(style.foreground(), ColorRef::Indexed(FOREGROUND));
        assert_eq!(style.background(), ColorRef::Indexed(BACKGROUND));
        assert!(style.attributes().is_empty());
    }

    #[test]
    fn test_word_indexed_layout() {
        let style = Style::new(
            ColorRef::Indexed(1),
            ColorRef::Indexed(BACKGROUND),
            Attributes::BOLD | Attributes::DIM,
        );
        let word = style.to_word();
        assert_eq!(word & 0x1FF, (Attributes::BOLD | Attributes::DIM).bits() as u64);
        assert_eq!((word >> 40) & 0x1FF, 1);
        assert_eq!((word >> 16) & 0x1FF, BACKGROUND as u64);
        assert_eq!(Style::from_word(word), style);
    }

    #[test]
    fn test_word_truecolor_flags() {
        let style = Style::new(
            ColorRef::Rgb(Rgb::new(1, 2, 3)),
            ColorRef::Rgb(Rgb::new(0xAA, 0xBB, 0xCC)),
            Attributes::empty(),
        );
        let word = style.to_word();
        assert_ne!(word & (1 << 9), 0);
        assert_ne!(word & (1 << 10), 0);
        assert_eq!(Style::from_word(word), style);
    }

    #[test]
    fn test_word_ignores_unknown_effect_bits() {
        // Truecolor flag bits are not attributes.
        let style = Style::from_word(0b110_0000_0001);
        assert_eq!(style.attributes(), Attributes::BOLD);
    }

    #[test]
    fn test_structural_equality() {
        let a = Style::default().with_attributes(Attributes::UNDERLINE);
        let b = Style::default().with_attributes(Attributes::UNDERLINE);
        let c = Style::default().with_attributes(Attributes::ITALIC);
        assert_eq!(a, b);
        assert_ne!(a, c);

        // Same pixels through the default palette, different styles.
        let slot = Style::default().with_foreground(ColorRef::Indexed(1));
        let direct = Style::default().with_foreground(ColorRef::Rgb(Rgb::new(205, 0, 0)));
        assert_ne!(slot, direct);
    }
}
