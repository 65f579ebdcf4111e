//! UTF-16 decoding and terminal display width.

use unicode_width::UnicodeWidthChar;

/// One codepoint decoded from a row's code units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub ch: char,
    /// Code units consumed (1 or 2).
    pub units: usize,
}

/// Decode the codepoint starting at `index`.
///
/// A high surrogate followed by a low surrogate consumes two units. Lone or
/// reversed surrogates decode to U+FFFD and consume one unit, so a dangling
/// high surrogate at the end of the buffer never reads past it. Returns `None`
/// when `index` is past the end.
pub fn decode_at(text: &[u16], index: usize) -> Option<Decoded> {
    let unit = *text.get(index)?;
    if is_high_surrogate(unit) {
        if let Some(&low) = text.get(index + 1) {
            if is_low_surrogate(low) {
                let cp = 0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                let ch = char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
                return Some(Decoded { ch, units: 2 });
            }
        }
        return Some(Decoded {
            ch: char::REPLACEMENT_CHARACTER,
            units: 1,
        });
    }
    let ch = char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
    Some(Decoded { ch, units: 1 })
}

/// Number of terminal columns `ch` occupies: 0 for combining and other
/// zero-width codepoints (control characters included), 2 for East Asian wide
/// and fullwidth, 1 otherwise.
pub fn display_width(ch: char) -> usize {
    ch.width().unwrap_or(0).min(2)
}

/// Display width of the codepoint at `index`, or `None` past the end.
pub fn width_at(text: &[u16], index: usize) -> Option<usize> {
    decode_at(text, index).map(|d| display_width(d.ch))
}

/// Encode `ch` as UTF-16 onto `out`.
pub fn push_utf16(out: &mut Vec<u16>, ch: char) {
    let mut buf = [0u16; 2];
    out.extend_from_slice(ch.encode_utf16(&mut buf));
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}
