use alacritty_terminal::event::EventListener;
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::index::{Column, Line};
use alacritty_terminal::term::cell::{Cell, Flags as AlacFlags};
use alacritty_terminal::term::color::Colors;
use alacritty_terminal::term::Term;
use alacritty_terminal::vte::ansi::{Color, CursorShape as AlacCursorShape, NamedColor};

use cellpaint::palette::{BACKGROUND, CURSOR, FOREGROUND};
use cellpaint::unicode::{display_width, push_utf16};
use cellpaint::{
    Attributes, ColorRef, Cursor, CursorShape, GridSnapshot, Palette, Rgb, RowView, Style,
};

/// One row of the terminal, encoded for the compositor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VtRow {
    text: Vec<u16>,
    styles: Vec<Style>,
}

impl VtRow {
    /// Encode a grid row.
    ///
    /// Zero-width characters follow their base character in the text. The
    /// spacer column after a wide character adds no text and repeats the wide
    /// character's style. A cell holding a control or zero-width base (a tab
    /// start, for one) is encoded as a blank.
    pub(crate) fn from_cells<'c>(cells: impl IntoIterator<Item = &'c Cell>) -> Self {
        let mut row = VtRow::default();
        let mut last_style = Style::default();
        for cell in cells {
            if cell.flags.contains(AlacFlags::WIDE_CHAR_SPACER) {
                row.styles.push(last_style);
                continue;
            }
            let style = convert_style(cell);
            row.styles.push(style);
            last_style = style;

            if cell.flags.contains(AlacFlags::LEADING_WIDE_CHAR_SPACER) {
                push_utf16(&mut row.text, ' ');
                continue;
            }
            // Tabs and other controls stay in the cell they were written to;
            // they must still fill exactly one column.
            let base = if display_width(cell.c) == 0 { ' ' } else { cell.c };
            push_utf16(&mut row.text, base);
            if let Some(zerowidth) = cell.zerowidth() {
                for &c in zerowidth {
                    push_utf16(&mut row.text, c);
                }
            }
        }
        row
    }

    /// A row of default-styled blanks.
    pub(crate) fn blank(columns: usize) -> Self {
        VtRow {
            text: vec![b' ' as u16; columns],
            styles: vec![Style::default(); columns],
        }
    }
}

impl RowView for VtRow {
    fn text(&self) -> &[u16] {
        &self.text
    }

    fn style_at(&self, column: usize) -> Style {
        self.styles.get(column).copied().unwrap_or_default()
    }
}

/// A read-only snapshot of the terminal screen for one render pass.
pub struct VtSnapshot<'a, T> {
    term: &'a Term<T>,
    palette: Palette,
    reverse_video: bool,
}

impl<'a, T: EventListener> VtSnapshot<'a, T> {
    pub(crate) fn new(term: &'a Term<T>, base: &Palette, reverse_video: bool) -> Self {
        Self {
            term,
            palette: merge_palette(base, term.colors()),
            reverse_video,
        }
    }

    /// Whether `row` addresses a line on screen or in scrollback.
    fn has_line(&self, row: i32) -> bool {
        let history = self.term.grid().history_size() as i64;
        let row = row as i64;
        row >= -history && row < self.term.screen_lines() as i64
    }
}

impl<T: EventListener> GridSnapshot for VtSnapshot<'_, T> {
    type Row<'r>
        = VtRow
    where
        Self: 'r;

    fn columns(&self) -> usize {
        self.term.columns()
    }

    fn rows(&self) -> usize {
        self.term.screen_lines()
    }

    fn cursor(&self) -> Cursor {
        let content = self.term.renderable_content();
        let cursor = &content.cursor;
        Cursor {
            row: cursor.point.line.0,
            column: cursor.point.column.0,
            shape: convert_cursor_shape(cursor.shape),
            visible: cursor.shape != AlacCursorShape::Hidden,
        }
    }

    fn reverse_video(&self) -> bool {
        self.reverse_video
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn row(&self, row: i32) -> VtRow {
        let columns = self.term.columns();
        if !self.has_line(row) {
            return VtRow::blank(columns);
        }
        let line = &self.term.grid()[Line(row)];
        VtRow::from_cells((0..columns).map(|col| &line[Column(col)]))
    }
}

/// Overlay colors the terminal was told to change (OSC 4/10/11/12) on `base`.
pub(crate) fn merge_palette(base: &Palette, colors: &Colors) -> Palette {
    let mut palette = base.clone();
    for idx in 0..256 {
        if let Some(rgb) = colors[idx] {
            palette.set(idx as u16, Rgb::new(rgb.r, rgb.g, rgb.b));
        }
    }
    let specials = [
        (NamedColor::Foreground, FOREGROUND),
        (NamedColor::Background, BACKGROUND),
        (NamedColor::Cursor, CURSOR),
    ];
    for (named, slot) in specials {
        if let Some(rgb) = colors[named] {
            palette.set(slot, Rgb::new(rgb.r, rgb.g, rgb.b));
        }
    }
    palette
}

/// Map an alacritty color onto a palette slot or a direct color.
pub(crate) fn convert_color(color: &Color) -> ColorRef {
    match color {
        Color::Spec(rgb) => ColorRef::Rgb(Rgb::new(rgb.r, rgb.g, rgb.b)),
        Color::Indexed(idx) => ColorRef::Indexed(*idx as u16),
        Color::Named(named) => {
            let idx = *named as usize;
            let dim = NamedColor::DimBlack as usize..=NamedColor::DimWhite as usize;
            let slot = match named {
                _ if idx < 16 => idx as u16,
                NamedColor::Foreground
                | NamedColor::BrightForeground
                | NamedColor::DimForeground => FOREGROUND,
                NamedColor::Background => BACKGROUND,
                NamedColor::Cursor => CURSOR,
                // Dim colors: the DIM attribute already attenuates.
                _ if dim.contains(&idx) => (idx - NamedColor::DimBlack as usize) as u16,
                _ => FOREGROUND,
            };
            ColorRef::Indexed(slot)
        }
    }
}

/// Convert an alacritty cell's colors and flags to a [`Style`].
pub(crate) fn convert_style(cell: &Cell) -> Style {
    let mut attrs = Attributes::empty();
    if cell.flags.contains(AlacFlags::BOLD) {
        attrs |= Attributes::BOLD;
    }
    if cell.flags.contains(AlacFlags::ITALIC) {
        attrs |= Attributes::ITALIC;
    }
    if cell.flags.intersects(AlacFlags::ALL_UNDERLINES) {
        attrs |= Attributes::UNDERLINE;
    }
    if cell.flags.contains(AlacFlags::STRIKEOUT) {
        attrs |= Attributes::STRIKETHROUGH;
    }
    if cell.flags.contains(AlacFlags::INVERSE) {
        attrs |= Attributes::INVERSE;
    }
    if cell.flags.contains(AlacFlags::DIM) {
        attrs |= Attributes::DIM;
    }
    if cell.flags.contains(AlacFlags::HIDDEN) {
        attrs |= Attributes::INVISIBLE;
    }
    Style::new(convert_color(&cell.fg), convert_color(&cell.bg), attrs)
}

/// Convert alacritty's CursorShape to ours. Hollow blocks draw as blocks;
/// a hidden cursor keeps the block shape and is reported invisible.
pub(crate) fn convert_cursor_shape(shape: AlacCursorShape) -> CursorShape {
    match shape {
        AlacCursorShape::Block | AlacCursorShape::HollowBlock | AlacCursorShape::Hidden => {
            CursorShape::Block
        }
        AlacCursorShape::Underline => CursorShape::Underline,
        AlacCursorShape::Beam => CursorShape::Bar,
    }
}
