//! Read-only views of the terminal state consumed per frame.

use crate::palette::Palette;
use crate::style::Style;
use crate::unicode::push_utf16;

/// Shape of the terminal cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

/// Current state of the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub row: i32,
    pub column: usize,
    pub shape: CursorShape,
    pub visible: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            column: 0,
            shape: CursorShape::Block,
            visible: true,
        }
    }
}

/// Inclusive range of selected columns within one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: usize,
    pub last: usize,
}

impl ColumnSpan {
    pub fn contains(&self, column: usize) -> bool {
        column >= self.first && column <= self.last
    }
}

/// A selection from `(y1, x1)` to `(y2, x2)`, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub y1: i32,
    pub y2: i32,
    pub x1: usize,
    pub x2: usize,
}

impl Selection {
    pub fn new(y1: i32, y2: i32, x1: usize, x2: usize) -> Self {
        Self { y1, y2, x1, x2 }
    }

    /// Columns selected on `row` of a grid `columns` wide.
    ///
    /// Only the first row is clipped on the left (at `x1`) and only the last
    /// row on the right (at `x2`); rows in between are selected across the
    /// full width.
    pub fn columns_for_row(&self, row: i32, columns: usize) -> Option<ColumnSpan> {
        if row < self.y1 || row > self.y2 || columns == 0 {
            return None;
        }
        let first = if row == self.y1 { self.x1 } else { 0 };
        let last = if row == self.y2 {
            self.x2.min(columns - 1)
        } else {
            columns - 1
        };
        if first > last {
            return None;
        }
        Some(ColumnSpan { first, last })
    }
}

/// One row of the grid: UTF-16 text plus a style per column.
pub trait RowView {
    /// The used code units of the row. Surrogate pairs encode codepoints
    /// outside the basic plane; zero-width codepoints follow their base.
    fn text(&self) -> &[u16];

    /// Style of `column`. Must be defined for every column up to the grid
    /// width, including columns past the end of [`RowView::text`].
    fn style_at(&self, column: usize) -> Style;
}

/// A snapshot of the terminal, immutable for the duration of a render pass.
pub trait GridSnapshot {
    type Row<'a>: RowView
    where
        Self: 'a;

    fn columns(&self) -> usize;

    fn rows(&self) -> usize;

    fn cursor(&self) -> Cursor;

    /// Whole-screen reverse video (DECSCNM).
    fn reverse_video(&self) -> bool;

    fn palette(&self) -> &Palette;

    /// Row at external index `row`; negative indices address scrollback.
    fn row(&self, row: i32) -> Self::Row<'_>;
}

/// An owned row, convenient for hosts that keep their own buffers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRow {
    pub text: Vec<u16>,
    pub styles: Vec<Style>,
}

impl TextRow {
    /// A row with every column in `style`.
    pub fn new(text: &str, style: Style, columns: usize) -> Self {
        Self {
            text: text.encode_utf16().collect(),
            styles: vec![style; columns],
        }
    }

    /// A row of `columns` blanks.
    pub fn blank(columns: usize) -> Self {
        let mut text = Vec::with_capacity(columns);
        for _ in 0..columns {
            push_utf16(&mut text, ' ');
        }
        Self {
            text,
            styles: vec![Style::default(); columns],
        }
    }

    /// Set the style of columns `from..to`.
    pub fn set_style(&mut self, from: usize, to: usize, style: Style) {
        let to = to.min(self.styles.len());
        for slot in self.styles.iter_mut().take(to).skip(from) {
            *slot = style;
        }
    }
}

impl RowView for TextRow {
    fn text(&self) -> &[u16] {
        &self.text
    }

    fn style_at(&self, column: usize) -> Style {
        self.styles.get(column).copied().unwrap_or_default()
    }
}

impl<R: RowView + ?Sized> RowView for &R {
    fn text(&self) -> &[u16] {
        (**self).text()
    }

    fn style_at(&self, column: usize) -> Style {
        (**self).style_at(column)
    }
}

/// An in-memory grid of [`TextRow`]s. Row 0 is the first element.
#[derive(Clone, Debug)]
pub struct TextGrid {
    pub columns: usize,
    pub rows: Vec<TextRow>,
    pub cursor: Cursor,
    pub reverse_video: bool,
    pub palette: Palette,
    blank: TextRow,
}

impl TextGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows: vec![TextRow::blank(columns); rows],
            cursor: Cursor::default(),
            reverse_video: false,
            palette: Palette::default(),
            blank: TextRow::blank(columns),
        }
    }

    /// Replace the text of `row`, keeping its styles.
    pub fn set_text(&mut self, row: usize, text: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            r.text = text.encode_utf16().collect();
        }
    }
}

impl GridSnapshot for TextGrid {
    type Row<'a> = &'a TextRow;

    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows.len()
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn reverse_video(&self) -> bool {
        self.reverse_video
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn row(&self, row: i32) -> &TextRow {
        usize::try_from(row)
            .ok()
            .and_then(|r| self.rows.get(r))
            .unwrap_or(&self.blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_multi_row() {
        let sel = Selection::new(2, 4, 5, 10);
        assert_eq!(sel.columns_for_row(1, 20), None);
        assert_eq!(
            sel.columns_for_row(2, 20),
            Some(ColumnSpan { first: 5, last: 19 })
        );
        assert_eq!(
            sel.columns_for_row(3, 20),
            Some(ColumnSpan { first: 0, last: 19 })
        );
        assert_eq!(
            sel.columns_for_row(4, 20),
            Some(ColumnSpan { first: 0, last: 10 })
        );
        assert_eq!(sel.columns_for_row(5, 20), None);
    }

    #[test]
    fn test_selection_single_row() {
        let sel = Selection::new(3, 3, 5, 10);
        assert_eq!(
            sel.columns_for_row(3, 20),
            Some(ColumnSpan { first: 5, last: 10 })
        );
    }

    #[test]
    fn test_selection_clamped_to_width() {
        let sel = Selection::new(0, 0, 2, 50);
        assert_eq!(
            sel.columns_for_row(0, 8),
            Some(ColumnSpan { first: 2, last: 7 })
        );
    }

    #[test]
    fn test_selection_past_right_edge_is_empty() {
        let sel = Selection::new(0, 1, 30, 3);
        assert_eq!(sel.columns_for_row(0, 20), None);
        assert!(sel.columns_for_row(1, 20).is_some());
    }

    #[test]
    fn test_span_contains_is_inclusive() {
        let span = ColumnSpan { first: 5, last: 10 };
        assert!(!span.contains(4));
        assert!(span.contains(5));
        assert!(span.contains(10));
        assert!(!span.contains(11));
    }

    #[test]
    fn test_text_row_style_padding() {
        let row = TextRow::new("ab", Style::default(), 2);
        assert_eq!(row.style_at(5), Style::default());
    }

    #[test]
    fn test_grid_out_of_range_rows_are_blank() {
        let grid = TextGrid::new(4, 2);
        assert_eq!(grid.row(-1).text.len(), 4);
        assert_eq!(grid.row(9).text.len(), 4);
    }
}
