//! Splitting a row into runs of uniformly drawn cells.
//!
//! A row is walked codepoint by codepoint. Each base codepoint yields a
//! [`CellProbe`]; probes are folded into an [`OpenRun`], which closes and
//! emits a [`Run`] whenever the next probe cannot join it.

use std::convert::Infallible;

use crate::grid::{ColumnSpan, RowView};
use crate::metrics::{FontMetrics, Typeface};
use crate::style::Style;
use crate::unicode::{decode_at, display_width, width_at};

/// A maximal horizontal span of cells drawn in one batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Run {
    pub start_column: usize,
    /// Number of columns covered.
    pub columns: usize,
    /// Index of the first code unit in the row text.
    pub char_start: usize,
    /// Number of code units, combining marks included.
    pub char_len: usize,
    /// Sum of the measured advances of the run's base codepoints, in pixels.
    pub measured_width: f32,
    pub style: Style,
    pub inside_cursor: bool,
    pub inside_selection: bool,
    pub font_width_mismatch: bool,
}

impl Run {
    pub fn end_column(&self) -> usize {
        self.start_column + self.columns
    }

    pub fn char_range(&self) -> std::ops::Range<usize> {
        self.char_start..self.char_start + self.char_len
    }
}

/// Everything the fold needs to know about one base codepoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellProbe {
    pub column: usize,
    pub char_index: usize,
    pub style: Style,
    pub inside_cursor: bool,
    pub inside_selection: bool,
    pub font_width_mismatch: bool,
    pub measured_width: f32,
}

/// The run being accumulated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpenRun {
    start_column: usize,
    char_start: usize,
    style: Style,
    inside_cursor: bool,
    inside_selection: bool,
    font_width_mismatch: bool,
    measured_width: f32,
}

impl OpenRun {
    /// Open a run at `probe` and absorb it.
    pub fn start(probe: &CellProbe) -> Self {
        Self {
            start_column: probe.column,
            char_start: probe.char_index,
            style: probe.style,
            inside_cursor: probe.inside_cursor,
            inside_selection: probe.inside_selection,
            font_width_mismatch: probe.font_width_mismatch,
            measured_width: probe.measured_width,
        }
    }

    /// Whether `probe` can be drawn as part of this run. A mismatched
    /// codepoint always stands alone.
    pub fn accepts(&self, probe: &CellProbe) -> bool {
        self.style == probe.style
            && self.inside_cursor == probe.inside_cursor
            && self.inside_selection == probe.inside_selection
            && !self.font_width_mismatch
            && !probe.font_width_mismatch
    }

    /// One fold step: extend this run with `probe`, or close it and open a
    /// new one there.
    pub fn step(self, probe: &CellProbe) -> (Option<Run>, OpenRun) {
        if self.accepts(probe) {
            let next = OpenRun {
                measured_width: self.measured_width + probe.measured_width,
                ..self
            };
            (None, next)
        } else {
            (
                self.close(probe.column, probe.char_index),
                OpenRun::start(probe),
            )
        }
    }

    /// Close the run so that it ends just before `end_column` / `end_index`.
    /// A run covering no columns yields nothing.
    pub fn close(self, end_column: usize, end_index: usize) -> Option<Run> {
        if end_column <= self.start_column {
            return None;
        }
        Some(Run {
            start_column: self.start_column,
            columns: end_column - self.start_column,
            char_start: self.char_start,
            char_len: end_index.saturating_sub(self.char_start),
            measured_width: self.measured_width,
            style: self.style,
            inside_cursor: self.inside_cursor,
            inside_selection: self.inside_selection,
            font_width_mismatch: self.font_width_mismatch,
        })
    }
}

/// Per-row overlay state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowOverlay {
    /// Column the cursor is drawn at, if it is on this row and visible.
    pub cursor_column: Option<usize>,
    pub selection: Option<ColumnSpan>,
}

/// Splits rows of a fixed width into runs.
pub struct Segmenter<'a, T: ?Sized> {
    metrics: &'a FontMetrics,
    typeface: &'a T,
    columns: usize,
    tolerance: f32,
}

impl<'a, T: Typeface + ?Sized> Segmenter<'a, T> {
    pub fn new(metrics: &'a FontMetrics, typeface: &'a T, columns: usize, tolerance: f32) -> Self {
        Self {
            metrics,
            typeface,
            columns,
            tolerance,
        }
    }

    /// Collect the runs of `row`.
    pub fn segment<R: RowView + ?Sized>(&self, row: &R, overlay: RowOverlay) -> Vec<Run> {
        let mut runs = Vec::new();
        let result: Result<(), Infallible> = self.segment_with(row, overlay, |run| {
            runs.push(run);
            Ok(())
        });
        match result {
            Ok(()) => runs,
            Err(never) => match never {},
        }
    }

    /// Walk `row`, handing each run to `emit` as soon as it closes. Runs are
    /// emitted left to right and tile `0..columns` exactly.
    pub fn segment_with<R, F, E>(&self, row: &R, overlay: RowOverlay, mut emit: F) -> Result<(), E>
    where
        R: RowView + ?Sized,
        F: FnMut(Run) -> Result<(), E>,
    {
        let text = row.text();
        let mut open: Option<OpenRun> = None;
        let mut column = 0;
        let mut index = 0;

        while column < self.columns {
            let (probe, width, units) = self.probe(row, text, column, index, overlay);

            open = Some(match open {
                None => OpenRun::start(&probe),
                Some(run) => {
                    let (closed, next) = run.step(&probe);
                    if let Some(closed) = closed {
                        emit(closed)?;
                    }
                    next
                }
            });

            column += width;
            index += units;
            // Zero-width codepoints belong to the base before them.
            while let Some(0) = width_at(text, index) {
                index += decode_at(text, index).map_or(1, |d| d.units);
            }
        }

        if let Some(run) = open.and_then(|run| run.close(self.columns, index)) {
            emit(run)?;
        }
        Ok(())
    }

    /// Inspect the codepoint at `index`, drawn at `column`. Returns the probe,
    /// the columns it advances and the code units it consumes.
    fn probe<R: RowView + ?Sized>(
        &self,
        row: &R,
        text: &[u16],
        column: usize,
        index: usize,
        overlay: RowOverlay,
    ) -> (CellProbe, usize, usize) {
        let cell_width = self.metrics.cell_width();
        let remaining = self.columns - column;

        let (table_width, width, units, measured) = match decode_at(text, index) {
            Some(decoded) => {
                let table_width = display_width(decoded.ch);
                // A zero-width codepoint with no base is drawn as a blank cell.
                let width = table_width.max(1).min(remaining);
                (table_width, width, decoded.units, self.advance(decoded.ch))
            }
            // Past the end of the text: pad with a blank column.
            None => (1, 1, 0, cell_width),
        };

        let inside_cursor = match overlay.cursor_column {
            Some(cursor) => cursor == column || (table_width == 2 && cursor == column + 1),
            None => false,
        };
        let inside_selection = overlay
            .selection
            .is_some_and(|span| span.contains(column));
        let font_width_mismatch = (measured / cell_width - width as f32).abs() > self.tolerance;

        let probe = CellProbe {
            column,
            char_index: index,
            style: row.style_at(column),
            inside_cursor,
            inside_selection,
            font_width_mismatch,
            measured_width: measured,
        };
        (probe, width, units)
    }

    /// Advance of `ch`, from the ASCII cache when possible.
    fn advance(&self, ch: char) -> f32 {
        if let Some(cached) = self.metrics.ascii_advance(ch) {
            return cached;
        }
        let mut buf = [0u16; 2];
        let units = ch.encode_utf16(&mut buf);
        match self.typeface.advance(self.metrics.pixel_size(), units) {
            Ok(w) if w.is_finite() && w >= 0.0 => w,
            Ok(w) => {
                log::warn!("unusable advance {w} for U+{:04X}, assuming nominal width", ch as u32);
                self.nominal_advance(ch)
            }
            Err(e) => {
                log::warn!("failed to measure U+{:04X}: {e}", ch as u32);
                self.nominal_advance(ch)
            }
        }
    }

    fn nominal_advance(&self, ch: char) -> f32 {
        display_width(ch).max(1) as f32 * self.metrics.cell_width()
    }
}
