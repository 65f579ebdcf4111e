//! Turning runs into draw commands.

use crate::config::RendererConfig;
use crate::error::SurfaceError;
use crate::grid::CursorShape;
use crate::metrics::FontMetrics;
use crate::palette::Palette;
use crate::segment::Run;
use crate::style::{Attributes, Rgb, Style};

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Font toggles for a glyph draw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphStyle {
    pub bold: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Horizontal skew; non-zero for italic text.
    pub skew_x: f32,
}

/// One abstract drawing operation, in issue order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { color: Rgb },
    FillRect { rect: Rect, color: Rgb },
    /// Draw `text` (UTF-16) with its left edge at `x` on `baseline`.
    /// `char_start` is the index of `text[0]` in the row.
    DrawGlyphs {
        text: Vec<u16>,
        char_start: usize,
        x: f32,
        baseline: f32,
        color: Rgb,
        style: GlyphStyle,
    },
    /// Scale horizontally until the matching [`DrawCommand::PopTransform`].
    PushScale { x: f32 },
    PopTransform,
}

/// Receives draw commands. Implemented by the host's drawing surface.
pub trait DrawSink {
    fn draw(&mut self, command: DrawCommand) -> Result<(), SurfaceError>;
}

/// Records commands, for hosts that replay a frame later and for tests.
impl DrawSink for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        self.push(command);
        Ok(())
    }
}

impl<S: DrawSink + ?Sized> DrawSink for &mut S {
    fn draw(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        (**self).draw(command)
    }
}

/// Final colors of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunColors {
    pub foreground: Rgb,
    pub background: Rgb,
}

/// Resolve the colors a run is drawn with.
///
/// Colors go through the palette first. Foreground and background are then
/// swapped when exactly one of `reverse` and the style's INVERSE attribute is
/// set. DIM finally attenuates whatever ended up as the foreground.
pub fn resolve_colors(style: &Style, palette: &Palette, reverse: bool) -> RunColors {
    let attrs = style.attributes();
    let mut foreground = palette.resolve(style.foreground());
    let mut background = palette.resolve_background(style.background());
    if reverse ^ attrs.contains(Attributes::INVERSE) {
        std::mem::swap(&mut foreground, &mut background);
    }
    if attrs.contains(Attributes::DIM) {
        foreground = foreground.dimmed();
    }
    RunColors {
        foreground,
        background,
    }
}

/// Frame-wide state the painter needs for every run.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub palette: &'a Palette,
    pub reverse_video: bool,
    pub cursor_shape: CursorShape,
}

/// Paints one run at a time.
pub struct Painter<'a> {
    metrics: &'a FontMetrics,
    config: &'a RendererConfig,
}

impl<'a> Painter<'a> {
    pub fn new(metrics: &'a FontMetrics, config: &'a RendererConfig) -> Self {
        Self { metrics, config }
    }

    /// Horizontal scale that squeezes `run` back onto its columns, or `None`
    /// when its measured width already fits.
    pub fn scale_for(&self, run: &Run) -> Option<f32> {
        let measured_cells = run.measured_width / self.metrics.cell_width();
        let columns = run.columns as f32;
        let tolerance = self.config.mismatch_tolerance;
        if measured_cells > 0.0 && (measured_cells - columns).abs() > tolerance {
            Some(columns / measured_cells)
        } else {
            None
        }
    }

    /// Issue the commands for `run`, whose row has its bottom edge at
    /// `row_bottom`. `text` is the whole row's text.
    pub fn paint<S: DrawSink + ?Sized>(
        &self,
        run: &Run,
        text: &[u16],
        frame: &FrameContext<'_>,
        row_bottom: f32,
        sink: &mut S,
    ) -> Result<(), SurfaceError> {
        let cell_width = self.metrics.cell_width();
        let line_spacing = self.metrics.line_spacing() as f32;
        let attrs = run.style.attributes();
        let colors = resolve_colors(
            &run.style,
            frame.palette,
            frame.reverse_video || run.inside_selection,
        );

        let mut left = run.start_column as f32 * cell_width;
        let mut right = left + run.columns as f32 * cell_width;

        let scale = self.scale_for(run);
        if let Some(x) = scale {
            sink.draw(DrawCommand::PushScale { x })?;
            left /= x;
            right /= x;
        }

        if colors.background != frame.palette.background() {
            sink.draw(DrawCommand::FillRect {
                rect: Rect {
                    left,
                    top: row_bottom - line_spacing,
                    right,
                    bottom: row_bottom,
                },
                color: colors.background,
            })?;
        }

        if run.inside_cursor {
            let mut height = line_spacing;
            let mut cursor_right = right;
            match frame.cursor_shape {
                CursorShape::Block => {}
                CursorShape::Underline => height /= 4.0,
                CursorShape::Bar => cursor_right -= (right - left) * 3.0 / 4.0,
            }
            sink.draw(DrawCommand::FillRect {
                rect: Rect {
                    left,
                    top: row_bottom - height,
                    right: cursor_right,
                    bottom: row_bottom,
                },
                color: frame.palette.cursor(),
            })?;
        }

        if !attrs.contains(Attributes::INVISIBLE) {
            let bold = attrs.contains(Attributes::BOLD)
                || (self.config.blink_as_bold && attrs.contains(Attributes::BLINK));
            let style = GlyphStyle {
                bold,
                underline: attrs.contains(Attributes::UNDERLINE),
                strikethrough: attrs.contains(Attributes::STRIKETHROUGH),
                skew_x: if attrs.contains(Attributes::ITALIC) {
                    self.config.italic_skew
                } else {
                    0.0
                },
            };
            let end = (run.char_start + run.char_len).min(text.len());
            let start = run.char_start.min(end);
            sink.draw(DrawCommand::DrawGlyphs {
                text: text[start..end].to_vec(),
                char_start: start,
                x: left,
                baseline: row_bottom - self.metrics.line_spacing_and_ascent() as f32,
                color: colors.foreground,
                style,
            })?;
        }

        if scale.is_some() {
            sink.draw(DrawCommand::PopTransform)?;
        }
        Ok(())
    }
}
