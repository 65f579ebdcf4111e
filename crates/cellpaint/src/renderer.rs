use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::grid::{GridSnapshot, RowView, Selection};
use crate::metrics::{FontMetrics, Typeface};
use crate::paint::{DrawCommand, DrawSink, FrameContext, Painter};
use crate::segment::{RowOverlay, Segmenter};

/// Renders grid snapshots with one typeface at one size.
///
/// Font metrics are measured once in [`Renderer::new`]; build a new renderer
/// when the size or typeface changes.
pub struct Renderer<T> {
    typeface: T,
    metrics: FontMetrics,
    config: RendererConfig,
}

impl<T: Typeface> Renderer<T> {
    pub fn new(font_size: u16, typeface: T) -> Result<Self, RenderError> {
        Self::with_config(font_size, typeface, RendererConfig::default())
    }

    pub fn with_config(
        font_size: u16,
        typeface: T,
        config: RendererConfig,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        let metrics = FontMetrics::measure(&typeface, font_size)?;
        Ok(Self {
            typeface,
            metrics,
            config,
        })
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn typeface(&self) -> &T {
        &self.typeface
    }

    /// Draw rows `top_row..top_row + grid.rows()` onto `sink`.
    ///
    /// Stops at the first command the sink rejects; the partially drawn
    /// frame is left to the caller.
    pub fn render<G, S>(
        &self,
        grid: &G,
        sink: &mut S,
        top_row: i32,
        selection: Option<Selection>,
    ) -> Result<(), RenderError>
    where
        G: GridSnapshot + ?Sized,
        S: DrawSink + ?Sized,
    {
        let columns = grid.columns();
        let cursor = grid.cursor();
        let palette = grid.palette();
        let frame = FrameContext {
            palette,
            reverse_video: grid.reverse_video(),
            cursor_shape: cursor.shape,
        };

        if frame.reverse_video {
            sink.draw(DrawCommand::Clear {
                color: palette.foreground(),
            })?;
        }

        let segmenter = Segmenter::new(
            &self.metrics,
            &self.typeface,
            columns,
            self.config.mismatch_tolerance,
        );
        let painter = Painter::new(&self.metrics, &self.config);

        for screen_row in 0..grid.rows() {
            let row = top_row.saturating_add(screen_row as i32);
            let row_bottom = self.metrics.row_bottom(screen_row);
            let overlay = RowOverlay {
                cursor_column: (cursor.visible && cursor.row == row).then_some(cursor.column),
                selection: selection.and_then(|s| s.columns_for_row(row, columns)),
            };
            log::trace!("rendering row {row} at y={row_bottom}, {overlay:?}");

            let line = grid.row(row);
            segmenter.segment_with(&line, overlay, |run| {
                painter.paint(&run, line.text(), &frame, row_bottom, &mut *sink)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FontError, SurfaceError};
    use crate::grid::{CursorShape, TextGrid};
    use crate::metrics::tests::FixedTypeface;
    use crate::style::{Attributes, ColorRef, Rgb, Style};

    fn renderer() -> Renderer<FixedTypeface> {
        Renderer::new(14, FixedTypeface::new(8.0)).unwrap()
    }

    fn glyph_runs(commands: &[DrawCommand]) -> Vec<(String, f32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawGlyphs { text, x, .. } => {
                    Some((String::from_utf16_lossy(text), *x))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_construction_fails_on_bad_font() {
        let result = Renderer::new(0, FixedTypeface::new(8.0));
        assert!(matches!(
            result,
            Err(RenderError::Font(FontError::InvalidSize(0)))
        ));
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let config = RendererConfig {
            mismatch_tolerance: f32::NAN,
            ..RendererConfig::default()
        };
        assert!(matches!(
            Renderer::with_config(14, FixedTypeface::new(8.0), config),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_render_one_run_per_plain_row() {
        let mut grid = TextGrid::new(5, 2);
        grid.set_text(0, "hello");
        grid.set_text(1, "world");
        grid.cursor.visible = false;

        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        assert_eq!(
            glyph_runs(&commands),
            vec![("hello".to_string(), 0.0), ("world".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_rows_stack_by_line_spacing() {
        let mut grid = TextGrid::new(3, 3);
        grid.cursor.visible = false;
        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        let baselines: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawGlyphs { baseline, .. } => Some(*baseline),
                _ => None,
            })
            .collect();
        assert_eq!(baselines, vec![17.0, 34.0, 51.0]);
    }

    #[test]
    fn test_cursor_drawn_on_its_row_only() {
        let mut grid = TextGrid::new(4, 2);
        grid.cursor.row = 1;
        grid.cursor.column = 2;
        grid.cursor.shape = CursorShape::Block;

        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        let cursor_fills: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .collect();
        assert_eq!(cursor_fills.len(), 1);
        assert_eq!(glyph_runs(&commands).len(), 4);
    }

    #[test]
    fn test_hidden_cursor_not_drawn() {
        let mut grid = TextGrid::new(4, 1);
        grid.cursor.visible = false;
        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_reverse_video_clears_first() {
        let mut grid = TextGrid::new(2, 1);
        grid.reverse_video = true;
        grid.cursor.visible = false;
        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                color: grid.palette.foreground()
            }
        );
    }

    #[test]
    fn test_top_row_offsets_cursor_and_selection() {
        let mut grid = TextGrid::new(4, 2);
        grid.cursor.visible = false;
        let mut commands = Vec::new();
        // Rows 5 and 6 are requested; the selection only touches row 6.
        renderer()
            .render(&grid, &mut commands, 5, Some(Selection::new(6, 6, 1, 2)))
            .unwrap();
        let fills: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].left, 8.0);
        assert_eq!(fills[0].right, 24.0);
        assert_eq!(fills[0].bottom, 39.0);
    }

    #[test]
    fn test_styled_cells_use_palette() {
        let mut grid = TextGrid::new(3, 1);
        grid.cursor.visible = false;
        grid.rows[0].set_style(
            0,
            3,
            Style::new(ColorRef::Indexed(2), ColorRef::Indexed(257), Attributes::empty()),
        );
        let mut commands = Vec::new();
        renderer().render(&grid, &mut commands, 0, None).unwrap();
        match &commands[0] {
            DrawCommand::DrawGlyphs { color, .. } => assert_eq!(*color, Rgb::new(0, 205, 0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    struct FailingSink {
        accepted: usize,
    }

    impl DrawSink for FailingSink {
        fn draw(&mut self, _command: DrawCommand) -> Result<(), SurfaceError> {
            if self.accepted == 1 {
                return Err(SurfaceError::new("device lost"));
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn test_surface_error_propagates() {
        let grid = TextGrid::new(4, 3);
        let mut sink = FailingSink { accepted: 0 };
        let err = renderer().render(&grid, &mut sink, 0, None).unwrap_err();
        assert!(matches!(err, RenderError::Surface(ref e) if e.message() == "device lost"));
        assert_eq!(sink.accepted, 1);
    }
}
