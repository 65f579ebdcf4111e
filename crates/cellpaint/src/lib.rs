//! cellpaint: compositing a terminal grid into draw commands.
//!
//! Each visible row is split into runs of cells that share a style, cursor
//! and selection state, and font-width fit ([`segment`]). Each run is then
//! turned into background, cursor and glyph commands for a host drawing
//! surface ([`paint`]). [`Renderer`] drives both over a [`GridSnapshot`].

pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod paint;
pub mod palette;
pub mod renderer;
pub mod segment;
pub mod style;
pub mod unicode;

pub use config::RendererConfig;
pub use error::{ConfigError, FontError, HostError, RenderError, SurfaceError, ThemeError};
pub use grid::{
    ColumnSpan, Cursor, CursorShape, GridSnapshot, RowView, Selection, TextGrid, TextRow,
};
pub use metrics::{FontMetrics, Typeface, VerticalMetrics};
pub use paint::{resolve_colors, DrawCommand, DrawSink, GlyphStyle, Painter, Rect, RunColors};
pub use palette::{Palette, Theme};
pub use renderer::Renderer;
pub use segment::{CellProbe, OpenRun, Run, RowOverlay, Segmenter};
pub use style::{Attributes, ColorRef, Rgb, Style};
