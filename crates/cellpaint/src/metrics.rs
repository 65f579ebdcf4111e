//! Font metrics, measured once per typeface and size.

use crate::error::{FontError, HostError};

/// Number of leading codepoints whose advance is cached at construction.
pub const ASCII_CACHE_LEN: usize = 127;

/// Raw vertical metrics reported by the host for a given pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalMetrics {
    /// Recommended distance between baselines.
    pub line_spacing: f32,
    /// Distance from the baseline to the top of the tallest glyph; negative
    /// (above the baseline) in y-down coordinates.
    pub ascent: f32,
}

/// The host's text-measurement facility for one typeface.
pub trait Typeface {
    /// Vertical metrics at `pixel_size`.
    fn vertical_metrics(&self, pixel_size: u16) -> Result<VerticalMetrics, HostError>;

    /// Advance width of `text` (UTF-16 code units) at `pixel_size`, in pixels.
    fn advance(&self, pixel_size: u16, text: &[u16]) -> Result<f32, HostError>;
}

impl<T: Typeface + ?Sized> Typeface for &T {
    fn vertical_metrics(&self, pixel_size: u16) -> Result<VerticalMetrics, HostError> {
        (**self).vertical_metrics(pixel_size)
    }

    fn advance(&self, pixel_size: u16, text: &[u16]) -> Result<f32, HostError> {
        (**self).advance(pixel_size, text)
    }
}

/// Frozen metrics for one typeface at one size.
///
/// Produced by [`FontMetrics::measure`] and never mutated afterwards. A change
/// of size or typeface means measuring again.
#[derive(Clone, Debug, PartialEq)]
pub struct FontMetrics {
    pixel_size: u16,
    cell_width: f32,
    line_spacing: i32,
    ascent: i32,
    ascii_advances: [f32; ASCII_CACHE_LEN],
}

impl FontMetrics {
    /// Measure `typeface` at `pixel_size`.
    ///
    /// The cell width is the advance of `X`. Line spacing and ascent are
    /// rounded up to whole pixels.
    pub fn measure<T: Typeface + ?Sized>(typeface: &T, pixel_size: u16) -> Result<Self, FontError> {
        if pixel_size == 0 {
            return Err(FontError::InvalidSize(pixel_size));
        }

        let vertical = typeface
            .vertical_metrics(pixel_size)
            .map_err(FontError::Measurement)?;
        if !vertical.line_spacing.is_finite() || vertical.line_spacing <= 0.0 {
            return Err(FontError::BadMetric {
                metric: "line spacing",
                value: vertical.line_spacing,
            });
        }
        if !vertical.ascent.is_finite() {
            return Err(FontError::BadMetric {
                metric: "ascent",
                value: vertical.ascent,
            });
        }

        let cell_width = typeface
            .advance(pixel_size, &[b'X' as u16])
            .map_err(FontError::Measurement)?;
        if !cell_width.is_finite() || cell_width <= 0.0 {
            return Err(FontError::BadMetric {
                metric: "cell width",
                value: cell_width,
            });
        }

        let mut ascii_advances = [0.0f32; ASCII_CACHE_LEN];
        for (cp, slot) in ascii_advances.iter_mut().enumerate() {
            let advance = typeface
                .advance(pixel_size, &[cp as u16])
                .map_err(FontError::Measurement)?;
            *slot = if advance.is_finite() && advance >= 0.0 {
                advance
            } else {
                // One nominal cell, as for a failed live measurement.
                log::warn!("unusable advance {advance} for U+{cp:04X}, assuming nominal width");
                cell_width
            };
        }

        let metrics = Self {
            pixel_size,
            cell_width,
            line_spacing: vertical.line_spacing.ceil() as i32,
            ascent: vertical.ascent.ceil() as i32,
            ascii_advances,
        };
        log::debug!(
            "measured font at {}px: cell width {}, line spacing {}, ascent {}",
            pixel_size,
            metrics.cell_width,
            metrics.line_spacing,
            metrics.ascent
        );
        Ok(metrics)
    }

    pub fn pixel_size(&self) -> u16 {
        self.pixel_size
    }

    /// Width of one terminal column, in pixels.
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    pub fn ascent(&self) -> i32 {
        self.ascent
    }

    /// `line_spacing + ascent`: distance from the top of a row to its baseline
    /// measured from the row below.
    pub fn line_spacing_and_ascent(&self) -> i32 {
        self.line_spacing + self.ascent
    }

    /// Cached advance for codepoints below [`ASCII_CACHE_LEN`].
    pub fn ascii_advance(&self, ch: char) -> Option<f32> {
        self.ascii_advances.get(ch as usize).copied()
    }

    /// Bottom edge, in pixels, of the `screen_row`-th visible row.
    pub fn row_bottom(&self, screen_row: usize) -> f32 {
        (self.line_spacing_and_ascent() + (screen_row as i32 + 1) * self.line_spacing) as f32
    }
}
