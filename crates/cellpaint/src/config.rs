use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for segmentation and painting.
///
/// Every field has a default, so a partial JSON object is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Allowed divergence, in cell widths, between a glyph's measured width
    /// and the width the cell grid expects before it is drawn scaled.
    pub mismatch_tolerance: f32,
    /// Horizontal skew applied to italic text.
    pub italic_skew: f32,
    /// Draw blinking text in bold, since blinking itself is not animated.
    pub blink_as_bold: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mismatch_tolerance: 0.01,
            italic_skew: -0.35,
            blink_as_bold: true,
        }
    }
}

impl RendererConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RendererConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mismatch_tolerance.is_finite() || self.mismatch_tolerance < 0.0 {
            return Err(ConfigError::Tolerance(self.mismatch_tolerance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.mismatch_tolerance, 0.01);
        assert_eq!(config.italic_skew, -0.35);
        assert!(config.blink_as_bold);
    }

    #[test]
    fn test_partial_json() {
        let config = RendererConfig::from_json(r#"{ "blink_as_bold": false }"#).unwrap();
        assert!(!config.blink_as_bold);
        assert_eq!(config.mismatch_tolerance, 0.01);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let err = RendererConfig::from_json(r#"{ "mismatch_tolerance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tolerance(_)));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            RendererConfig::from_json("[]"),
            Err(ConfigError::Json(_))
        ));
    }
}
