use thiserror::Error;

/// Boxed error from a host facility (text measurement or drawing backend).
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Font metric acquisition failed. Fatal for renderer construction.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("invalid font size: {0}")]
    InvalidSize(u16),
    #[error("font reported unusable {metric}: {value}")]
    BadMetric { metric: &'static str, value: f32 },
    #[error("text measurement failed: {0}")]
    Measurement(#[source] HostError),
}

/// The drawing surface rejected a command.
#[derive(Debug, Error)]
#[error("drawing surface error: {message}")]
pub struct SurfaceError {
    message: String,
    #[source]
    source: Option<HostError>,
}

impl SurfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<HostError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by [`Renderer`](crate::Renderer).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A theme could not be turned into a palette.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid palette index {0:?}, expected 0..256")]
    InvalidIndex(String),
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A renderer configuration could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid renderer config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mismatch tolerance must be finite and non-negative, got {0}")]
    Tolerance(f32),
}
