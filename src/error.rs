use thiserror::Error;
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("`{name}` must not be negative, got {value}")]
    NegativeSpan { name: &'static str, value: f64 },
    #[error("smoothing window must be a positive sample count, got {0}")]
    InvalidSmoothingWindow(i64),
    #[error("period must be a positive sample count, got {0}")]
    InvalidPeriod(i64),
    #[error("total sample count must be positive, got {0}")]
    InvalidHorizon(i64),
    #[error("query times must not decrease: previous {previous}, requested {requested}")]
    NonMonotonicTime { previous: f64, requested: f64 },
    #[error("pulse train queried before any pulses were scheduled")]
    NotScheduled,
    #[error("signal has no samples")]
    EmptySignal,
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),
    #[error("sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: f64, actual: f64 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SynthError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SynthError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SynthError {
    fn from(value: image::ImageError) -> Self {
        SynthError::Plot(value.to_string())
    }
}
/// Rejects NaN and infinities for a named quantity.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64, SynthError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SynthError::NonFinite { name, value })
    }
}
