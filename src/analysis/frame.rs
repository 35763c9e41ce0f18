use crate::analysis::{SignalBatch, SynthError};
/// Flattened view of a sampled signal.
#[derive(Clone, Debug)]
pub struct TimeSeriesFrame {
    pub sample_rate_hz: f64,
    pub label: String,
    pub times: Vec<f64>,
    pub samples: Vec<f64>,
}
impl TimeSeriesFrame {
    pub fn new(label: impl Into<String>, sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            label: label.into(),
            times: Vec::new(),
            samples: Vec::new(),
        }
    }
    pub fn push_batch(&mut self, batch: &SignalBatch) -> Result<(), SynthError> {
        batch.validate()?;
        if batch.sample_rate_hz != self.sample_rate_hz {
            return Err(SynthError::SampleRateMismatch {
                expected: self.sample_rate_hz,
                actual: batch.sample_rate_hz,
            });
        }
        self.times.extend(batch.times());
        self.samples.extend_from_slice(&batch.samples);
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz
    }
    /// `(min, max)` of the samples, `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        ))
    }
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}
