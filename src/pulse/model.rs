use crate::error::{ensure_finite, SynthError};
use crate::types::PulseShape;
/// One trapezoidal pulse passed through a causal moving average.
///
/// The raw waveform rises linearly from `low` to `high` over `ramp_duration`,
/// holds `high`, then falls back to `low` so the whole pulse spans `duration`.
/// Every update pushes one raw sample into a circular window and the reported
/// value is the mean of the last `smoothing_window` raw samples. Before the
/// window has been filled its slots hold `low`.
#[derive(Clone, Debug)]
pub struct PulseModel {
    start_time: f64,
    low: f64,
    high: f64,
    duration: f64,
    ramp_duration: f64,
    amplitude_range: f64,
    ramp_down_start: f64,
    expiry_offset: f64,
    last_relative_time: f64,
    latest_time: Option<f64>,
    last_value: f64,
    // each slot holds raw / window so the sum is the moving average
    window: Vec<f64>,
    cursor: usize,
}
impl PulseModel {
    pub fn new(start_time: f64, shape: &PulseShape) -> Result<Self, SynthError> {
        let start_time = ensure_finite("start_time", start_time)?;
        let smoothing_window = shape.validate()?;
        let slot = shape.low / smoothing_window as f64;
        Ok(Self {
            start_time,
            low: shape.low,
            high: shape.high,
            duration: shape.duration,
            ramp_duration: shape.ramp_duration,
            amplitude_range: shape.high - shape.low,
            ramp_down_start: shape.duration - shape.ramp_duration,
            expiry_offset: shape.expiry.expiry_offset(
                shape.duration,
                shape.ramp_duration,
                smoothing_window,
            ),
            last_relative_time: 0.0,
            latest_time: None,
            last_value: shape.low,
            window: vec![slot; smoothing_window],
            cursor: 0,
        })
    }
    pub fn start_time(&self) -> f64 {
        self.start_time
    }
    pub fn expiry_offset(&self) -> f64 {
        self.expiry_offset
    }
    pub fn last_relative_time(&self) -> f64 {
        self.last_relative_time
    }
    /// Most recent smoothed value.
    pub fn value(&self) -> f64 {
        self.last_value
    }
    /// Advances to `time` when given, then returns the smoothed value.
    pub fn value_at(&mut self, time: Option<f64>) -> Result<f64, SynthError> {
        if let Some(time) = time {
            self.update(time)?;
        }
        Ok(self.value())
    }
    /// Advances the filter to absolute `time`.
    ///
    /// Repeating the previous relative time leaves the model untouched. Note the
    /// relative time starts at zero, so an update landing exactly on the pulse
    /// start is a no-op as well. Times lower than an earlier update are rejected.
    pub fn update(&mut self, time: f64) -> Result<(), SynthError> {
        let time = ensure_finite("time", time)?;
        if let Some(previous) = self.latest_time {
            if time < previous {
                return Err(SynthError::NonMonotonicTime {
                    previous,
                    requested: time,
                });
            }
        }
        self.latest_time = Some(time);
        let relative_time = time - self.start_time;
        if relative_time == self.last_relative_time {
            return Ok(());
        }
        self.last_relative_time = relative_time;
        self.window[self.cursor] = self.raw_value_at(relative_time) / self.window.len() as f64;
        self.cursor = (self.cursor + 1) % self.window.len();
        self.last_value = compensated_sum(&self.window);
        Ok(())
    }
    /// False once the relative time has moved past the expiry offset.
    pub fn is_active(&self) -> bool {
        self.last_relative_time <= self.expiry_offset
    }
    /// Unsmoothed trapezoid at `relative_time`.
    pub fn raw_value_at(&self, relative_time: f64) -> f64 {
        if relative_time <= 0.0 {
            self.low
        } else if relative_time <= self.ramp_duration {
            self.low + self.amplitude_range * relative_time / self.ramp_duration
        } else if relative_time <= self.ramp_down_start {
            self.high
        } else if relative_time <= self.duration {
            self.high
                - self.amplitude_range * (relative_time - self.ramp_down_start)
                    / self.ramp_duration
        } else {
            self.low
        }
    }
}
/// Neumaier summation: the running error term keeps a full window of `high / n`
/// slots summing back to exactly `high`.
fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for &value in values {
        let total = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - total) + value;
        } else {
            compensation += (value - total) + sum;
        }
        sum = total;
    }
    sum + compensation
}
