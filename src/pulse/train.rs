use log::{debug, warn};

use crate::error::{ensure_finite, SynthError};
use crate::pulse::PulseModel;
use crate::types::{PulseShape, TrainConfig};
/// Periodic train of [`PulseModel`]s reduced to their running maximum.
///
/// Pulses are laid out once by [`PulseTrain::schedule`], advanced together on every
/// query, and dropped for good as soon as they expire. Query times must not
/// decrease; repeating the previous time is allowed.
#[derive(Clone, Debug)]
pub struct PulseTrain {
    period: usize,
    total_samples: usize,
    pulses_count: usize,
    pulses: Vec<PulseModel>,
    start_times: Vec<f64>,
    // returned unchanged once every pulse has expired
    last_value: f64,
    latest_time: Option<f64>,
    scheduled: bool,
}
impl PulseTrain {
    pub fn new(period: i64, total_samples: i64) -> Result<Self, SynthError> {
        Self::from_config(&TrainConfig {
            period,
            total_samples,
        })
    }
    pub fn from_config(config: &TrainConfig) -> Result<Self, SynthError> {
        let (period, total_samples) = config.validate()?;
        let pulses_count = total_samples / period;
        if pulses_count == 0 {
            warn!("period {period} exceeds horizon {total_samples}; no pulses will be scheduled");
        }
        Ok(Self {
            period,
            total_samples,
            pulses_count,
            pulses: Vec::with_capacity(pulses_count),
            start_times: Vec::with_capacity(pulses_count),
            last_value: 0.0,
            latest_time: None,
            scheduled: false,
        })
    }
    pub fn period(&self) -> usize {
        self.period
    }
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }
    pub fn pulses_count(&self) -> usize {
        self.pulses_count
    }
    /// Shift that centres the pulses inside the horizon.
    pub fn centering_offset(&self) -> f64 {
        (self.total_samples - self.pulses_count * self.period) as f64 / 2.0
    }
    /// Start times of every scheduled pulse, expired ones included.
    pub fn start_times(&self) -> &[f64] {
        &self.start_times
    }
    pub fn active_count(&self) -> usize {
        self.pulses.len()
    }
    /// Lays out `pulses_count` pulses of the given shape, replacing any earlier schedule.
    pub fn schedule(&mut self, shape: &PulseShape) -> Result<&mut Self, SynthError> {
        shape.validate()?;
        let offset = self.centering_offset();
        let pulses = (0..self.pulses_count)
            .map(|index| PulseModel::new((index * self.period) as f64 + offset, shape))
            .collect::<Result<Vec<_>, _>>()?;
        if self.scheduled {
            debug!("replacing schedule of {} pulses", self.start_times.len());
        }
        self.start_times = pulses.iter().map(PulseModel::start_time).collect();
        self.pulses = pulses;
        self.last_value = 0.0;
        self.latest_time = None;
        self.scheduled = true;
        debug!(
            "scheduled {} pulses, period {}, offset {offset}",
            self.pulses_count, self.period
        );
        Ok(self)
    }
    /// Advances to `time` when given, then returns the largest smoothed value among
    /// live pulses, or the previous result when none are left.
    pub fn value_at(&mut self, time: Option<f64>) -> Result<f64, SynthError> {
        if !self.scheduled {
            return Err(SynthError::NotScheduled);
        }
        if let Some(time) = time {
            self.update(time)?;
        }
        let mut peak: Option<f64> = None;
        for pulse in &mut self.pulses {
            let value = pulse.value_at(None)?;
            peak = Some(peak.map_or(value, |p| p.max(value)));
        }
        if let Some(peak) = peak {
            self.last_value = peak;
        }
        Ok(self.last_value)
    }
    fn update(&mut self, time: f64) -> Result<(), SynthError> {
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
        for pulse in &mut self.pulses {
            pulse.update(time)?;
        }
        self.pulses.retain(|pulse| {
            let active = pulse.is_active();
            if !active {
                debug!(
                    "t={time}: pulse from {} expired ({} past start, offset {})",
                    pulse.start_time(),
                    pulse.last_relative_time(),
                    pulse.expiry_offset()
                );
            }
            active
        });
        Ok(())
    }
}
