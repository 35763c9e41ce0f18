// src/types.rs
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, SynthError};

// 脉冲过期策略：脉冲名义结束后还要保留多久（让平滑滤波器衰减回 low）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryPolicy {
    /// `duration + smoothing_window + 1`
    #[default]
    SmoothingSettle,
    /// `duration + 3 * ramp_duration`
    RampSettle,
}
impl ExpiryPolicy {
    pub fn expiry_offset(self, duration: f64, ramp_duration: f64, smoothing_window: usize) -> f64 {
        match self {
            ExpiryPolicy::SmoothingSettle => duration + smoothing_window as f64 + 1.0,
            ExpiryPolicy::RampSettle => duration + 3.0 * ramp_duration,
        }
    }
}

// 单个梯形脉冲的形状参数
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseShape {
    #[serde(alias = "lo")]
    pub low: f64,
    #[serde(alias = "hi")]
    pub high: f64,
    /// Total span including both ramps.
    #[serde(alias = "dur")]
    pub duration: f64,
    /// Length of each ramp.
    #[serde(alias = "ramp")]
    pub ramp_duration: f64,
    /// Number of raw samples in the moving average.
    #[serde(alias = "nsmooth")]
    pub smoothing_window: i64,
    pub expiry: ExpiryPolicy,
}
impl Default for PulseShape {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 100.0,
            duration: 20.0,
            ramp_duration: 3.0,
            smoothing_window: 6,
            expiry: ExpiryPolicy::default(),
        }
    }
}
impl PulseShape {
    /// Checks every field and returns the smoothing window as a sample count.
    pub fn validate(&self) -> Result<usize, SynthError> {
        ensure_finite("low", self.low)?;
        ensure_finite("high", self.high)?;
        for (name, value) in [
            ("duration", self.duration),
            ("ramp_duration", self.ramp_duration),
        ] {
            if ensure_finite(name, value)? < 0.0 {
                return Err(SynthError::NegativeSpan { name, value });
            }
        }
        if self.smoothing_window <= 0 {
            return Err(SynthError::InvalidSmoothingWindow(self.smoothing_window));
        }
        usize::try_from(self.smoothing_window)
            .map_err(|_| SynthError::InvalidSmoothingWindow(self.smoothing_window))
    }
}

// 脉冲序列的排布参数
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Spacing between successive pulse starts, in samples.
    pub period: i64,
    /// Number of 1 Hz samples to evaluate.
    #[serde(alias = "seconds")]
    pub total_samples: i64,
}
impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            period: 25,
            total_samples: 512,
        }
    }
}
impl TrainConfig {
    /// Returns `(period, total_samples)` once both are known to be positive.
    pub fn validate(&self) -> Result<(usize, usize), SynthError> {
        let period = usize::try_from(self.period)
            .ok()
            .filter(|p| *p > 0)
            .ok_or(SynthError::InvalidPeriod(self.period))?;
        let total_samples = usize::try_from(self.total_samples)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(SynthError::InvalidHorizon(self.total_samples))?;
        Ok((period, total_samples))
    }
}

// 一次完整仿真的配置
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub train: TrainConfig,
    #[serde(flatten)]
    pub shape: PulseShape,
}
impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        self.train.validate()?;
        self.shape.validate()?;
        Ok(())
    }
    pub fn title(&self) -> String {
        format!(
            "Samples={}s; PulseDuration={}s; Period={}s; Ramp={}s; NSmooth={}",
            self.train.total_samples,
            self.shape.duration,
            self.train.period,
            self.shape.ramp_duration,
            self.shape.smoothing_window
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_match_documented_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.train.period, 25);
        assert_eq!(config.train.total_samples, 512);
        assert_eq!(config.shape.low, 0.0);
        assert_eq!(config.shape.high, 100.0);
        assert_eq!(config.shape.duration, 20.0);
        assert_eq!(config.shape.ramp_duration, 3.0);
        assert_eq!(config.shape.smoothing_window, 6);
        assert_eq!(config.shape.expiry, ExpiryPolicy::SmoothingSettle);
        assert!(config.validate().is_ok());
    }
    #[test]
    fn expiry_policies_differ() {
        assert_eq!(ExpiryPolicy::SmoothingSettle.expiry_offset(20.0, 3.0, 6), 27.0);
        assert_eq!(ExpiryPolicy::RampSettle.expiry_offset(20.0, 3.0, 6), 29.0);
    }
    #[test]
    fn rejects_bad_shapes() {
        let shape = PulseShape {
            smoothing_window: 0,
            ..PulseShape::default()
        };
        assert!(matches!(
            shape.validate(),
            Err(SynthError::InvalidSmoothingWindow(0))
        ));
        let shape = PulseShape {
            high: f64::NAN,
            ..PulseShape::default()
        };
        assert!(matches!(
            shape.validate(),
            Err(SynthError::NonFinite { name: "high", .. })
        ));
        let shape = PulseShape {
            ramp_duration: -1.0,
            ..PulseShape::default()
        };
        assert!(matches!(
            shape.validate(),
            Err(SynthError::NegativeSpan {
                name: "ramp_duration",
                ..
            })
        ));
    }
    #[test]
    fn rejects_non_positive_train() {
        let train = TrainConfig {
            period: 0,
            total_samples: 100,
        };
        assert!(matches!(train.validate(), Err(SynthError::InvalidPeriod(0))));
        let train = TrainConfig {
            period: 25,
            total_samples: -4,
        };
        assert!(matches!(train.validate(), Err(SynthError::InvalidHorizon(-4))));
    }
    #[test]
    fn json_accepts_short_option_names() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"seconds": 100, "nsmooth": 4, "hi": 50.0}"#).unwrap();
        assert_eq!(config.train.total_samples, 100);
        assert_eq!(config.train.period, 25);
        assert_eq!(config.shape.smoothing_window, 4);
        assert_eq!(config.shape.high, 50.0);
        assert_eq!(config.shape.low, 0.0);
    }
}
