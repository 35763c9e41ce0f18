// src/config.rs
// 命令行参数 + 可选 JSON 配置文件，合并为 SimulationConfig
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;

use crate::error::SynthError;
use crate::types::{ExpiryPolicy, SimulationConfig};

/// Synthesize a train of smoothed trapezoidal pulses and analyse its spectrum.
#[derive(Debug, Parser)]
#[command(name = "pulse-synth", version)]
pub struct Args {
    /// Samples between successive pulse starts [default: 25]
    #[arg(long, allow_negative_numbers = true)]
    pub period: Option<i64>,
    /// Number of 1 Hz samples to evaluate [default: 512]
    #[arg(long, allow_negative_numbers = true)]
    pub seconds: Option<i64>,
    /// Low (floor) value of each pulse [default: 0.0]
    #[arg(long, allow_negative_numbers = true)]
    pub lo: Option<f64>,
    /// High (ceiling) value of each pulse [default: 100.0]
    #[arg(long, allow_negative_numbers = true)]
    pub hi: Option<f64>,
    /// Pulse duration including both ramps [default: 20.0]
    #[arg(long, allow_negative_numbers = true)]
    pub dur: Option<f64>,
    /// Duration of each ramp [default: 3.0]
    #[arg(long, allow_negative_numbers = true)]
    pub ramp: Option<f64>,
    /// Moving-average window, in samples [default: 6]
    #[arg(long, allow_negative_numbers = true)]
    pub nsmooth: Option<i64>,
    /// How long an ended pulse lingers before it is dropped [default: smoothing-settle]
    #[arg(long, value_enum)]
    pub expiry: Option<ExpiryPolicy>,
    /// JSON file with any of the options above; command-line values win
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where to write the time/frequency report image
    #[arg(long, default_value = "pulse_train.png")]
    pub png: PathBuf,
    /// Skip the report image
    #[arg(long)]
    pub no_png: bool,
    /// Also write the time series alone to this image
    #[arg(long)]
    pub waveform_png: Option<PathBuf>,
    /// Also write the spectrum alone to this image
    #[arg(long)]
    pub spectrum_png: Option<PathBuf>,
    /// Write `time,value` rows
    #[arg(long)]
    pub signal_csv: Option<PathBuf>,
    /// Write `frequency,real,imag,magnitude` rows
    #[arg(long)]
    pub spectrum_csv: Option<PathBuf>,
    /// Write a JSON summary of the run
    #[arg(long)]
    pub summary: Option<PathBuf>,
    /// Open an interactive viewer window
    #[arg(long)]
    pub show: bool,
    #[arg(long, default_value_t = 900)]
    pub width: u32,
    #[arg(long, default_value_t = 700)]
    pub height: u32,
    /// Samples evaluated per batch
    #[arg(long, default_value_t = 256)]
    pub batch: usize,
}
impl Args {
    /// Defaults, then the config file, then command-line overrides; validated once.
    pub fn resolve(&self) -> Result<SimulationConfig, SynthError> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => SimulationConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        debug!("resolved configuration: {config:?}");
        Ok(config)
    }
    fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(period) = self.period {
            config.train.period = period;
        }
        if let Some(seconds) = self.seconds {
            config.train.total_samples = seconds;
        }
        let shape = &mut config.shape;
        if let Some(lo) = self.lo {
            shape.low = lo;
        }
        if let Some(hi) = self.hi {
            shape.high = hi;
        }
        if let Some(dur) = self.dur {
            shape.duration = dur;
        }
        if let Some(ramp) = self.ramp {
            shape.ramp_duration = ramp;
        }
        if let Some(nsmooth) = self.nsmooth {
            shape.smoothing_window = nsmooth;
        }
        if let Some(expiry) = self.expiry {
            shape.expiry = expiry;
        }
    }
}
pub fn load_config_file(path: &Path) -> Result<SimulationConfig, SynthError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| SynthError::Config(format!("{}: {e}", path.display())))
}
#[cfg(test)]
mod tests {
    use super::*;
    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pulse-synth").chain(args.iter().copied()))
            .unwrap()
    }
    #[test]
    fn defaults_without_options() {
        let args = parse(&[]);
        assert_eq!(args.resolve().unwrap(), SimulationConfig::default());
        assert_eq!(args.png, PathBuf::from("pulse_train.png"));
        assert!(!args.show);
        assert!(args.waveform_png.is_none() && args.spectrum_png.is_none());
    }
    #[test]
    fn separate_images_are_optional_paths() {
        let args = parse(&["--waveform-png", "wave.png", "--spectrum-png=fft.png", "--no-png"]);
        assert_eq!(args.waveform_png, Some(PathBuf::from("wave.png")));
        assert_eq!(args.spectrum_png, Some(PathBuf::from("fft.png")));
        assert!(args.no_png);
    }
    #[test]
    fn accepts_equals_and_space_forms() {
        let args = parse(&[
            "--period=30",
            "--seconds",
            "100",
            "--hi=50",
            "--expiry=ramp-settle",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.train.period, 30);
        assert_eq!(config.train.total_samples, 100);
        assert_eq!(config.shape.high, 50.0);
        assert_eq!(config.shape.expiry, ExpiryPolicy::RampSettle);
    }
    #[test]
    fn non_positive_values_are_configuration_errors() {
        let args = parse(&["--nsmooth=-2"]);
        assert!(matches!(
            args.resolve(),
            Err(SynthError::InvalidSmoothingWindow(-2))
        ));
        let args = parse(&["--period", "0"]);
        assert!(matches!(args.resolve(), Err(SynthError::InvalidPeriod(0))));
    }
    #[test]
    fn command_line_overrides_config_file() {
        let path =
            std::env::temp_dir().join(format!("pulse-synth-{}.json", std::process::id()));
        fs::write(&path, r#"{"period": 40, "seconds": 400, "dur": 30.0}"#).unwrap();
        let args = parse(&["--config", path.to_str().unwrap(), "--seconds=200"]);
        let config = args.resolve().unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.train.period, 40);
        assert_eq!(config.train.total_samples, 200);
        assert_eq!(config.shape.duration, 30.0);
        assert_eq!(config.shape.ramp_duration, 3.0);
    }
    #[test]
    fn malformed_config_file_is_reported() {
        let path =
            std::env::temp_dir().join(format!("pulse-synth-bad-{}.json", std::process::id()));
        fs::write(&path, "{ period: ").unwrap();
        let result = load_config_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SynthError::Config(_))));
        assert!(matches!(
            load_config_file(Path::new("/nonexistent/pulse-synth.json")),
            Err(SynthError::Io(_))
        ));
    }
}
