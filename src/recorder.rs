// src/recorder.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::analysis::{FrequencySpectrum, TimeSeriesFrame};
use crate::error::SynthError;
use crate::pulse::PulseTrain;
use crate::types::SimulationConfig;

// CSV 写入器：表头 + 每行一组数值
pub struct CsvRecorder<W: Write> {
    writer: W,
    columns: usize,
}
impl<W: Write> CsvRecorder<W> {
    pub fn new(mut writer: W, header: &[&str]) -> Result<Self, SynthError> {
        writeln!(writer, "{}", header.join(","))?;
        Ok(Self {
            writer,
            columns: header.len(),
        })
    }
    pub fn write_record(&mut self, values: &[f64]) -> Result<(), SynthError> {
        if values.len() != self.columns {
            return Err(SynthError::Config(format!(
                "csv row has {} values, header has {}",
                values.len(),
                self.columns
            )));
        }
        let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        writeln!(self.writer, "{}", row.join(","))?;
        Ok(())
    }
    pub fn finish(mut self) -> Result<W, SynthError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
pub fn write_signal_csv<W: Write>(writer: W, frame: &TimeSeriesFrame) -> Result<W, SynthError> {
    let mut csv = CsvRecorder::new(writer, &["time", "value"])?;
    for (t, v) in frame.times.iter().zip(&frame.samples) {
        csv.write_record(&[*t, *v])?;
    }
    csv.finish()
}
pub fn write_spectrum_csv<W: Write>(
    writer: W,
    spectrum: &FrequencySpectrum,
) -> Result<W, SynthError> {
    let mut csv = CsvRecorder::new(writer, &["frequency", "real", "imag", "magnitude"])?;
    let (real, imag, magnitudes) = (spectrum.real(), spectrum.imag(), spectrum.magnitudes());
    let rows = spectrum.frequencies.iter().zip(real).zip(imag).zip(magnitudes);
    for (((f, re), im), magnitude) in rows {
        csv.write_record(&[*f, re, im, magnitude])?;
    }
    csv.finish()
}
/// Everything worth keeping about one run besides the raw samples.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub config: SimulationConfig,
    pub pulses_count: usize,
    pub centering_offset: f64,
    pub start_times: Vec<f64>,
    /// Pulses not yet expired when sampling stopped.
    pub active_pulses: usize,
    pub samples: usize,
    pub sample_rate_hz: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub dominant_frequency: Option<f64>,
}
impl RunSummary {
    pub fn new(
        config: SimulationConfig,
        train: &PulseTrain,
        frame: &TimeSeriesFrame,
        spectrum: &FrequencySpectrum,
    ) -> Self {
        let bounds = frame.bounds();
        Self {
            config,
            pulses_count: train.pulses_count(),
            centering_offset: train.centering_offset(),
            start_times: train.start_times().to_vec(),
            active_pulses: train.active_count(),
            samples: frame.len(),
            sample_rate_hz: spectrum.sample_rate_hz,
            min: bounds.map(|b| b.0),
            max: bounds.map(|b| b.1),
            mean: frame.mean(),
            dominant_frequency: spectrum.dominant_frequency(),
        }
    }
}
/// Creates `path` and hands a buffered writer to `write`.
pub fn save_to<T>(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<T, SynthError>,
) -> Result<T, SynthError> {
    let file = File::create(path)?;
    let out = write(BufWriter::new(file))?;
    info!("wrote {}", path.display());
    Ok(out)
}
pub fn write_summary_json<W: Write>(mut writer: W, summary: &RunSummary) -> Result<W, SynthError> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(writer)
}
