use log::{debug, info};

use crate::analysis::{
    FrequencySpectrum, SignalSource, SpectrumBuilder, SynthError, TimeSeriesFrame,
};
/// Drains a source into one frame and exposes its spectrum.
pub struct AnalysisPipeline<S: SignalSource> {
    source: S,
    label: String,
    frame: Option<TimeSeriesFrame>,
}
impl<S: SignalSource> AnalysisPipeline<S> {
    pub fn new(source: S, label: impl Into<String>) -> Self {
        Self {
            source,
            label: label.into(),
            frame: None,
        }
    }
    pub fn source(&self) -> &S {
        &self.source
    }
    /// Pulls one batch; returns the number of samples added, or `None` once drained.
    pub fn pump_once(&mut self) -> Result<Option<usize>, SynthError> {
        let Some(batch) = self.source.next_batch()? else {
            return Ok(None);
        };
        batch.validate()?;
        let label = &self.label;
        let frame = self
            .frame
            .get_or_insert_with(|| TimeSeriesFrame::new(label.clone(), batch.sample_rate_hz));
        frame.push_batch(&batch)?;
        debug!("appended {} samples at t={}", batch.len(), batch.start_time);
        Ok(Some(batch.len()))
    }
    /// Pumps until the source is exhausted.
    pub fn run(&mut self) -> Result<&TimeSeriesFrame, SynthError> {
        while self.pump_once()?.is_some() {}
        let frame = self.latest_frame()?;
        info!(
            "collected {} samples over {}s",
            frame.len(),
            frame.duration_seconds()
        );
        Ok(frame)
    }
    pub fn latest_frame(&self) -> Result<&TimeSeriesFrame, SynthError> {
        self.frame.as_ref().ok_or(SynthError::EmptySignal)
    }
    pub fn latest_spectrum(&self) -> Result<FrequencySpectrum, SynthError> {
        SpectrumBuilder::full().compute(self.latest_frame()?)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::source::{ManualSource, PulseTrainSource, SignalBatch};
    use crate::analysis::plot::{
        render_report_png, render_spectrum_png, render_waveform_png, PlotStyle,
    };
    use crate::pulse::PulseTrain;
    use crate::types::PulseShape;
    fn default_pipeline(total_samples: i64) -> AnalysisPipeline<PulseTrainSource> {
        let mut train = PulseTrain::new(25, total_samples).unwrap();
        train.schedule(&PulseShape::default()).unwrap();
        AnalysisPipeline::new(PulseTrainSource::new(train, 64), "pulse train")
    }
    #[test]
    fn pipeline_samples_train_and_computes_fft() {
        let mut pipeline = default_pipeline(100);
        let frame = pipeline.run().unwrap();
        assert_eq!(frame.len(), 100);
        assert_eq!(frame.times[99], 99.0);
        assert_eq!(frame.samples[0], 0.0);
        let peak = frame.bounds().unwrap().1;
        assert_eq!(peak, 100.0);
        let spectrum = pipeline.latest_spectrum().unwrap();
        assert_eq!(spectrum.len(), 100);
        assert_eq!(spectrum.frequencies.len(), 100);
        // one pulse every 25 samples
        assert_eq!(spectrum.dominant_frequency(), Some(0.04));
    }
    #[test]
    fn manual_source_rejects_rate_change() {
        let source = ManualSource::new(vec![
            SignalBatch::new(0.0, 1.0, vec![0.0; 4]),
            SignalBatch::new(4.0, 2.0, vec![0.0; 4]),
        ]);
        let mut pipeline = AnalysisPipeline::new(source, "manual");
        assert_eq!(pipeline.pump_once().unwrap(), Some(4));
        assert!(matches!(
            pipeline.pump_once(),
            Err(SynthError::SampleRateMismatch { .. })
        ));
    }
    #[test]
    fn empty_source_has_no_frame() {
        let source = ManualSource::new(Vec::<SignalBatch>::new());
        let mut pipeline = AnalysisPipeline::new(source, "none");
        assert!(matches!(pipeline.run(), Err(SynthError::EmptySignal)));
        assert!(pipeline.latest_spectrum().is_err());
    }
    #[test]
    fn plotting_helpers_return_png() {
        let mut pipeline = default_pipeline(64);
        let frame = pipeline.run().unwrap().clone();
        let spectrum = pipeline.latest_spectrum().unwrap();
        let png_wave = render_waveform_png(&frame, "wave", &PlotStyle::default()).unwrap();
        let png_fft = render_spectrum_png(&spectrum, &PlotStyle::default()).unwrap();
        let png_report =
            render_report_png(&frame, &spectrum, "report", &PlotStyle::default()).unwrap();
        for png in [png_wave, png_fft, png_report] {
            assert_eq!(&png[1..4], b"PNG");
        }
    }
}
