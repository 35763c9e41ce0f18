use rustfft::{num_complex::Complex64, FftPlanner};

use crate::analysis::{SynthError, TimeSeriesFrame};
/// Complex spectrum of one signal, in standard DFT bin order.
#[derive(Clone, Debug)]
pub struct FrequencySpectrum {
    pub sample_rate_hz: f64,
    pub frequencies: Vec<f64>,
    pub coefficients: Vec<Complex64>,
}
impl FrequencySpectrum {
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
    pub fn magnitudes(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.norm()).collect()
    }
    pub fn real(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.re).collect()
    }
    pub fn imag(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.im).collect()
    }
    /// Bins reordered by ascending frequency, ready for plotting.
    pub fn sorted_by_frequency(&self) -> Vec<(f64, Complex64)> {
        let mut bins: Vec<(f64, Complex64)> = self
            .frequencies
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
            .collect();
        bins.sort_by(|a, b| a.0.total_cmp(&b.0));
        bins
    }
    /// Positive frequency with the largest magnitude.
    pub fn dominant_frequency(&self) -> Option<f64> {
        self.frequencies
            .iter()
            .zip(&self.coefficients)
            .filter(|(f, _)| **f > 0.0)
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(f, _)| *f)
    }
}
/// Sample frequencies of an `n`-point DFT: `0, 1, .., -n/2, .., -1` scaled by `rate / n`.
pub fn frequency_bins(n: usize, sample_rate_hz: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let spacing = 1.0 / sample_rate_hz;
    let scale = 1.0 / (n as f64 * spacing);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * scale
        })
        .collect()
}
/// Helper that computes the FFT of a whole frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpectrumBuilder;
impl SpectrumBuilder {
    /// Transforms every sample of the frame, without padding or windowing.
    pub fn full() -> Self {
        Self
    }
    pub fn compute(&self, frame: &TimeSeriesFrame) -> Result<FrequencySpectrum, SynthError> {
        if frame.is_empty() {
            return Err(SynthError::EmptySignal);
        }
        let fft_size = frame.len();
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let mut buffer: Vec<Complex64> = frame
            .samples
            .iter()
            .map(|v| Complex64::new(*v, 0.0))
            .collect();
        fft.process(&mut buffer);
        Ok(FrequencySpectrum {
            sample_rate_hz: frame.sample_rate_hz,
            frequencies: frequency_bins(fft_size, frame.sample_rate_hz),
            coefficients: buffer,
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SignalBatch;
    use std::f64::consts::PI;
    fn frame_of(samples: Vec<f64>) -> TimeSeriesFrame {
        let mut frame = TimeSeriesFrame::new("test", 1.0);
        frame
            .push_batch(&SignalBatch::new(0.0, 1.0, samples))
            .unwrap();
        frame
    }
    #[test]
    fn bins_follow_dft_order() {
        assert_eq!(
            frequency_bins(8, 1.0),
            vec![0.0, 0.125, 0.25, 0.375, -0.5, -0.375, -0.25, -0.125]
        );
        assert_eq!(frequency_bins(5, 1.0), vec![0.0, 0.2, 0.4, -0.4, -0.2]);
        assert_eq!(frequency_bins(4, 8.0), vec![0.0, 2.0, -4.0, -2.0]);
        assert!(frequency_bins(0, 1.0).is_empty());
    }
    #[test]
    fn constant_signal_has_only_dc() {
        let spectrum = SpectrumBuilder::full()
            .compute(&frame_of(vec![2.0; 16]))
            .unwrap();
        assert_eq!(spectrum.len(), 16);
        assert!((spectrum.coefficients[0].re - 32.0).abs() < 1e-9);
        for c in &spectrum.coefficients[1..] {
            assert!(c.norm() < 1e-9);
        }
    }
    #[test]
    fn finds_dominant_sine() {
        let n = 64;
        let samples = (0..n)
            .map(|i| (2.0 * PI * 5.0 * i as f64 / n as f64).sin())
            .collect();
        let spectrum = SpectrumBuilder::full().compute(&frame_of(samples)).unwrap();
        assert_eq!(spectrum.dominant_frequency(), Some(5.0 / 64.0));
        let sorted = spectrum.sorted_by_frequency();
        assert_eq!(sorted.first().map(|b| b.0), Some(-0.5));
        assert!(sorted.windows(2).all(|w| w[0].0 <= w[1].0));
    }
    #[test]
    fn parts_follow_coefficients_and_empty_is_rejected() {
        let spectrum = SpectrumBuilder::full()
            .compute(&frame_of(vec![1.0, 0.0, -1.0, 0.0]))
            .unwrap();
        assert_eq!(spectrum.sample_rate_hz, 1.0);
        assert_eq!(spectrum.real(), vec![0.0, 2.0, 0.0, 2.0]);
        assert_eq!(spectrum.imag(), vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(spectrum.magnitudes(), vec![0.0, 2.0, 0.0, 2.0]);
        assert!(matches!(
            SpectrumBuilder::full().compute(&TimeSeriesFrame::new("empty", 1.0)),
            Err(SynthError::EmptySignal)
        ));
    }
}
