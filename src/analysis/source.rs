use crate::analysis::SynthError;
use crate::pulse::PulseTrain;
/// Contiguous run of uniformly spaced samples.
#[derive(Clone, Debug)]
pub struct SignalBatch {
    /// Time of the first sample, in seconds.
    pub start_time: f64,
    pub sample_rate_hz: f64,
    pub samples: Vec<f64>,
}
impl SignalBatch {
    pub fn new(start_time: f64, sample_rate_hz: f64, samples: Vec<f64>) -> Self {
        Self {
            start_time,
            sample_rate_hz,
            samples,
        }
    }
    pub fn validate(&self) -> Result<(), SynthError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(SynthError::InvalidSampleRate(self.sample_rate_hz));
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    /// Timestamp of every sample in the batch.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        let dt = 1.0 / self.sample_rate_hz;
        (0..self.samples.len()).map(move |i| self.start_time + i as f64 * dt)
    }
}
/// Trait representing something that can yield signal batches on demand.
pub trait SignalSource {
    fn next_batch(&mut self) -> Result<Option<SignalBatch>, SynthError>;
}
/// In-memory source for deterministic playback in tests.
#[cfg(test)]
pub struct ManualSource {
    queue: std::collections::VecDeque<SignalBatch>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new(batches: impl IntoIterator<Item = SignalBatch>) -> Self {
        Self {
            queue: batches.into_iter().collect(),
        }
    }
}
#[cfg(test)]
impl SignalSource for ManualSource {
    fn next_batch(&mut self) -> Result<Option<SignalBatch>, SynthError> {
        Ok(self.queue.pop_front())
    }
}
/// Samples a scheduled [`PulseTrain`] once per second over its whole horizon.
pub struct PulseTrainSource {
    train: PulseTrain,
    next_step: usize,
    batch_len: usize,
}
impl PulseTrainSource {
    pub fn new(train: PulseTrain, batch_len: usize) -> Self {
        Self {
            train,
            next_step: 0,
            batch_len: batch_len.max(1),
        }
    }
    pub fn train(&self) -> &PulseTrain {
        &self.train
    }
}
impl SignalSource for PulseTrainSource {
    fn next_batch(&mut self) -> Result<Option<SignalBatch>, SynthError> {
        let total = self.train.total_samples();
        if self.next_step >= total {
            return Ok(None);
        }
        let end = (self.next_step + self.batch_len).min(total);
        let samples = (self.next_step..end)
            .map(|t| self.train.value_at(Some(t as f64)))
            .collect::<Result<Vec<_>, _>>()?;
        let batch = SignalBatch::new(self.next_step as f64, 1.0, samples);
        self.next_step = end;
        Ok(Some(batch))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PulseShape;
    #[test]
    fn train_source_covers_horizon_in_batches() {
        let mut train = PulseTrain::new(25, 100).unwrap();
        train.schedule(&PulseShape::default()).unwrap();
        let mut source = PulseTrainSource::new(train, 32);
        let mut lengths = Vec::new();
        let mut starts = Vec::new();
        while let Some(batch) = source.next_batch().unwrap() {
            starts.push(batch.start_time);
            lengths.push(batch.len());
        }
        assert_eq!(lengths, vec![32, 32, 32, 4]);
        assert_eq!(starts, vec![0.0, 32.0, 64.0, 96.0]);
        assert!(source.next_batch().unwrap().is_none());
    }
    #[test]
    fn unscheduled_train_surfaces_error() {
        let train = PulseTrain::new(25, 100).unwrap();
        let mut source = PulseTrainSource::new(train, 16);
        assert!(matches!(
            source.next_batch(),
            Err(SynthError::NotScheduled)
        ));
    }
    #[test]
    fn batch_times_follow_sample_rate() {
        let batch = SignalBatch::new(2.0, 4.0, vec![0.0; 3]);
        assert_eq!(batch.times().collect::<Vec<_>>(), vec![2.0, 2.25, 2.5]);
        assert!(SignalBatch::new(0.0, 0.0, vec![]).validate().is_err());
    }
}
