// src/analysis/mod.rs
// 采样、频谱与绘图：脉冲序列之外的协作模块
pub mod fft;
pub mod frame;
pub mod pipeline;
pub mod plot;
pub mod source;
// 公开导出这些模块里的结构体，方便外部调用
pub use crate::error::SynthError;
pub use fft::{FrequencySpectrum, SpectrumBuilder};
pub use frame::TimeSeriesFrame;
pub use pipeline::AnalysisPipeline;
pub use plot::{render_report_png, render_spectrum_png, render_waveform_png, PlotStyle};
pub use source::{PulseTrainSource, SignalBatch, SignalSource};
