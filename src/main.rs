// src/main.rs
mod analysis;
mod config;
mod error;
mod gui;
mod pulse;
mod recorder;
mod types;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;

use analysis::{
    render_report_png, render_spectrum_png, render_waveform_png, AnalysisPipeline, PlotStyle,
    PulseTrainSource,
};
use config::Args;
use pulse::PulseTrain;
use recorder::RunSummary;

// 入口函数
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.resolve().context("invalid configuration")?;

    // 1. 排布脉冲
    let mut train = PulseTrain::new(config.train.period, config.train.total_samples)?;
    train.schedule(&config.shape)?;
    info!(
        "{} pulses every {} samples, offset {}",
        train.pulses_count(),
        train.period(),
        train.centering_offset()
    );

    // 2. 逐秒采样，然后做 FFT
    let mut pipeline =
        AnalysisPipeline::new(PulseTrainSource::new(train, args.batch), "pulse train");
    let frame = pipeline.run().context("sampling the pulse train")?.clone();
    let spectrum = pipeline.latest_spectrum().context("computing the spectrum")?;
    info!(
        "{} frequency bins, dominant {:?}",
        spectrum.len(),
        spectrum.dominant_frequency()
    );
    let title = config.title();

    // 3. 输出
    let style = PlotStyle {
        width: args.width,
        height: args.height,
        ..PlotStyle::default()
    };
    if !args.no_png {
        let png = render_report_png(&frame, &spectrum, &title, &style)?;
        write_image(&args.png, png)?;
    }
    if let Some(path) = &args.waveform_png {
        write_image(path, render_waveform_png(&frame, &title, &style)?)?;
    }
    if let Some(path) = &args.spectrum_png {
        write_image(path, render_spectrum_png(&spectrum, &style)?)?;
    }
    if let Some(path) = &args.signal_csv {
        recorder::save_to(path, |w| recorder::write_signal_csv(w, &frame).map(drop))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.spectrum_csv {
        recorder::save_to(path, |w| recorder::write_spectrum_csv(w, &spectrum).map(drop))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.summary {
        let summary = RunSummary::new(config, pipeline.source().train(), &frame, &spectrum);
        recorder::save_to(path, |w| recorder::write_summary_json(w, &summary).map(drop))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if args.show {
        gui::run_viewer(title, &frame, &spectrum)?;
    }
    Ok(())
}

fn write_image(path: &Path, png: Vec<u8>) -> anyhow::Result<()> {
    std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
    info!("image written to {}", path.display());
    Ok(())
}
