// src/gui.rs
// 交互式查看窗口：上方时域波形，下方 FFT（实部 / 虚部 / 幅值）
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};

use crate::analysis::{FrequencySpectrum, TimeSeriesFrame};

pub struct PulseViewerApp {
    title: String,
    signal: Vec<[f64; 2]>,
    real: Vec<[f64; 2]>,
    imag: Vec<[f64; 2]>,
    magnitude: Vec<[f64; 2]>,
    show_parts: bool,
}

impl PulseViewerApp {
    pub fn new(title: String, frame: &TimeSeriesFrame, spectrum: &FrequencySpectrum) -> Self {
        let signal = frame
            .times
            .iter()
            .zip(&frame.samples)
            .map(|(t, v)| [*t, *v])
            .collect();
        let bins = spectrum.sorted_by_frequency();
        Self {
            title,
            signal,
            real: bins.iter().map(|(f, c)| [*f, c.re]).collect(),
            imag: bins.iter().map(|(f, c)| [*f, c.im]).collect(),
            magnitude: bins.iter().map(|(f, c)| [*f, c.norm()]).collect(),
            show_parts: true,
        }
    }
}

impl eframe::App for PulseViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.title);
                ui.checkbox(&mut self.show_parts, "real / imag");
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            // 与 PNG 报告一致：时域 : 频域 = 1 : 6
            let signal_height = ui.available_height() / 7.0;
            Plot::new("signal_plot")
                .height(signal_height)
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(PlotPoints::new(self.signal.clone()))
                            .name("signal")
                            .color(Color32::from_rgb(0, 255, 255)),
                    );
                });
            Plot::new("fft_plot")
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    if self.show_parts {
                        plot_ui.line(
                            Line::new(PlotPoints::new(self.real.clone()))
                                .name("real")
                                .style(LineStyle::dotted_dense())
                                .color(Color32::RED),
                        );
                        plot_ui.line(
                            Line::new(PlotPoints::new(self.imag.clone()))
                                .name("imag")
                                .style(LineStyle::dotted_dense())
                                .color(Color32::GREEN),
                        );
                    }
                    plot_ui.line(
                        Line::new(PlotPoints::new(self.magnitude.clone()))
                            .name("magn")
                            .color(Color32::YELLOW),
                    );
                });
        });
    }
}

pub fn run_viewer(
    title: String,
    frame: &TimeSeriesFrame,
    spectrum: &FrequencySpectrum,
) -> anyhow::Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 800.0])
        .with_title(title.clone());
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let app = PulseViewerApp::new(title, frame, spectrum);
    eframe::run_native("pulse-synth", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
