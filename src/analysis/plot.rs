use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::LineSeries;
use plotters::prelude::*;

use crate::analysis::fft::FrequencySpectrum;
use crate::analysis::{SynthError, TimeSeriesFrame};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    /// Signal, real part, imaginary part, magnitude.
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 700,
            background: RGBColor(10, 10, 10),
            palette: vec![CYAN, RED, GREEN, YELLOW],
        }
    }
}
impl PlotStyle {
    fn color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            WHITE
        } else {
            self.palette[idx % self.palette.len()]
        }
    }
}
pub fn render_waveform_png(
    frame: &TimeSeriesFrame,
    title: &str,
    style: &PlotStyle,
) -> Result<Vec<u8>, SynthError> {
    ensure_frame(frame)?;
    let mut buffer = pixel_buffer(style);
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        draw_waveform(&root, frame, title, style)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
pub fn render_spectrum_png(
    spectrum: &FrequencySpectrum,
    style: &PlotStyle,
) -> Result<Vec<u8>, SynthError> {
    ensure_spectrum(spectrum)?;
    let mut buffer = pixel_buffer(style);
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        draw_spectrum(&root, spectrum, style)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Time series on top, spectrum below, at a 1:6 height ratio.
pub fn render_report_png(
    frame: &TimeSeriesFrame,
    spectrum: &FrequencySpectrum,
    title: &str,
    style: &PlotStyle,
) -> Result<Vec<u8>, SynthError> {
    ensure_frame(frame)?;
    ensure_spectrum(spectrum)?;
    let mut buffer = pixel_buffer(style);
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (upper, lower) = root.split_vertically(signal_panel_height(style.height));
        draw_waveform(&upper, frame, title, style)?;
        draw_spectrum(&lower, spectrum, style)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
// RGB8, widened before multiplying so large canvases cannot wrap in u32
fn pixel_buffer(style: &PlotStyle) -> Vec<u8> {
    vec![0u8; style.width as usize * style.height as usize * 3]
}
/// Height of the time-series panel: one seventh of the canvas, the rest goes to the FFT.
fn signal_panel_height(height: u32) -> u32 {
    (height / 7).max(1)
}
fn ensure_frame(frame: &TimeSeriesFrame) -> Result<(), SynthError> {
    if frame.is_empty() {
        return Err(SynthError::Plot("time-series frame has no samples".into()));
    }
    Ok(())
}
fn ensure_spectrum(spectrum: &FrequencySpectrum) -> Result<(), SynthError> {
    if spectrum.is_empty() {
        return Err(SynthError::Plot("spectrum has no coefficients".into()));
    }
    Ok(())
}
// Pads a degenerate or tight range so the axis never collapses.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}
fn draw_waveform(
    area: &Area<'_>,
    frame: &TimeSeriesFrame,
    title: &str,
    style: &PlotStyle,
) -> Result<(), SynthError> {
    let (y_min, y_max) = frame
        .bounds()
        .map(|(lo, hi)| padded(lo, hi))
        .unwrap_or((-1.0, 1.0));
    let x_max = frame.times.last().copied().unwrap_or(0.0).max(1.0);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, ("sans-serif", 18).into_font().color(&WHITE))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .light_line_style(&WHITE.mix(0.1))
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .x_desc("time")
        .y_desc("value")
        .draw()?;
    let color = style.color(0);
    let series = frame
        .times
        .iter()
        .copied()
        .zip(frame.samples.iter().copied());
    chart
        .draw_series(LineSeries::new(series, &color))?
        .label(frame.label.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    Ok(())
}
fn draw_spectrum(
    area: &Area<'_>,
    spectrum: &FrequencySpectrum,
    style: &PlotStyle,
) -> Result<(), SynthError> {
    let bins = spectrum.sorted_by_frequency();
    let (x_min, x_max) = padded(
        bins.first().map(|b| b.0).unwrap_or(0.0),
        bins.last().map(|b| b.0).unwrap_or(0.0),
    );
    let (lo, hi) = bins.iter().fold((0.0f64, 0.0f64), |(lo, hi), (_, c)| {
        (lo.min(c.re).min(c.im), hi.max(c.re).max(c.im).max(c.norm()))
    });
    let (y_min, y_max) = padded(lo, hi);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption("FFT", ("sans-serif", 18).into_font().color(&WHITE))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .light_line_style(&WHITE.mix(0.1))
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .x_desc("frequency")
        .y_desc("FFT value")
        .draw()?;
    // real and imaginary parts are drawn faint so the magnitude stands out
    let parts: [(&str, RGBAColor, fn(&rustfft::num_complex::Complex64) -> f64); 2] = [
        ("real", style.color(1).mix(0.6), |c| c.re),
        ("imag", style.color(2).mix(0.6), |c| c.im),
    ];
    for (name, color, project) in parts {
        let series = bins.iter().map(move |(f, c)| (*f, project(c)));
        chart
            .draw_series(LineSeries::new(series, &color))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    let magnitude = style.color(3);
    let series = bins.iter().map(|(f, c)| (*f, c.norm()));
    chart
        .draw_series(LineSeries::new(series, magnitude.stroke_width(2)))?
        .label("magn")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &magnitude));
    chart
        .configure_series_labels()
        .label_font(("sans-serif", 12).into_font().color(&WHITE))
        .border_style(&WHITE.mix(0.2))
        .background_style(&style.background)
        .draw()?;
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SynthError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SynthError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
