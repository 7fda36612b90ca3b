//! Decomposition figures drawn with plotters.

use std::path::Path;

use outlier_api::RenderConfig;
use outlier_spi::{DecomposedSeries, OutlierError, Result, SeriesRenderer};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

const PANELS: [&str; 4] = ["Observed", "Trend", "Seasonal", "Residual"];
const FONT: &str = "sans-serif";
const LINE_COLOR: RGBColor = RGBColor(76, 114, 176);
const BACKGROUND: RGBColor = RGBColor(234, 234, 242);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Svg,
    Bitmap,
}

/// Four stacked line panels: observed, trend, seasonal and residual.
///
/// `svg` goes through the SVG backend; `png`, `jpg` and `jpeg` are
/// rasterized. Bitmap figures carry titles and axis labels only when the
/// crate is built with the `system-fonts` feature.
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    config: RenderConfig,
    format: String,
    backend: Backend,
}

impl PlotRenderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        let format = config.format.to_ascii_lowercase();
        let backend = match format.as_str() {
            "svg" => Backend::Svg,
            "png" | "jpg" | "jpeg" => Backend::Bitmap,
            _ => return Err(OutlierError::UnsupportedFormat(config.format)),
        };
        let (width, height) = config.pixel_size();
        if config.dpi == 0 || width < 1.0 || height < 1.0 || width > f64::from(u32::MAX) {
            return Err(OutlierError::invalid_parameter(
                "render",
                "dpi and figure size must give a positive pixel size",
            ));
        }
        Ok(Self {
            config,
            format,
            backend,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.config.pixel_size();
        (width.round() as u32, height.round() as u32)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        figure: &DecomposedSeries,
        with_text: bool,
    ) -> Result<()> {
        let dpi = f64::from(self.config.dpi);
        let font = self.config.font_size * dpi / 72.0;
        let stroke = (self.config.dpi / 96).max(1);
        let margin = (font * 0.5).round() as i32;

        root.fill(&WHITE).map_err(render_error)?;
        let titled;
        let body = if with_text {
            titled = root
                .titled(&figure.series.taxon, (FONT, font * 1.2).into_font())
                .map_err(render_error)?;
            &titled
        } else {
            root
        };

        let index = &figure.series.index;
        let date_label = |x: &f64| {
            index
                .get(x.round().max(0.0) as usize)
                .map(|d| d.to_string())
                .unwrap_or_default()
        };
        let components = &figure.components;
        let series: [&[f64]; 4] = [
            &figure.series.values,
            &components.trend,
            &components.seasonal,
            &components.residual,
        ];
        let x_max = series[0].len().saturating_sub(1).max(1) as f64;

        let areas = body.split_evenly((PANELS.len(), 1));
        for (panel, ((area, name), values)) in areas.iter().zip(PANELS).zip(series).enumerate() {
            let bottom = panel == PANELS.len() - 1;
            let (lo, hi) = value_range(values);

            let mut builder = ChartBuilder::on(area);
            builder.margin(margin);
            if with_text {
                builder
                    .caption(name, (FONT, font).into_font())
                    .y_label_area_size((font * 4.0).round() as i32);
                if bottom {
                    builder.x_label_area_size((font * 2.0).round() as i32);
                }
            }
            let mut chart = builder
                .build_cartesian_2d(0.0..x_max, lo..hi)
                .map_err(render_error)?;
            chart.plotting_area().fill(&BACKGROUND).map_err(render_error)?;

            if with_text {
                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(if bottom { 6 } else { 0 })
                    .x_label_formatter(&date_label)
                    .y_labels(4)
                    .label_style((FONT, font * 0.8).into_font())
                    .draw()
                    .map_err(render_error)?;
            }

            chart
                .draw_series(LineSeries::new(
                    values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                    LINE_COLOR.stroke_width(stroke),
                ))
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)
    }
}

impl SeriesRenderer for PlotRenderer {
    fn format(&self) -> &str {
        &self.format
    }

    fn render(&self, figure: &DecomposedSeries, path: &Path) -> Result<()> {
        let size = self.pixel_size();
        debug!(taxon = %figure.series.taxon, format = %self.format, ?size, "rendering figure");
        match self.backend {
            Backend::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                self.draw(&root, figure, true)
            }
            Backend::Bitmap => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                self.draw(&root, figure, cfg!(feature = "system-fonts"))
            }
        }
    }
}

/// Padded y range of a panel; a flat series gets a unit band around it.
fn value_range(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn render_error(err: impl std::fmt::Display) -> OutlierError {
    OutlierError::Render(err.to_string())
}
