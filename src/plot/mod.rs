mod canvas;

pub use canvas::*;

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::core::{
    color::Color,
    histogram::{Bin, Histogram},
    loader::InputParams,
};

/// Display options of one histogram.
pub struct PlotConfig {
    pub file: PathBuf,
    pub bins: usize,
    pub range: Option<(f64, f64)>,
    pub color: Color,
    pub alpha: f32,
    pub density: bool,
    pub cumulative: bool,
    pub parameter: String,
    pub units: String,
}

impl PlotConfig {
    pub const DEFAULT_BINS: usize = 30;
    pub const WIDTH: u32 = 1000;
    pub const HEIGHT: u32 = 500;

    pub fn new<P: Into<PathBuf>>(file: P, parameter: &str) -> Self {
        Self {
            file: file.into(),
            bins: Self::DEFAULT_BINS,
            range: None,
            color: Color::BLACK,
            alpha: 1.0,
            density: false,
            cumulative: false,
            parameter: parameter.to_owned(),
            units: String::new(),
        }
    }

    /// `file` is kept relative; it is resolved against the output directory
    /// when the plot is written.
    pub fn load(params: &mut InputParams, default_parameter: &str) -> anyhow::Result<Self> {
        let file = params.get_str("file")?;
        let mut config = Self::new(file, default_parameter);

        let bins = params.get_int_or("bins", Self::DEFAULT_BINS as i64)?;
        if bins <= 0 {
            anyhow::bail!(format!("{} - 'bins' should be positive", params.name()));
        }
        config.bins = bins as usize;

        if params.contains_key("range") {
            let [lower, upper] = params.get_float2("range")?;
            if !(lower < upper) {
                anyhow::bail!(format!("{} - 'range' should be increasing", params.name()));
            }
            config.range = Some((lower, upper));
        }

        let color = params.get_str_or("color", "k".to_owned())?;
        config.color =
            Color::parse(&color).with_context(|| format!("{} - bad 'color'", params.name()))?;

        let alpha = params.get_float_or("alpha", 1.0)?;
        if !(0.0..=1.0).contains(&alpha) {
            anyhow::bail!(format!("{} - 'alpha' should be in [0, 1]", params.name()));
        }
        config.alpha = alpha as f32;

        config.density = params.get_bool_or("density", false)?;
        config.cumulative = params.get_bool_or("cumulative", false)?;
        config.parameter = params.get_str_or("label", default_parameter.to_owned())?;
        config.units = params.get_str_or("units", String::new())?;

        params.check_unused_keys();

        Ok(config)
    }

    pub fn x_label(&self) -> String {
        if self.units.is_empty() {
            self.parameter.clone()
        } else {
            format!("{} ({})", self.parameter, self.units)
        }
    }

    pub fn y_label(&self) -> &'static str {
        if self.density {
            "Density"
        } else {
            "Counts"
        }
    }

    pub fn title(&self) -> String {
        format!("{} distribution", self.parameter)
    }
}

/// Renders the histogram of `samples` to `output_dir/config.file` and writes
/// the labels and bin values to a JSON file next to it.
///
/// `density` is drawn over density histograms as a reference curve.
pub fn plot_histogram(
    samples: &[f64],
    config: &PlotConfig,
    output_dir: &Path,
    density: Option<&dyn Fn(f64) -> f64>,
) -> anyhow::Result<PathBuf> {
    let hist = Histogram::new(samples, config.bins, config.range)
        .with_context(|| format!("plot - can't bin '{}'", config.parameter))?;
    let bins = hist.bins(config.density, config.cumulative);
    let reference = if config.density && !config.cumulative {
        density
    } else {
        None
    };

    let canvas = render(&hist, &bins, config, reference);

    let path = if config.file.is_absolute() {
        config.file.clone()
    } else {
        output_dir.join(&config.file)
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("plot - can't create directory '{}'", parent.display()))?;
    }
    canvas
        .to_image()
        .save(&path)
        .with_context(|| format!("plot - can't save image '{}'", path.display()))?;

    write_summary(&path, &hist, &bins, config)?;

    log::info!("{} - histogram saved to '{}'", config.parameter, path.display());
    Ok(path)
}

struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_range: (f64, f64),
    y_max: f64,
}

impl Frame {
    const MARGIN_LEFT: f64 = 80.0;
    const MARGIN_RIGHT: f64 = 30.0;
    const MARGIN_TOP: f64 = 30.0;
    const MARGIN_BOTTOM: f64 = 60.0;
    const TICK_LENGTH: i64 = 6;
    const TICKS: usize = 5;
    const CURVE_POINTS: usize = 400;

    fn to_px_x(&self, x: f64) -> i64 {
        let t = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        (self.left + t * (self.right - self.left)).round() as i64
    }

    fn to_px_y(&self, y: f64) -> i64 {
        let t = (y / self.y_max).min(1.0);
        (self.bottom - t * (self.bottom - self.top)).round() as i64
    }
}

fn render(
    hist: &Histogram,
    bins: &[Bin],
    config: &PlotConfig,
    reference: Option<&dyn Fn(f64) -> f64>,
) -> Canvas {
    let mut canvas = Canvas::new(PlotConfig::WIDTH, PlotConfig::HEIGHT, Color::WHITE);
    let (lower, upper) = hist.range();

    let mut y_max = bins.iter().fold(0.0f64, |acc, b| acc.max(b.value));
    let curve: Vec<(f64, f64)> = match reference {
        Some(f) => (0..=Frame::CURVE_POINTS)
            .map(|i| {
                let x = lower + (upper - lower) * i as f64 / Frame::CURVE_POINTS as f64;
                (x, f(x))
            })
            .filter(|(_, y)| y.is_finite())
            .collect(),
        None => vec![],
    };
    y_max = curve.iter().fold(y_max, |acc, (_, y)| acc.max(*y));
    if y_max <= 0.0 {
        y_max = 1.0;
    }

    let frame = Frame {
        left: Frame::MARGIN_LEFT,
        right: canvas.width() as f64 - Frame::MARGIN_RIGHT,
        top: Frame::MARGIN_TOP,
        bottom: canvas.height() as f64 - Frame::MARGIN_BOTTOM,
        x_range: (lower, upper),
        y_max: y_max * 1.05,
    };

    for bin in bins {
        let x0 = frame.to_px_x(bin.lower);
        let x1 = frame.to_px_x(bin.upper);
        let y = frame.to_px_y(bin.value);
        let y0 = frame.to_px_y(0.0);
        canvas.fill_rect(x0, y, x1, y0, config.color, config.alpha);
    }

    if curve.len() > 1 {
        let ink = Color::gray(0.2);
        let mut last = (frame.to_px_x(curve[0].0), frame.to_px_y(curve[0].1));
        for (x, y) in &curve[1..] {
            let next = (frame.to_px_x(*x), frame.to_px_y(*y));
            canvas.vline(last.0, last.1, next.1, ink);
            canvas.hline(last.0, next.0, next.1, ink);
            last = next;
        }
    }

    let axis = Color::BLACK;
    let (left, right) = (frame.left as i64, frame.right as i64);
    let (top, bottom) = (frame.top as i64, frame.bottom as i64);
    canvas.outline(left, top, right, bottom, axis);
    for tick in x_ticks(&frame) {
        let x = frame.to_px_x(tick);
        canvas.vline(x, bottom, bottom + Frame::TICK_LENGTH, axis);
    }
    for tick in y_ticks(&frame) {
        let y = frame.to_px_y(tick);
        canvas.hline(left - Frame::TICK_LENGTH, left, y, axis);
    }

    canvas
}

fn x_ticks(frame: &Frame) -> Vec<f64> {
    let (lower, upper) = frame.x_range;
    (0..=Frame::TICKS)
        .map(|i| lower + (upper - lower) * i as f64 / Frame::TICKS as f64)
        .collect()
}

fn y_ticks(frame: &Frame) -> Vec<f64> {
    (0..=Frame::TICKS)
        .map(|i| frame.y_max * i as f64 / Frame::TICKS as f64)
        .collect()
}

fn write_summary(
    image_path: &Path,
    hist: &Histogram,
    bins: &[Bin],
    config: &PlotConfig,
) -> anyhow::Result<()> {
    let mut path = image_path.as_os_str().to_owned();
    path.push(".json");
    let path = PathBuf::from(path);

    let (lower, upper) = hist.range();
    let summary = serde_json::json!({
        "title": config.title(),
        "x_label": config.x_label(),
        "y_label": config.y_label(),
        "density": config.density,
        "cumulative": config.cumulative,
        "samples": hist.total(),
        "counts": hist.counts(),
        "range": [lower, upper],
        "bins": bins
            .iter()
            .map(|b| serde_json::json!({ "lower": b.lower, "upper": b.upper, "value": b.value }))
            .collect::<Vec<_>>(),
    });

    let file = std::fs::File::create(&path)
        .with_context(|| format!("plot - can't create '{}'", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &summary)?;
    Ok(())
}
