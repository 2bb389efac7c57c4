//! Line charts rendered to PNG.

use crate::errors::*;
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Default series colour (the usual first colour of a plotting cycle).
pub const BLUE: RGBColor = RGBColor(31, 119, 180);
/// Series colour for memory charts.
pub const RED: RGBColor = RGBColor(214, 39, 40);
/// Series colour for length charts.
pub const GREEN: RGBColor = RGBColor(0, 128, 0);
/// Series colour for secondary runtime charts.
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

const FONT: &str = "sans-serif";

/// Horizontal axis of a line chart.
#[derive(Clone, Debug, PartialEq)]
pub enum XAxis {
    /// Discrete labels, one per point, drawn evenly spaced in the given order.
    Categorical(Vec<String>),

    /// Continuous numeric positions.
    Numeric(Vec<f64>),
}

impl XAxis {
    /// Number of points on the axis.
    pub fn len(&self) -> usize {
        match *self {
            XAxis::Categorical(ref labels) => labels.len(),
            XAxis::Numeric(ref xs) => xs.len(),
        }
    }

    /// True when the axis has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug)]
pub struct LineChart {
    /// Caption above the plot.
    pub title: String,

    /// Horizontal axis title.
    pub x_desc: String,

    /// Vertical axis title.
    pub y_desc: String,

    /// Point positions along the horizontal axis.
    pub x: XAxis,

    /// Point heights, same length as `x`.
    pub y: Vec<f64>,

    /// Line and marker colour.
    pub color: RGBColor,

    /// Image size in pixels (width, height).
    pub resolution: (u32, u32),

    /// Turn categorical tick labels a quarter turn so long size labels do
    /// not overlap.
    pub rotate_x_labels: bool,
}

impl LineChart {
    /// Creates a chart with blue series, no axis titles and an 800x500 image.
    pub fn new<S: Into<String>>(title: S, x: XAxis, y: Vec<f64>) -> Self {
        LineChart {
            title: title.into(),
            x_desc: String::new(),
            y_desc: String::new(),
            x: x,
            y: y,
            color: BLUE,
            resolution: (800, 500),
            rotate_x_labels: false,
        }
    }

    /// Sets both axis titles.
    pub fn axes<X: Into<String>, Y: Into<String>>(mut self, x_desc: X, y_desc: Y) -> Self {
        self.x_desc = x_desc.into();
        self.y_desc = y_desc.into();
        self
    }

    /// Sets the series colour.
    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    /// Sets the image size in pixels.
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width, height);
        self
    }

    /// Rotates the categorical tick labels.
    pub fn rotate_x_labels(mut self) -> Self {
        self.rotate_x_labels = true;
        self
    }

    /// Checks the chart can be drawn: equal lengths, at least one point.
    pub fn validate(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            bail!(ErrorKind::LengthMismatch(self.x.len(), self.y.len()));
        }
        if self.y.is_empty() {
            bail!(ErrorKind::EmptySeries(self.title.clone()));
        }
        Ok(())
    }
}

/// Range covering `values` with 5% headroom on each side; a flat series gets
/// one unit either way.
pub fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(::std::f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(::std::f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

// Font and marker sizes scale with image height so high resolution output
// keeps the same proportions.
struct Scale {
    caption: f64,
    desc: f64,
    label: f64,
    margin: i32,
    x_area: i32,
    y_area: i32,
    stroke: u32,
    marker: u32,
}

impl Scale {
    fn of(resolution: (u32, u32)) -> Self {
        let h = resolution.1 as f64;
        Scale {
            caption: h / 20.0,
            desc: h / 32.0,
            label: h / 40.0,
            margin: (h / 40.0) as i32,
            x_area: (h / 7.0) as i32,
            y_area: (resolution.0 as f64 / 10.0) as i32,
            stroke: ((h / 300.0) as u32).max(1),
            marker: ((h / 150.0) as u32).max(2),
        }
    }
}

/// Draws `chart` and writes it to `path` as PNG, replacing any existing file.
/// The image is rendered and encoded in memory first, so a failed render
/// leaves whatever was at `path` untouched.
pub fn emit_line_chart<P: AsRef<Path>>(chart: &LineChart, path: P) -> Result<()> {
    chart.validate()?;
    let path = path.as_ref();
    let name = path.display().to_string();
    let (width, height) = chart.resolution;

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, chart.resolution).into_drawing_area();
        let drawn = match chart.x {
            XAxis::Categorical(ref labels) => draw_categorical(&root, chart, labels),
            XAxis::Numeric(ref xs) => draw_numeric(&root, chart, xs),
        };
        drawn
            .and_then(|_| root.present())
            .map_err(|e| Error::from(ErrorKind::Render(name.clone(), e.to_string())))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&pixels, width, height, ColorType::Rgb8)
        .map_err(|e| Error::from(ErrorKind::Render(name.clone(), e.to_string())))?;
    fs::write(path, &png).chain_err(|| ErrorKind::Write(name.clone()))?;

    info!("wrote {} ({} points, {} bytes)", name, chart.y.len(), png.len());
    Ok(())
}

/// Discrete x range with exactly one segment per label. Integer ranges are
/// inclusive of their end once segmented, so `n` labels span `0..n - 1`.
fn segments(labels: usize) -> Range<usize> {
    0..labels.saturating_sub(1)
}

type DrawResult<DB> = ::std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn draw_categorical<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &LineChart,
    labels: &[String],
) -> DrawResult<DB> {
    let scale = Scale::of(chart.resolution);
    let (y_min, y_max) = padded_range(&chart.y);
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, scale.caption).into_font())
        .margin(scale.margin)
        .x_label_area_size(scale.x_area)
        .y_label_area_size(scale.y_area)
        .build_cartesian_2d(segments(labels.len()).into_segmented(), y_min..y_max)?;

    let formatter = |v: &SegmentValue<usize>| match *v {
        SegmentValue::CenterOf(i) => labels.get(i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let mut x_label_style = (FONT, scale.label).into_font();
    if chart.rotate_x_labels {
        x_label_style = x_label_style.transform(FontTransform::Rotate90);
    }
    ctx.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .x_labels(labels.len())
        .x_label_formatter(&formatter)
        .label_style((FONT, scale.label).into_font())
        .x_label_style(x_label_style)
        .axis_desc_style((FONT, scale.desc).into_font())
        .draw()?;

    let points = chart
        .y
        .iter()
        .enumerate()
        .map(|(i, &y)| (SegmentValue::CenterOf(i), y));
    ctx.draw_series(
        LineSeries::new(points, chart.color.stroke_width(scale.stroke)).point_size(scale.marker),
    )?;
    Ok(())
}

fn draw_numeric<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &LineChart,
    xs: &[f64],
) -> DrawResult<DB> {
    let scale = Scale::of(chart.resolution);
    let (x_min, x_max) = padded_range(xs);
    let (y_min, y_max) = padded_range(&chart.y);
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, scale.caption).into_font())
        .margin(scale.margin)
        .x_label_area_size(scale.x_area)
        .y_label_area_size(scale.y_area)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    ctx.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .label_style((FONT, scale.label).into_font())
        .axis_desc_style((FONT, scale.desc).into_font())
        .draw()?;

    let points = xs.iter().cloned().zip(chart.y.iter().cloned());
    ctx.draw_series(
        LineSeries::new(points, chart.color.stroke_width(scale.stroke)).point_size(scale.marker),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_plot.png");
        let chart = LineChart::new(
            "DP Runtime vs Matrix Size",
            XAxis::Categorical(vec!["10x10".to_string(), "20x20".to_string()]),
            vec![1.0],
        );
        match *emit_line_chart(&chart, &path).unwrap_err().kind() {
            ErrorKind::LengthMismatch(x, y) => assert_eq!((x, y), (2, 1)),
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn empty_series_is_rejected() {
        let chart = LineChart::new("empty", XAxis::Numeric(vec![]), vec![]);
        match *chart.validate().unwrap_err().kind() {
            ErrorKind::EmptySeries(ref title) => assert_eq!(title, "empty"),
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("memory_plot.png");
        let chart = LineChart::new("Memory", XAxis::Numeric(vec![1.0, 2.0]), vec![3.0, 4.0]);
        let err = emit_line_chart(&chart, &path).unwrap_err();
        match *err.kind() {
            ErrorKind::Write(ref p) => assert!(p.ends_with("memory_plot.png")),
            ref other => panic!("unexpected error: {:?}", other),
        }
        // the io error is kept as the cause
        assert!(err.iter().nth(1).is_some());
    }

    #[test]
    fn builder_sets_presentation() {
        let chart = LineChart::new("t", XAxis::Numeric(vec![1.0]), vec![1.0])
            .axes("Delta", "Time (ms)")
            .color(PURPLE)
            .resolution(3000, 1800);
        assert_eq!(chart.x_desc, "Delta");
        assert_eq!(chart.y_desc, "Time (ms)");
        assert_eq!(chart.color, PURPLE);
        assert_eq!(chart.resolution, (3000, 1800));
        assert!(chart.validate().is_ok());
    }

    fn size_chart(labels: &[&str], y: Vec<f64>) -> LineChart {
        LineChart::new(
            "DP Runtime vs Matrix Size",
            XAxis::Categorical(labels.iter().map(|l| l.to_string()).collect()),
            y,
        ).axes("Matrix Size (m × n)", "Runtime (ms)")
    }

    #[test]
    fn one_segment_per_label() {
        assert_eq!(segments(1), 0..0);
        assert_eq!(segments(4), 0..3);
    }

    #[test]
    fn renders_categorical_and_numeric_charts() {
        let dir = tempfile::tempdir().unwrap();
        let sizes = dir.path().join("runtime_plot.png");
        let chart = size_chart(&["10x10", "10x100", "100x100"], vec![0.5, 2.0, 9.5])
            .rotate_x_labels();
        emit_line_chart(&chart, &sizes).unwrap();
        assert!(fs::metadata(&sizes).unwrap().len() > 0);

        let deltas = dir.path().join("scenario2_time_vs_delta.png");
        let chart = LineChart::new(
            "Scenario 2: Runtime vs Delta",
            XAxis::Numeric(vec![1.0, 2.0, 5.0]),
            vec![3.0, 2.5, 4.0],
        ).color(PURPLE);
        emit_line_chart(&chart, &deltas).unwrap();
        assert!(fs::metadata(&deltas).unwrap().len() > 0);
    }

    #[test]
    fn renders_a_single_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory_plot.png");
        emit_line_chart(&size_chart(&["10x10"], vec![1.0]), &path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn existing_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_plot.png");
        fs::write(&path, b"stale").unwrap();

        emit_line_chart(&size_chart(&["10x10", "20x20"], vec![1.0, 2.0]), &path).unwrap();
        let first = fs::read(&path).unwrap();
        assert!(first.starts_with(b"\x89PNG"));

        emit_line_chart(&size_chart(&["10x10", "20x20"], vec![1.0, 8.0]), &path).unwrap();
        let second = fs::read(&path).unwrap();
        assert!(second.starts_with(b"\x89PNG"));
        assert_ne!(first, second);
    }

    #[test]
    fn rejected_chart_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory_plot.png");
        fs::write(&path, b"previous").unwrap();
        let chart = size_chart(&["10x10"], vec![1.0, 2.0]);
        assert!(emit_line_chart(&chart, &path).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn range_padding() {
        assert_eq!(padded_range(&[5.0, 5.0]), (4.0, 6.0));
        let (lo, hi) = padded_range(&[0.0, 10.0]);
        assert!((lo + 0.5).abs() < 1e-9);
        assert!((hi - 10.5).abs() < 1e-9);
        assert_eq!(padded_range(&[]), (0.0, 1.0));
    }
}
