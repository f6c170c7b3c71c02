/// Rendering layer: a small figure description and its PNG export.
///
/// ```text
///   figures::*  ──build──▶  Figure { Series, Canvas }  ──plot::draw──▶  .png
/// ```
///
/// Sizes are given the way papers give them: inches and DPI for the canvas,
/// points for fonts and strokes.
pub mod plot;

use std::ops::Range;
use std::path::Path;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::generate_palette;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("figure has no finite points to draw")]
    EmptyFigure,

    #[error("drawing failed: {0}")]
    Drawing(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Physical figure size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl Default for Canvas {
    /// Single-column journal figure at print resolution.
    fn default() -> Self {
        Canvas {
            width_in: 3.5,
            height_in: 2.625,
            dpi: 600.0,
        }
    }
}

impl Canvas {
    pub fn new(width_in: f64, height_in: f64) -> Self {
        Canvas {
            width_in,
            height_in,
            ..Default::default()
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Convert typographic points (1/72 in) to whole pixels, at least 1.
    pub fn pt(&self, points: f64) -> u32 {
        (points * self.dpi / 72.0).round().max(1.0) as u32
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
    SolidWithMarkers,
}

impl LineStyle {
    /// Cycle used for successive approximation levels.
    pub const CYCLE: [LineStyle; 3] = [LineStyle::Solid, LineStyle::Dashed, LineStyle::Dotted];

    pub fn nth(i: usize) -> LineStyle {
        Self::CYCLE[i % Self::CYCLE.len()]
    }
}

/// One labelled curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: LineStyle,
    /// `None` takes the next palette colour.
    pub color: Option<RGBColor>,
    pub alpha: f64,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Series {
            label: label.into(),
            points,
            style: LineStyle::Solid,
            color: None,
            alpha: 1.0,
        }
    }

    pub fn from_axes(label: impl Into<String>, x: &[f64], y: &[f64]) -> Self {
        Self::new(label, x.iter().copied().zip(y.iter().copied()).collect())
    }

    pub fn style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Maximal runs of consecutive finite points. A `NaN` breaks the line.
    pub fn finite_runs(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for &(x, y) in &self.points {
            if x.is_finite() && y.is_finite() {
                current.push((x, y));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    pub fn skipped_points(&self) -> usize {
        self.points
            .iter()
            .filter(|(x, y)| !(x.is_finite() && y.is_finite()))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub grid: bool,
    /// Axis limits hug the data instead of leaving a margin.
    pub tight: bool,
    pub canvas: Canvas,
}

impl Figure {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Figure {
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
            grid: false,
            tight: false,
            canvas: Canvas::default(),
        }
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    /// Axis ranges covering every finite point.
    pub fn bounds(&self) -> Option<(Range<f64>, Range<f64>)> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut any = false;

        for &(x, y) in self.series.iter().flat_map(|s| &s.points) {
            if x.is_finite() && y.is_finite() {
                any = true;
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if !any {
            return None;
        }

        let margin = if self.tight { 0.0 } else { 0.05 };
        Some((
            padded(x_min, x_max, margin),
            padded(y_min, y_max, margin),
        ))
    }

    /// Final colour per series: explicit colours are kept, the rest walk the
    /// palette in order.
    pub fn resolved_colors(&self) -> Vec<RGBColor> {
        let uncolored = self.series.iter().filter(|s| s.color.is_none()).count();
        let mut palette = generate_palette(uncolored).into_iter();
        self.series
            .iter()
            .map(|s| {
                s.color
                    .or_else(|| palette.next())
                    .unwrap_or(RGBColor(0, 0, 0))
            })
            .collect()
    }

    pub fn render_png(&self, path: &Path) -> Result<(), RenderError> {
        plot::draw(self, path)
    }
}

fn padded(min: f64, max: f64, margin: f64) -> Range<f64> {
    let span = max - min;
    if span.abs() < f64::EPSILON * (1.0 + min.abs().max(max.abs())) {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * margin)..(max + span * margin)
}
