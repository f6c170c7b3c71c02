use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{Figure, LineStyle, RenderError};

const FONT: &str = "sans-serif";
/// Base font size in points.
const FONT_PT: f64 = 8.0;
const LINE_PT: f64 = 1.0;
const MARKER_PT: f64 = 1.5;

// ---------------------------------------------------------------------------
// PNG export
// ---------------------------------------------------------------------------

/// Draw `figure` into a PNG at `path`.
pub fn draw(figure: &Figure, path: &Path) -> Result<(), RenderError> {
    let (x_range, y_range) = figure.bounds().ok_or(RenderError::EmptyFigure)?;
    let canvas = figure.canvas;
    let font = canvas.pt(FONT_PT);
    let line = canvas.pt(LINE_PT);

    let root = BitMapBackend::new(path, canvas.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(canvas.pt(6.0))
        .x_label_area_size(canvas.pt(26.0))
        .y_label_area_size(canvas.pt(40.0))
        .build_cartesian_2d(x_range, y_range)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&format_tick)
            .y_label_formatter(&format_tick)
            .label_style((FONT, font))
            .axis_desc_style((FONT, font))
            .axis_style(BLACK.stroke_width(line));
        if figure.grid {
            mesh.light_line_style(WHITE.mix(0.0))
                .bold_line_style(BLACK.mix(0.15).stroke_width(line));
        } else {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    }

    let colors = figure.resolved_colors();
    let legend_len = canvas.pt(14.0) as i32;

    for (series, color) in figure.series.iter().zip(colors) {
        let style = color.mix(series.alpha).stroke_width(line);
        let skipped = series.skipped_points();
        if skipped > 0 {
            log::warn!("'{}': skipping {skipped} non-finite points", series.label);
        }

        for (run_idx, run) in series.finite_runs().into_iter().enumerate() {
            let anno = match series.style {
                LineStyle::Solid => chart.draw_series(LineSeries::new(run, style))?,
                LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(
                    run,
                    (4 * line) as i32,
                    (2 * line) as i32,
                    style,
                ))?,
                // A long dash with a short gap reads as dash-dot at print size.
                LineStyle::DashDot => chart.draw_series(DashedLineSeries::new(
                    run,
                    (6 * line) as i32,
                    (line + line / 2) as i32,
                    style,
                ))?,
                LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(
                    run,
                    line as i32,
                    (2 * line) as i32,
                    style,
                ))?,
                LineStyle::SolidWithMarkers => {
                    let radius = canvas.pt(MARKER_PT);
                    chart.draw_series(
                        run.iter()
                            .map(|&p| Circle::new(p, radius, style.filled())),
                    )?;
                    chart.draw_series(LineSeries::new(run, style))?
                }
            };

            // One legend entry per series, not per run.
            if run_idx == 0 {
                anno.label(series.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_len, y)], style)
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, font))
        .legend_area_size(canvas.pt(16.0))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()?;

    root.present()?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Tick labels: plain decimals for ordinary magnitudes, scientific notation
/// for problem sizes in the millions and tiny errors.
fn format_tick(v: &f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e5).contains(&a) {
        format!("{v:.1e}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Canvas, Series};

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(&0.0), "0");
        assert_eq!(format_tick(&2.5), "2.5");
        assert_eq!(format_tick(&10.0), "10");
        assert_eq!(format_tick(&-0.125), "-0.125");
        assert_eq!(format_tick(&1048575.0), "1.0e6");
        assert_eq!(format_tick(&0.0002), "2.0e-4");
    }

    #[test]
    fn writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_points.png");

        let mut figure = Figure::new("x", "y");
        figure.canvas = Canvas {
            dpi: 100.0,
            ..Canvas::default()
        };
        figure.push(Series::new("line", vec![(0.0, 1.0), (1.0, 2.0)]).style(LineStyle::Dashed));
        draw(&figure, &path).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }

    #[test]
    fn empty_figure_is_not_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        assert!(matches!(
            draw(&Figure::new("x", "y"), &path),
            Err(RenderError::EmptyFigure)
        ));
        assert!(!path.exists());
    }
}
