//! PNG line charts of return and volatility series.
//!
//! Charts carry no captions or axis labels, so no font backend is needed.

use std::{fmt, ops::Range, path::Path};

use greenbond_primitives::{DateIndexedSeries, VolatilityFit};
use plotters::{coord::Shift, prelude::*};
use tracing::debug;

use crate::PipelineError;

const SIZE: (u32, u32) = (1200, 500);
const MARGIN: u32 = 12;
const AXIS: RGBColor = RGBColor(190, 190, 190);

/// Trading days per year used to annualize daily volatility.
const TRADING_DAYS: f64 = 252.0;

/// Plot a return series against its observation index.
///
/// # Errors
/// Returns `PipelineError::Plot` if the image cannot be rendered or saved.
pub fn plot_returns(path: &Path, series: &DateIndexedSeries) -> Result<(), PipelineError> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    draw_panel(&root, series.values(), BLUE)?;
    root.present().map_err(plot_error)?;
    debug!(path = %path.display(), points = series.len(), "wrote return plot");
    Ok(())
}

/// Plot standardized residuals (top) and annualized conditional volatility
/// (bottom).
///
/// # Errors
/// Returns `PipelineError::Plot` if the image cannot be rendered or saved.
pub fn plot_volatility(path: &Path, fit: &VolatilityFit) -> Result<(), PipelineError> {
    let root = BitMapBackend::new(path, (SIZE.0, SIZE.1 * 2)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let (upper, lower) = root.split_vertically(SIZE.1);
    draw_panel(&upper, fit.standardized_residuals.values(), BLUE)?;
    draw_panel(&lower, &annualized(fit.conditional_volatility.values()), RED)?;
    root.present().map_err(plot_error)?;
    debug!(path = %path.display(), model = %fit.model, "wrote volatility plot");
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    color: RGBColor,
) -> Result<(), PipelineError> {
    let x_end = values.len().saturating_sub(1).max(1) as f64;
    let y_range = value_range(values);
    let baseline = if y_range.contains(&0.0) { 0.0 } else { y_range.start };

    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN)
        .build_cartesian_2d(0.0..x_end, y_range)
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new([(0.0, baseline), (x_end, baseline)], AXIS))
        .map_err(plot_error)?;

    // Missing values break the line
    for segment in finite_segments(values) {
        chart.draw_series(LineSeries::new(segment, color)).map_err(plot_error)?;
    }
    Ok(())
}

/// Daily volatility scaled to annual units.
fn annualized(daily: &[f64]) -> Vec<f64> {
    let factor = TRADING_DAYS.sqrt();
    daily.iter().map(|v| v * factor).collect()
}

/// Runs of consecutive finite points as `(index, value)` pairs.
fn finite_segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().enumerate() {
        if v.is_finite() {
            current.push((i as f64, *v));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Padded `[min, max]` of the finite values; a unit range around the value
/// for flat or empty input.
fn value_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

    if lo > hi {
        return -1.0..1.0;
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

fn plot_error(err: impl fmt::Display) -> PipelineError {
    PipelineError::Plot(err.to_string())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use greenbond_primitives::Date;
    use tempfile::TempDir;

    use super::*;

    fn series(values: Vec<f64>) -> DateIndexedSeries {
        let dates = (0..values.len())
            .map(|i| Date::from_num_days_from_ce_opt(735_599 + i as i32).unwrap())
            .collect();
        DateIndexedSeries::new("FundA", dates, values).unwrap()
    }

    #[test]
    fn segments_split_on_missing_values() {
        let segments = finite_segments(&[1.0, f64::NAN, 2.0, 3.0, f64::NAN, f64::NAN]);
        assert_eq!(segments, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
        assert!(finite_segments(&[f64::NAN]).is_empty());
    }

    #[test]
    fn volatility_is_annualized_by_trading_days() {
        let scaled = annualized(&[0.01, f64::NAN, 0.0]);
        assert_relative_eq!(scaled[0], 0.01 * 252.0_f64.sqrt());
        assert!(scaled[1].is_nan());
        assert_eq!(scaled[2], 0.0);
    }

    #[test]
    fn ranges_are_never_empty() {
        assert_eq!(value_range(&[]), -1.0..1.0);
        assert_eq!(value_range(&[f64::NAN]), -1.0..1.0);
        assert_eq!(value_range(&[0.0, 0.0]), -1.0..1.0);

        let flat = value_range(&[2.0, 2.0]);
        assert!(flat.start < 2.0 && flat.end > 2.0);

        let r = value_range(&[-1.0, 1.0]);
        assert!(r.start < -1.0 && r.end > 1.0);
    }

    #[test]
    fn writes_png_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FundA_daily_returns.png");
        plot_returns(&path, &series(vec![0.01, -0.02, f64::NAN, 0.005, 0.0])).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn missing_directory_is_a_plot_error() {
        let err = plot_returns(Path::new("/definitely/not/here/x.png"), &series(vec![0.1, 0.2]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Plot(_)));
    }
}
