//! Leading-row previews of loaded inputs.

use greenbond_primitives::{Date, FactorSet, FundPricePanel};
use ndarray::ArrayView1;
use polars::prelude::*;

/// Rows shown in a preview.
pub(crate) const HEAD_ROWS: usize = 5;

const DATE_COLUMN: &str = "date";

/// First `n` rows of the factor set, risk-free rate last.
pub(crate) fn factor_head(factors: &FactorSet, n: usize) -> PolarsResult<DataFrame> {
    let risk_free = ArrayView1::from(factors.risk_free());
    let columns = factors
        .names()
        .iter()
        .enumerate()
        .map(|(j, name)| (name.as_str(), factors.factor(j)))
        .chain(std::iter::once(("RF", risk_free)));
    head_frame(factors.dates(), columns, n)
}

/// First `n` rows of a fund's price panel.
pub(crate) fn panel_head(panel: &FundPricePanel, n: usize) -> PolarsResult<DataFrame> {
    let columns =
        panel.columns().iter().enumerate().map(|(j, name)| (name.as_str(), panel.column(j)));
    head_frame(panel.dates(), columns, n)
}

fn head_frame<'a>(
    dates: &[Date],
    columns: impl Iterator<Item = (&'a str, ArrayView1<'a, f64>)>,
    n: usize,
) -> PolarsResult<DataFrame> {
    let rows = dates.len().min(n);
    let labels: Vec<String> =
        dates[..rows].iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();

    let mut frame = vec![Column::new(DATE_COLUMN.into(), labels)];
    frame.extend(columns.map(|(name, values)| {
        Column::new(name.into(), values.iter().take(rows).copied().collect::<Vec<f64>>())
    }));
    DataFrame::new(frame)
}
