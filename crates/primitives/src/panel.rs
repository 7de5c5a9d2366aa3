//! Fund price panel.

use ndarray::{Array2, ArrayView1};

use crate::{Date, FundName, SeriesError, series::check_increasing};

/// Numeric instrument prices for a single fund sheet.
///
/// Rows are dates, columns are instruments. Missing prices are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FundPricePanel {
    fund: FundName,
    dates: Vec<Date>,
    columns: Vec<String>,
    prices: Array2<f64>,
}

impl FundPricePanel {
    /// Create a new panel.
    ///
    /// # Errors
    /// Returns `SeriesError` if there are no columns, the shape does not match
    /// the dates and column names, or the dates are not strictly increasing.
    pub fn new(
        fund: FundName,
        dates: Vec<Date>,
        columns: Vec<String>,
        prices: Array2<f64>,
    ) -> Result<Self, SeriesError> {
        if columns.is_empty() {
            return Err(SeriesError::NoColumns(fund.to_string()));
        }
        if prices.nrows() != dates.len() {
            return Err(SeriesError::LengthMismatch { dates: dates.len(), values: prices.nrows() });
        }
        if prices.ncols() != columns.len() {
            return Err(SeriesError::ColumnMismatch {
                names: columns.len(),
                columns: prices.ncols(),
            });
        }
        check_increasing(&dates)?;
        Ok(Self { fund, dates, columns, prices })
    }

    /// Fund (sheet) name.
    #[must_use]
    pub const fn fund(&self) -> &FundName {
        &self.fund
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Instrument column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Price matrix (dates x instruments).
    #[must_use]
    pub const fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    /// Prices of one instrument.
    #[must_use]
    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.prices.column(index)
    }

    /// Number of dates.
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of instrument columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<Date> {
        (1..=n).map(|d| Date::from_ymd_opt(2024, 3, d).unwrap()).collect()
    }

    #[test]
    fn panel_shape_checks() {
        let prices = Array2::from_shape_vec((3, 2), vec![1.0, 2.0, 1.1, 2.1, 1.2, 2.2]).unwrap();
        let panel = FundPricePanel::new(
            FundName::new("FundA"),
            dates(3),
            vec!["A".into(), "B".into()],
            prices.clone(),
        )
        .unwrap();
        assert_eq!(panel.n_dates(), 3);
        assert_eq!(panel.n_columns(), 2);
        assert_eq!(panel.column(1)[2], 2.2);

        let bad = FundPricePanel::new(FundName::new("FundA"), dates(2), vec!["A".into()], prices);
        assert!(bad.is_err());
    }

    #[test]
    fn panel_requires_a_column() {
        let result = FundPricePanel::new(
            FundName::new("Empty"),
            dates(2),
            Vec::new(),
            Array2::zeros((2, 0)),
        );
        assert!(matches!(result, Err(SeriesError::NoColumns(name)) if name == "Empty"));
    }
}
