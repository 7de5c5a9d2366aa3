//! Factor-related type definitions.

use derive_more::Display;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{Date, DateWindow, SeriesError, series::check_increasing};

/// Name of a factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct FactorName(pub String);

impl FactorName {
    /// Create a new factor name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the factor name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FactorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Explanatory factor returns plus the risk-free rate on a shared date index.
///
/// All values are fractional returns (already divided by 100).
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSet {
    dates: Vec<Date>,
    names: Vec<FactorName>,
    /// Factor returns (dates x factors).
    values: Array2<f64>,
    risk_free: Vec<f64>,
}

impl FactorSet {
    /// Create a new factor set.
    ///
    /// # Errors
    /// Returns `SeriesError` on shape mismatch or non-increasing dates.
    pub fn new(
        dates: Vec<Date>,
        names: Vec<FactorName>,
        values: Array2<f64>,
        risk_free: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if values.nrows() != dates.len() {
            return Err(SeriesError::LengthMismatch { dates: dates.len(), values: values.nrows() });
        }
        if risk_free.len() != dates.len() {
            return Err(SeriesError::LengthMismatch { dates: dates.len(), values: risk_free.len() });
        }
        if values.ncols() != names.len() {
            return Err(SeriesError::ColumnMismatch { names: names.len(), columns: values.ncols() });
        }
        check_increasing(&dates)?;
        Ok(Self { dates, names, values, risk_free })
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Factor names, in column order.
    #[must_use]
    pub fn names(&self) -> &[FactorName] {
        &self.names
    }

    /// Factor return matrix (dates x factors).
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns of one factor.
    #[must_use]
    pub fn factor(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    /// Risk-free rate, aligned with [`Self::dates`].
    #[must_use]
    pub fn risk_free(&self) -> &[f64] {
        &self.risk_free
    }

    /// Number of factors (excluding the risk-free rate).
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.names.len()
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Keep only the rows whose date is in `index` (sorted ascending).
    #[must_use]
    pub fn restrict_to(&self, index: &[Date]) -> Self {
        let rows: Vec<usize> =
            index.iter().filter_map(|d| self.dates.binary_search(d).ok()).collect();
        self.select_rows(&rows)
    }

    /// Restrict to an inclusive date window.
    #[must_use]
    pub fn window(&self, window: &DateWindow) -> Self {
        let rows: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| window.contains(**d))
            .map(|(i, _)| i)
            .collect();
        self.select_rows(&rows)
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        let mut values = Array2::zeros((rows.len(), self.names.len()));
        for (out, &row) in rows.iter().enumerate() {
            values.row_mut(out).assign(&self.values.row(row));
        }
        Self {
            dates: rows.iter().map(|&r| self.dates[r]).collect(),
            names: self.names.clone(),
            values,
            risk_free: rows.iter().map(|&r| self.risk_free[r]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn sample() -> FactorSet {
        FactorSet::new(
            vec![d(1), d(2), d(3)],
            vec!["Mkt-RF".into(), "SMB".into()],
            array![[0.01, 0.002], [0.02, 0.003], [-0.01, 0.001]],
            vec![0.0001, 0.0001, 0.0002],
        )
        .unwrap()
    }

    #[test]
    fn factor_name_display() {
        assert_eq!(FactorName::new("HML").to_string(), "HML");
        assert_eq!(FactorName::from("WML").as_str(), "WML");
    }

    #[test]
    fn restrict_keeps_rows_in_order() {
        let set = sample().restrict_to(&[d(1), d(3), d(7)]);
        assert_eq!(set.dates(), &[d(1), d(3)]);
        assert_eq!(set.factor(0).to_vec(), vec![0.01, -0.01]);
        assert_eq!(set.risk_free(), &[0.0001, 0.0002]);
    }

    #[test]
    fn window_filters_dates() {
        let set = sample().window(&DateWindow::new(d(2), d(9)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.n_factors(), 2);
    }

    #[test]
    fn shape_mismatch_rejected() {
        let result =
            FactorSet::new(vec![d(1)], vec!["A".into()], array![[0.1, 0.2]], vec![0.0]);
        assert!(matches!(result, Err(SeriesError::ColumnMismatch { names: 1, columns: 2 })));
    }
}
