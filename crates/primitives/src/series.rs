//! Date-indexed numeric series.

use serde::{Deserialize, Serialize};

use crate::{Date, DateWindow, SeriesError};

/// An ordered sequence of `(date, value)` pairs.
///
/// Dates are strictly increasing. A `NaN` value marks a missing observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateIndexedSeries {
    name: String,
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl DateIndexedSeries {
    /// Create a new series.
    ///
    /// # Errors
    /// Returns `SeriesError` if lengths differ or dates are not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        dates: Vec<Date>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch { dates: dates.len(), values: values.len() });
        }
        check_increasing(&dates)?;
        Ok(Self { name: name.into(), dates, values })
    }

    /// Create an empty series.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), dates: Vec::new(), values: Vec::new() }
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Values, aligned with [`Self::dates`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value at a given date, if the date is in the index.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i])
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Restrict to an inclusive date window.
    #[must_use]
    pub fn window(&self, window: &DateWindow) -> Self {
        let (dates, values) = self.iter().filter(|(d, _)| window.contains(*d)).unzip();
        Self { name: self.name.clone(), dates, values }
    }

    /// Restrict to the dates of `index` that are present in this series.
    ///
    /// `index` must be sorted ascending.
    #[must_use]
    pub fn restrict_to(&self, index: &[Date]) -> Self {
        let (dates, values) = index.iter().filter_map(|&d| self.get(d).map(|v| (d, v))).unzip();
        Self { name: self.name.clone(), dates, values }
    }

    /// Multiply every value by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map_values(|v| v * factor)
    }

    /// Apply `f` to every value, keeping the index.
    #[must_use]
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            name: self.name.clone(),
            dates: self.dates.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Replace values, keeping the index.
    ///
    /// # Errors
    /// Returns `SeriesError::LengthMismatch` if `values` has the wrong length.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, SeriesError> {
        if values.len() != self.dates.len() {
            return Err(SeriesError::LengthMismatch {
                dates: self.dates.len(),
                values: values.len(),
            });
        }
        Ok(Self { name: self.name.clone(), dates: self.dates.clone(), values })
    }

    /// Dates whose value is missing.
    #[must_use]
    pub fn missing_dates(&self) -> Vec<Date> {
        self.iter().filter(|(_, v)| v.is_nan()).map(|(d, _)| d).collect()
    }

    /// Number of non-missing values.
    #[must_use]
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

pub(crate) fn check_increasing(dates: &[Date]) -> Result<(), SeriesError> {
    match dates.windows(2).find(|w| w[1] <= w[0]) {
        Some(w) => Err(SeriesError::NotIncreasing { previous: w[0], next: w[1] }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn rejects_unsorted_dates() {
        let result = DateIndexedSeries::new("x", vec![d(2), d(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(SeriesError::NotIncreasing { .. })));

        let result = DateIndexedSeries::new("x", vec![d(1), d(1)], vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = DateIndexedSeries::new("x", vec![d(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(SeriesError::LengthMismatch { dates: 1, values: 2 })));
    }

    #[test]
    fn window_is_inclusive() {
        let s = DateIndexedSeries::new("x", vec![d(1), d(2), d(3), d(4)], vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();
        let w = s.window(&DateWindow::new(d(2), d(3)));
        assert_eq!(w.dates(), &[d(2), d(3)]);
        assert_eq!(w.values(), &[2.0, 3.0]);
    }

    #[test]
    fn restrict_and_missing() {
        let s = DateIndexedSeries::new("x", vec![d(1), d(2), d(3)], vec![1.0, f64::NAN, 3.0])
            .unwrap();
        let r = s.restrict_to(&[d(2), d(3), d(9)]);
        assert_eq!(r.dates(), &[d(2), d(3)]);
        assert_eq!(s.missing_dates(), vec![d(2)]);
        assert_eq!(s.count_valid(), 2);
        assert_eq!(s.get(d(3)), Some(3.0));
        assert_eq!(s.get(d(5)), None);
    }

    #[test]
    fn scaled_keeps_index() {
        let s = DateIndexedSeries::new("x", vec![d(1), d(2)], vec![50.0, -25.0]).unwrap();
        let scaled = s.scaled(0.01);
        assert_eq!(scaled.dates(), s.dates());
        assert_eq!(scaled.values(), &[0.5, -0.25]);
    }
}
