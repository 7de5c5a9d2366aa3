//! Two-sided p-values for test statistics.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
///
/// Returns `NaN` when the statistic is not finite or `df` is not positive.
#[must_use]
pub fn student_t_p_value(t: f64, df: f64) -> f64 {
    if !t.is_finite() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// Two-sided p-value of a standard normal z statistic.
#[must_use]
pub fn normal_p_value(z: f64) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => (2.0 * dist.sf(z.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
