//! Missing-value filling and period changes.

/// Forward fill `NaN` values.
///
/// Each run of missing values following a valid value is filled with that
/// value, at most `limit` positions deep (`None` for no limit). Leading
/// missing values are left untouched.
#[must_use]
pub fn forward_fill(values: &[f64], limit: Option<usize>) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut last: Option<f64> = None;
    let mut run = 0usize;

    for &v in values {
        if v.is_nan() {
            run += 1;
            match last {
                Some(fill) if limit.is_none_or(|l| run <= l) => out.push(fill),
                _ => out.push(f64::NAN),
            }
        } else {
            last = Some(v);
            run = 0;
            out.push(v);
        }
    }

    out
}

/// Backward fill `NaN` values in a single pass.
///
/// Every missing value takes the next available value. Trailing missing
/// values have nothing to take from and stay `NaN`.
#[must_use]
pub fn backward_fill(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    let mut next = f64::NAN;
    for v in out.iter_mut().rev() {
        if v.is_nan() {
            *v = next;
        } else {
            next = *v;
        }
    }
    out
}

/// Period-over-period fractional change `x_t / x_{t-1} - 1`.
///
/// The first element is always `NaN`, as is any change with a missing operand.
#[must_use]
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| {
        if w[0].is_nan() || w[1].is_nan() { f64::NAN } else { w[1] / w[0] - 1.0 }
    }));
    out
}
