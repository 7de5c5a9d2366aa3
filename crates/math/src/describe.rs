//! Descriptive statistics.

/// Summary statistics of a sample, skipping missing values.
///
/// Mirrors the usual `count, mean, std, min, 25%, 50%, 75%, max` layout.
/// Quantiles use linear interpolation between order statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of non-missing observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// 25th percentile.
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// 75th percentile.
    pub q75: f64,
    /// Maximum.
    pub max: f64,
}

impl DescriptiveStats {
    /// Row labels, in output order.
    pub const FIELDS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in the same order as [`Self::FIELDS`].
    #[must_use]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }

    /// `(label, value)` pairs.
    #[must_use]
    pub fn fields(&self) -> Vec<(String, f64)> {
        Self::FIELDS.iter().map(|f| (*f).to_string()).zip(self.values()).collect()
    }
}

/// Compute descriptive statistics, ignoring `NaN` values.
#[must_use]
pub fn describe(data: &[f64]) -> DescriptiveStats {
    let mut valid: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    let n = valid.len();

    if n == 0 {
        return DescriptiveStats {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    valid.sort_by(f64::total_cmp);

    let mean = valid.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (valid.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    DescriptiveStats {
        count: n,
        mean,
        std,
        min: valid[0],
        q25: quantile_sorted(&valid, 0.25),
        median: quantile_sorted(&valid, 0.5),
        q75: quantile_sorted(&valid, 0.75),
        max: valid[n - 1],
    }
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn describe_matches_reference_values() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.std, 1.290_994_448_735_805_6, epsilon = 1e-12);
        assert_relative_eq!(stats.q25, 1.75);
        assert_relative_eq!(stats.median, 2.5);
        assert_relative_eq!(stats.q75, 3.25);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn describe_skips_missing() {
        let stats = describe(&[f64::NAN, 5.0, 1.0, f64::NAN]);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
    }

    #[test]
    fn describe_empty_and_single() {
        let empty = describe(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());

        let single = describe(&[0.5]);
        assert_eq!(single.count, 1);
        assert!(single.std.is_nan());
        assert_eq!(single.median, 0.5);
    }

    #[test]
    fn fields_follow_label_order() {
        let fields = describe(&[1.0, 3.0]).fields();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], ("count".to_string(), 2.0));
        assert_eq!(fields[5].0, "50%");
    }
}
