//! Return convention transforms.

use greenbond_primitives::ReturnsType;

/// Per-column transform applied to period-over-period fractional changes.
///
/// Operates on the full history of one instrument, before the cross-column
/// mean and before any date window is applied. `NaN` marks a missing change
/// and must stay `NaN` in the output.
pub trait ReturnTransform: Send + Sync {
    /// Transform one column of fractional changes.
    fn transform(&self, changes: &[f64]) -> Vec<f64>;

    /// Returns the name of this transformation.
    fn name(&self) -> &str;
}

impl ReturnTransform for ReturnsType {
    fn transform(&self, changes: &[f64]) -> Vec<f64> {
        match self {
            Self::Simple => changes.to_vec(),
            Self::Cumulative => {
                let mut growth = 1.0;
                changes
                    .iter()
                    .map(|&r| {
                        if r.is_nan() {
                            f64::NAN
                        } else {
                            growth *= 1.0 + r;
                            growth - 1.0
                        }
                    })
                    .collect()
            }
            Self::Log => changes.iter().map(|r| r.ln_1p()).collect(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Simple => "simple",
            Self::Cumulative => "cumulative",
            Self::Log => "log",
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn simple_is_identity() {
        let changes = [0.01, f64::NAN, -0.02];
        let out = ReturnsType::Simple.transform(&changes);
        assert_eq!(out[0], 0.01);
        assert!(out[1].is_nan());
        assert_eq!(out[2], -0.02);
    }

    #[test]
    fn cumulative_compounds_across_gaps() {
        let changes = [f64::NAN, 0.1, f64::NAN, 0.1];
        let out = ReturnsType::Cumulative.transform(&changes);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 0.1, epsilon = 1e-12);
        assert!(out[2].is_nan());
        assert_relative_eq!(out[3], 0.21, epsilon = 1e-12);
    }

    #[test]
    fn log_of_one_plus_change() {
        let out = ReturnsType::Log.transform(&[0.5, 0.0]);
        assert_relative_eq!(out[0], 1.5_f64.ln(), epsilon = 1e-12);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn transform_names() {
        assert_eq!(ReturnTransform::name(&ReturnsType::Cumulative), "cumulative");
    }
}
