//! Numerical curvature of likelihood surfaces.

use ndarray::Array2;

/// Central-difference Hessian of `f` at `x`.
///
/// Step sizes scale with the magnitude of each coordinate.
#[must_use]
pub fn numerical_hessian<F>(f: F, x: &[f64]) -> Array2<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x.len();
    let h: Vec<f64> = x.iter().map(|v| 1e-4 * v.abs().max(1e-2)).collect();
    let f0 = f(x);
    let mut hessian = Array2::zeros((n, n));

    let shifted = |moves: &[(usize, f64)]| {
        let mut p = x.to_vec();
        for &(i, d) in moves {
            p[i] += d;
        }
        f(&p)
    };

    for i in 0..n {
        let plus = shifted(&[(i, h[i])]);
        let minus = shifted(&[(i, -h[i])]);
        hessian[[i, i]] = (plus - 2.0 * f0 + minus) / (h[i] * h[i]);

        for j in (i + 1)..n {
            let pp = shifted(&[(i, h[i]), (j, h[j])]);
            let pm = shifted(&[(i, h[i]), (j, -h[j])]);
            let mp = shifted(&[(i, -h[i]), (j, h[j])]);
            let mm = shifted(&[(i, -h[i]), (j, -h[j])]);
            let value = (pp - pm - mp + mm) / (4.0 * h[i] * h[j]);
            hessian[[i, j]] = value;
            hessian[[j, i]] = value;
        }
    }

    hessian
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hessian_of_quadratic() {
        let f = |x: &[f64]| 3.0 * x[0] * x[0] + 2.0 * x[0] * x[1] + x[1] * x[1];
        let h = numerical_hessian(f, &[0.5, -0.25]);
        assert_relative_eq!(h[[0, 0]], 6.0, epsilon = 1e-4);
        assert_relative_eq!(h[[0, 1]], 2.0, epsilon = 1e-4);
        assert_relative_eq!(h[[1, 0]], 2.0, epsilon = 1e-4);
        assert_relative_eq!(h[[1, 1]], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn hessian_steps_scale_with_the_point() {
        // d2/dx2 exp(x / 1000) = exp(x / 1000) / 1e6
        let f = |x: &[f64]| (x[0] / 1000.0).exp();
        let h = numerical_hessian(f, &[2000.0]);
        assert_relative_eq!(h[[0, 0]], 2.0_f64.exp() * 1e-6, max_relative = 1e-4);
    }
}
