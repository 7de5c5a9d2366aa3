//! Linear algebra operations for regression.

use ndarray::{Array1, Array2};

use crate::MathError;

/// Relative pivot size below which a matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Result of an ordinary least squares solve.
#[derive(Debug, Clone)]
pub struct LeastSquaresResult {
    /// Estimated coefficients.
    pub coefficients: Array1<f64>,
    /// Residuals.
    pub residuals: Array1<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// R-squared (centered).
    pub r_squared: f64,
    /// Inverse of the cross-product matrix `(X'X)^-1`.
    pub xtx_inv: Array2<f64>,
}

/// Perform ordinary least squares regression.
///
/// Solves: argmin_beta sum((y_i - X_i * beta)^2) via the normal equations.
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x p)
///
/// # Returns
/// Least squares result with coefficients, residuals and `(X'X)^-1`.
///
/// # Errors
/// Returns error if dimensions mismatch, data is empty or `X'X` is singular.
pub fn least_squares(y: &Array1<f64>, x: &Array2<f64>) -> Result<LeastSquaresResult, MathError> {
    let n = y.len();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n == 0 || x.ncols() == 0 {
        return Err(MathError::EmptyData);
    }

    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);

    let xtx_inv = invert_matrix(&xtx)?;
    let coefficients = xtx_inv.dot(&xty);

    let fitted = x.dot(&coefficients);
    let residuals = y - &fitted;

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ssr: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ssr / ss_tot } else { 0.0 };

    Ok(LeastSquaresResult { coefficients, residuals, ssr, r_squared, xtx_inv })
}

/// Solve a linear system Ax = b using Gaussian elimination with partial pivoting.
///
/// # Errors
/// Returns error if `a` is not square, sizes disagree or `a` is singular.
pub fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }
    let rhs = b.clone().into_shape_with_order((n, 1)).map_err(|e| {
        MathError::LinearAlgebra(format!("cannot reshape right-hand side: {e}"))
    })?;
    let solution = solve_multiple(a, &rhs)?;
    Ok(solution.column(0).to_owned())
}

/// Invert a square matrix.
///
/// # Errors
/// Returns error if `a` is not square or is singular.
pub fn invert_matrix(a: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    solve_multiple(a, &Array2::eye(a.nrows()))
}

/// Solve AX = B for several right-hand sides at once.
fn solve_multiple(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.nrows() });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite matrix entry".to_string()));
    }

    let m = b.ncols();
    let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Err(MathError::Singular { pivot: 0, size: n });
    }

    // Augmented matrix [A | B]
    let mut aug = Array2::zeros((n, n + m));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        for j in 0..m {
            aug[[i, n + j]] = b[[i, j]];
        }
    }

    // Gaussian elimination with partial pivoting
    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val <= SINGULAR_TOLERANCE * scale {
            return Err(MathError::Singular { pivot: col, size: n });
        }

        if max_row != col {
            for j in 0..(n + m) {
                aug.swap([col, j], [max_row, j]);
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..(n + m) {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    // Back substitution
    let mut x = Array2::zeros((n, m));
    for k in 0..m {
        for i in (0..n).rev() {
            let mut sum = aug[[i, n + k]];
            for j in (i + 1)..n {
                sum -= aug[[i, j]] * x[[j, k]];
            }
            x[[i, k]] = sum / aug[[i, i]];
        }
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn ols_simple_regression() {
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let x =
            Array2::from_shape_vec((5, 2), vec![1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0, 5.0])
                .unwrap();

        let result = least_squares(&y, &x).unwrap();

        // Perfect fit: y = 0 + 1*x
        assert_relative_eq!(result.coefficients[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-10);
        assert_relative_eq!(result.ssr, 0.0, epsilon = 1e-18);
    }

    #[test]
    fn ols_noisy_regression() {
        let y = array![1.1, 1.9, 3.2, 3.8, 5.1, 5.9];
        let x = Array2::from_shape_fn((6, 2), |(i, j)| if j == 0 { 1.0 } else { (i + 1) as f64 });

        let result = least_squares(&y, &x).unwrap();

        assert_relative_eq!(result.coefficients[1], 0.98, epsilon = 0.05);
        assert!(result.r_squared > 0.95 && result.r_squared < 1.0);
        assert_eq!(result.residuals.len(), 6);
    }

    #[test]
    fn ols_collinear_columns_are_singular() {
        let y = array![1.0, 2.0, 3.0];
        let x = array![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0]];
        assert!(matches!(least_squares(&y, &x), Err(MathError::Singular { .. })));
    }

    #[test]
    fn ols_dimension_mismatch() {
        let y = array![1.0, 2.0];
        let x = Array2::ones((3, 1));
        assert!(matches!(least_squares(&y, &x), Err(MathError::DimensionMismatch { .. })));
    }

    #[test]
    fn solve_small_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let a = array![[4.0, 7.0, 1.0], [2.0, 6.0, 0.5], [1.0, 0.0, 3.0]];
        let inv = invert_matrix(&a).unwrap();
        let product = a.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn inverse_rejects_non_finite() {
        let a = array![[f64::NAN, 0.0], [0.0, 1.0]];
        assert!(matches!(invert_matrix(&a), Err(MathError::NumericalInstability(_))));
    }
}
