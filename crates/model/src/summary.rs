//! Comma-separated result summaries.

use std::fmt::Write;

use greenbond_primitives::{FundName, RegressionFit, VolatilityFit};

/// Render an OLS fit as comma-separated text.
///
/// A header block of `label,value` rows is followed by a blank line and the
/// coefficient table.
#[must_use]
pub fn regression_summary(fund: &FundName, fit: &RegressionFit) -> String {
    let k = fit.n_regressors() as f64;
    let n = fit.n_obs as f64;
    let aic = 2.0f64.mul_add(k, -2.0 * fit.log_likelihood);
    let bic = k.mul_add(n.ln(), -2.0 * fit.log_likelihood);

    let mut out = String::from("OLS Regression Results\n");
    let header = [
        ("Dep. Variable:", fund.to_string()),
        ("Model:", "OLS".to_string()),
        ("No. Observations:", fit.n_obs.to_string()),
        ("Df Residuals:", fit.df_resid.to_string()),
        ("Df Model:", fit.n_regressors().saturating_sub(1).to_string()),
        ("R-squared:", number(fit.r_squared)),
        ("Adj. R-squared:", number(fit.adj_r_squared)),
        ("Log-Likelihood:", number(fit.log_likelihood)),
        ("AIC:", number(aic)),
        ("BIC:", number(bic)),
    ];
    push_header(&mut out, &header);

    out.push_str(",coef,std err,t,P>|t|\n");
    for (i, name) in fit.regressors.iter().enumerate() {
        push_row(
            &mut out,
            name,
            [fit.coefficients[i], fit.std_errors[i], fit.t_values[i], fit.p_values[i]],
        );
    }
    out
}

/// Render a volatility fit as comma-separated text.
#[must_use]
pub fn volatility_summary(fund: &FundName, fit: &VolatilityFit) -> String {
    let mut out = format!("{} Model Results\n", fit.model);
    let header = [
        ("Dep. Variable:", fund.to_string()),
        ("Model:", fit.model.clone()),
        ("Distribution:", "Normal".to_string()),
        ("Method:", "Maximum Likelihood".to_string()),
        ("No. Observations:", fit.n_obs.to_string()),
        ("Log-Likelihood:", number(fit.log_likelihood)),
        ("AIC:", number(fit.aic)),
        ("BIC:", number(fit.bic)),
        ("Iterations:", fit.iterations.to_string()),
    ];
    push_header(&mut out, &header);

    out.push_str(",coef,std err,t,P>|t|\n");
    for p in &fit.params {
        push_row(&mut out, &p.name, [p.value, p.std_error, p.t_value, p.p_value]);
    }
    out.push_str("Covariance estimator: inverse Hessian\n");
    out
}

fn push_header(out: &mut String, rows: &[(&str, String)]) {
    for (label, value) in rows {
        let _ = writeln!(out, "{label},{value}");
    }
    out.push('\n');
}

fn push_row(out: &mut String, name: &str, values: [f64; 4]) {
    let cells: Vec<String> = values.iter().map(|v| number(*v)).collect();
    let _ = writeln!(out, "{name},{}", cells.join(","));
}

/// Fixed notation for moderate magnitudes, scientific otherwise.
fn number(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == 0.0 || (1e-3..1e6).contains(&v.abs()) {
        format!("{v:.6}")
    } else {
        format!("{v:.4e}")
    }
}
