//! Growth basis functions shared by the model catalogue.
//!
//! Scales are positive integers, but the solver may probe any real `n`
//! while estimating derivatives, so the logarithmic forms clamp their input
//! away from zero instead of returning `-inf`/`NaN`.
//!
//! Logarithms are base 10; the base only rescales the fitted coefficient.

/// Smallest argument fed to a logarithm.
const N_EPS: f64 = 1e-12;

/// `log10(n)`, with `n` clamped to a tiny positive value.
pub fn log_n(n: f64) -> f64 {
    n.max(N_EPS).log10()
}

/// `n · log10(n)`; tends to `0` as `n → 0`.
pub fn n_log_n(n: f64) -> f64 {
    if n <= N_EPS {
        return 0.0;
    }
    n * n.log10()
}

/// Evaluate a polynomial whose coefficients are listed highest power first.
///
/// Horner form: `[a, b, c]` is `a·n² + b·n + c`.
pub fn horner(coefficients: &[f64], n: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * n + c)
}
