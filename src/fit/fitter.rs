//! Fit one growth model to `(scale, time)` samples.
//!
//! The solve itself is [`crate::math::newton::solve`]; this module decides
//! whether the outcome is usable and packages it as a [`MathEquation`].
//!
//! A fit is marked invalid (never an error) when:
//! - the solver did not converge or produced non-finite parameters
//! - the leading parameter is negligible (`|a| < 1e-3`), i.e. the model's
//!   characteristic term contributes nothing
//! - R² is `NaN` or `-inf`, which happens when every sample is identical
//! - there are no more samples than parameters

use serde::Serialize;

use crate::error::BenchError;
use crate::math::newton;
use crate::models::MathModel;

/// Leading-parameter magnitude below which a fit is degenerate.
pub const MIN_LEADING_PARAMETER: f64 = 1e-3;

/// A fitted instance of a [`MathModel`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MathEquation {
    model: MathModel,
    parameters: Vec<f64>,
    r_squared: f64,
    valid: bool,
    iterations: usize,
}

impl MathEquation {
    pub fn model(&self) -> MathModel {
        self.model
    }

    pub fn model_name(&self) -> String {
        self.model.name()
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Coefficient of determination, `1 - SSres/SStot`.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Solver iterations spent on this fit.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The fitted formula, e.g. `3.000000 * n + 7.000000`.
    pub fn description(&self) -> String {
        self.model.describe(&self.parameters)
    }

    pub fn evaluate(&self, n: f64) -> f64 {
        self.model.evaluate(n, &self.parameters)
    }

    pub fn function(&self) -> impl Fn(f64) -> f64 + Send + Sync {
        self.model.function(self.parameters.clone())
    }
}

impl std::fmt::Display for MathEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} with precision {:.6}", self.description(), self.r_squared)
    }
}

/// Reject sample sets that cannot be fitted at all.
pub(crate) fn check_samples(xs: &[f64], ys: &[f64]) -> Result<(), BenchError> {
    if xs.len() != ys.len() {
        return Err(BenchError::SampleMismatch {
            scales: xs.len(),
            timings: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(BenchError::NoSamples);
    }
    Ok(())
}

/// `1 - SSres/SStot` of `model(params)` against the samples.
pub fn r_squared(model: MathModel, params: &[f64], xs: &[f64], ys: &[f64]) -> f64 {
    let mean = ys.iter().sum::<f64>() / ys.len() as f64;
    let (ss_res, ss_tot) = xs.iter().zip(ys).fold((0.0, 0.0), |(res, tot), (&x, &y)| {
        let fitted = model.evaluate(x, params);
        (res + (y - fitted).powi(2), tot + (y - mean).powi(2))
    });
    1.0 - ss_res / ss_tot
}

/// Fit `model` to the samples by Newton-Raphson least squares.
pub fn fit_model(model: MathModel, xs: &[f64], ys: &[f64]) -> Result<MathEquation, BenchError> {
    check_samples(xs, ys)?;

    let solution = newton::solve(|x, p| model.evaluate(x, p), xs, ys, &model.initial());
    let parameters = solution.parameters;
    let r2 = r_squared(model, &parameters, xs, ys);

    let finite = parameters.iter().all(|p| p.is_finite());
    let leading = parameters.first().copied().unwrap_or(0.0);
    let valid = solution.converged
        && finite
        && leading.abs() >= MIN_LEADING_PARAMETER
        && !r2.is_nan()
        && r2 != f64::NEG_INFINITY
        && xs.len() > model.param_count();

    tracing::debug!(
        model = %model,
        iterations = solution.iterations,
        converged = solution.converged,
        r_squared = r2,
        valid,
        "fitted growth model"
    );

    Ok(MathEquation {
        model,
        parameters,
        r_squared: r2,
        valid,
        iterations: solution.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling(count: u32) -> Vec<f64> {
        (0..count).map(|i| f64::from(1u32 << i)).collect()
    }

    #[test]
    fn exact_line_round_trips() {
        let xs = doubling(11);
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 7.0).collect();
        let eq = fit_model(MathModel::LINEAR, &xs, &ys).unwrap();
        assert!(eq.is_valid());
        assert!((eq.parameters()[0] - 3.0).abs() < 1e-3);
        assert!((eq.parameters()[1] - 7.0).abs() < 1e-3);
        assert!(eq.r_squared() > 0.999);
        assert!((eq.evaluate(2048.0) - 6_151.0).abs() < 1.0);
    }

    #[test]
    fn quadratic_least_squares() {
        let xs = [42.0, 107.0, 73.0, 120.0];
        let ys = [511.0, 312.0, 400.0, 242.0];
        let eq = fit_model(MathModel::N_SQUARED, &xs, &ys).unwrap();
        let expected = [-0.0021060, -2.947499, 635.60559];
        for (got, want) in eq.parameters().iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "{:?}", eq.parameters());
        }
        assert!(eq.is_valid());
    }

    #[test]
    fn flat_timings_have_negligible_slope() {
        let xs = doubling(20);
        let ys = [
            905.0, 901.0, 939.0, 927.0, 920.0, 898.0, 884.0, 861.0, 852.0, 864.0, 869.0, 867.0,
            866.0, 867.0, 857.0, 857.0, 854.0, 855.0, 872.0, 865.0,
        ];
        let eq = fit_model(MathModel::LINEAR, &xs, &ys).unwrap();
        assert!((eq.parameters()[0] - -0.000048924907).abs() < 1e-3);
        assert!((eq.parameters()[1] - 881.5650).abs() < 1e-3);
        assert!(!eq.is_valid(), "slope below threshold");
    }

    #[test]
    fn constant_timings_are_degenerate() {
        let xs = doubling(8);
        let ys = vec![500.0; 8];
        for model in MathModel::CATALOGUE {
            let eq = fit_model(model, &xs, &ys).unwrap();
            assert!(!eq.is_valid(), "{model} should be invalid");
        }
    }

    #[test]
    fn underdetermined_fit_is_invalid() {
        let eq = fit_model(MathModel::N_SQUARED, &[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0]).unwrap();
        assert!(!eq.is_valid());
    }

    #[test]
    fn sample_shape_errors() {
        assert_eq!(
            fit_model(MathModel::LINEAR, &[1.0, 2.0], &[1.0]),
            Err(BenchError::SampleMismatch { scales: 2, timings: 1 })
        );
        assert_eq!(fit_model(MathModel::LINEAR, &[], &[]), Err(BenchError::NoSamples));
    }

    #[test]
    fn display_includes_precision() {
        let xs = doubling(6);
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let eq = fit_model(MathModel::LINEAR, &xs, &ys).unwrap();
        assert!(eq.to_string().starts_with("2.000000 * n + 1.000000 with precision"));
        assert_eq!(eq.model_name(), "linear");
    }
}
