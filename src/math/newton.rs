//! Newton-Raphson (Gauss-Newton) nonlinear least squares.
//!
//! For samples `(xᵢ, yᵢ)` and a model `f(x, p)` the residual vector is
//! `r(p)ᵢ = yᵢ - f(xᵢ, p)`. Each iteration:
//!
//! 1. estimates the Jacobian of `r` by forward differences,
//!    `J[:, k] = (r(p + h·eₖ) - r(p)) / h`
//! 2. solves `J·Δp = -r(p)` by rank-revealing QR
//! 3. updates `p ← p + Δp`
//!
//! and stops once `‖Δp‖` falls to the tolerance. The tolerance is relaxed
//! tenfold after every `RELAX_EVERY` iterations, so ill-conditioned data
//! still terminates; it just converges to a looser answer.

use nalgebra::{DMatrix, DVector};

use crate::math::qr::solve_least_squares_qr;

/// Finite-difference step.
pub const DIFF_STEP: f64 = 1e-5;
/// Initial convergence tolerance on `‖Δp‖`.
pub const INITIAL_TOLERANCE: f64 = 1e-4;
/// Iterations between tolerance relaxations.
pub const RELAX_EVERY: usize = 100;
/// Hard stop; reached only when every step is non-finite or oscillating.
pub const MAX_ITERATIONS: usize = 2_000;

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonSolution {
    pub parameters: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Tolerance in force when the solver stopped.
    pub tolerance: f64,
}

fn residuals<F>(f: &F, xs: &[f64], ys: &[f64], p: &[f64]) -> DVector<f64>
where
    F: Fn(f64, &[f64]) -> f64,
{
    DVector::from_iterator(xs.len(), xs.iter().zip(ys).map(|(&x, &y)| y - f(x, p)))
}

/// Fit `f` to the samples starting from `initial`.
pub fn solve<F>(f: F, xs: &[f64], ys: &[f64], initial: &[f64]) -> NewtonSolution
where
    F: Fn(f64, &[f64]) -> f64,
{
    let mut p = initial.to_vec();
    let mut tolerance = INITIAL_TOLERANCE;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let r = residuals(&f, xs, ys, &p);
        if !r.iter().all(|v| v.is_finite()) {
            break;
        }

        let mut jacobian = DMatrix::zeros(xs.len(), p.len());
        for k in 0..p.len() {
            let mut probe = p.clone();
            probe[k] += DIFF_STEP;
            let shifted = residuals(&f, xs, ys, &probe);
            jacobian.set_column(k, &((shifted - &r) / DIFF_STEP));
        }

        let Some(step) = solve_least_squares_qr(&jacobian, &(-&r)) else {
            break;
        };
        for (value, delta) in p.iter_mut().zip(step.iter()) {
            *value += delta;
        }

        let norm = step.norm();
        if !norm.is_finite() {
            break;
        }
        if norm <= tolerance {
            converged = true;
            break;
        }
        if iterations % RELAX_EVERY == 0 {
            tolerance *= 10.0;
        }
    }

    NewtonSolution {
        parameters: p,
        iterations,
        converged,
        tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_model_converges_quickly() {
        let xs: Vec<f64> = (0..10).map(|i| f64::from(1u32 << i)).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 7.0).collect();
        let sol = solve(|x, p| p[0] * x + p[1], &xs, &ys, &[1.0, 1.0]);
        assert!(sol.converged);
        assert!(sol.iterations <= 5, "took {} iterations", sol.iterations);
        assert!((sol.parameters[0] - 3.0).abs() < 1e-3);
        assert!((sol.parameters[1] - 7.0).abs() < 1e-3);
        assert_eq!(sol.tolerance, INITIAL_TOLERANCE);
    }

    #[test]
    fn exponential_model_converges_from_nearby_guess() {
        let xs: Vec<f64> = (1..=8).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (0.3 * x).exp()).collect();
        let sol = solve(|x, p| p[0] * (p[1] * x).exp(), &xs, &ys, &[1.5, 0.25]);
        assert!(sol.converged);
        assert!((sol.parameters[0] - 2.0).abs() < 1e-3);
        assert!((sol.parameters[1] - 0.3).abs() < 1e-3);
    }

    #[test]
    fn non_finite_model_stops_without_converging() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        let sol = solve(|_, _| f64::NAN, &xs, &ys, &[1.0]);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 1);
    }
}
