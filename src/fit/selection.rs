//! Growth-model ranking.
//!
//! Every candidate model is fitted independently (in parallel), then the
//! equations are ordered:
//!
//! 1. valid fits before invalid ones
//! 2. higher R² first (`NaN` ranks last)
//! 3. ties broken by the candidate's position in the input list
//!
//! The best fit is the first valid equation. When nothing validates the
//! constant model is reported instead, so detection never fails on
//! degenerate timings.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::BenchError;
use crate::fit::fitter::{MathEquation, check_samples, fit_model};
use crate::models::MathModel;

fn rank_key(eq: &MathEquation) -> f64 {
    if eq.r_squared().is_nan() {
        f64::NEG_INFINITY
    } else {
        eq.r_squared()
    }
}

/// Fit each of `models` and return the equations best-first.
pub fn rank_models(
    models: &[MathModel],
    xs: &[f64],
    ys: &[f64],
) -> Result<Vec<MathEquation>, BenchError> {
    check_samples(xs, ys)?;

    let mut fitted: Vec<(usize, MathEquation)> = models
        .par_iter()
        .enumerate()
        .map(|(idx, &model)| fit_model(model, xs, ys).map(|eq| (idx, eq)))
        .collect::<Result<_, _>>()?;

    fitted.sort_by(|(ia, a), (ib, b)| compare_equations(a, b).then_with(|| ia.cmp(ib)));
    Ok(fitted.into_iter().map(|(_, eq)| eq).collect())
}

/// Rank the whole catalogue.
pub fn rank_catalogue(xs: &[f64], ys: &[f64]) -> Result<Vec<MathEquation>, BenchError> {
    rank_models(&MathModel::CATALOGUE, xs, ys)
}

/// The best valid equation, or the constant model's equation if none is valid.
pub fn select_best(ranked: Vec<MathEquation>) -> Option<MathEquation> {
    if ranked.first().is_some_and(MathEquation::is_valid) {
        return ranked.into_iter().next();
    }
    ranked
        .into_iter()
        .find(|eq| eq.model() == MathModel::CONSTANT)
}

/// Fit the catalogue and pick the best equation.
pub fn best_fit(xs: &[f64], ys: &[f64]) -> Result<MathEquation, BenchError> {
    let ranked = rank_catalogue(xs, ys)?;
    match select_best(ranked) {
        Some(eq) => Ok(eq),
        None => fit_model(MathModel::CONSTANT, xs, ys),
    }
}

/// Order two equations the way [`rank_models`] does, ignoring input position.
pub fn compare_equations(a: &MathEquation, b: &MathEquation) -> Ordering {
    b.is_valid()
        .cmp(&a.is_valid())
        .then_with(|| rank_key(b).total_cmp(&rank_key(a)))
}
