//! Growth-model evaluation.
//!
//! The fitter only needs three things from a model: how many parameters it
//! takes, where the solver should start, and `f(n, p)`. Each is a `match`
//! over [`MathModel`], so adding a family means adding one arm per method.

use serde::{Deserialize, Serialize};

use crate::math::{horner, log_n, n_log_n};

/// A parametric growth-function family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathModel {
    /// `a`
    Constant,
    /// `a·n + b`
    Linear,
    /// `a·n^d + … + c`, `d ≥ 2`.
    Polynomial(u8),
    /// `a·log10(n) + b`
    LogN,
    /// `a·n·log10(n) + b`
    NLogN,
    /// `a·e^(b·n)`
    Exponential,
}

impl MathModel {
    pub const CONSTANT: MathModel = MathModel::Constant;
    pub const LINEAR: MathModel = MathModel::Linear;
    pub const N_SQUARED: MathModel = MathModel::Polynomial(2);
    pub const LOG_N: MathModel = MathModel::LogN;
    pub const N_LOG_N: MathModel = MathModel::NLogN;
    pub const EXPONENTIAL: MathModel = MathModel::Exponential;

    /// Every model tried by growth detection, in tie-break order.
    pub const CATALOGUE: [MathModel; 8] = [
        MathModel::Constant,
        MathModel::Linear,
        MathModel::Polynomial(2),
        MathModel::Polynomial(3),
        MathModel::Polynomial(4),
        MathModel::LogN,
        MathModel::NLogN,
        MathModel::Exponential,
    ];

    /// Polynomial of the given degree; degrees 0 and 1 are the constant and
    /// linear models.
    pub fn polynomial(degree: u8) -> MathModel {
        match degree {
            0 => MathModel::Constant,
            1 => MathModel::Linear,
            d => MathModel::Polynomial(d),
        }
    }

    pub fn name(self) -> String {
        match self {
            MathModel::Constant => "constant".to_string(),
            MathModel::Linear => "linear".to_string(),
            MathModel::Polynomial(2) => "n squared".to_string(),
            MathModel::Polynomial(d) => format!("n^{d}"),
            MathModel::LogN => "log n".to_string(),
            MathModel::NLogN => "n log n".to_string(),
            MathModel::Exponential => "exponential".to_string(),
        }
    }

    pub fn param_count(self) -> usize {
        match self {
            MathModel::Constant => 1,
            MathModel::Polynomial(d) => usize::from(d) + 1,
            MathModel::Linear | MathModel::LogN | MathModel::NLogN | MathModel::Exponential => 2,
        }
    }

    /// Starting point for the solver.
    pub fn initial(self) -> Vec<f64> {
        match self {
            MathModel::Polynomial(d) => {
                let mut p = vec![0.0; usize::from(d) + 1];
                p[0] = 1.0;
                p
            }
            MathModel::Exponential => vec![1.0, 0.01],
            other => vec![1.0; other.param_count()],
        }
    }

    /// `f(n, params)`.
    ///
    /// `params` must hold `param_count()` values; missing trailing values
    /// read as zero.
    pub fn evaluate(self, n: f64, params: &[f64]) -> f64 {
        let p = |i: usize| params.get(i).copied().unwrap_or(0.0);
        match self {
            MathModel::Constant => p(0),
            MathModel::Linear => p(0) * n + p(1),
            MathModel::Polynomial(_) => horner(params, n),
            MathModel::LogN => p(0) * log_n(n) + p(1),
            MathModel::NLogN => p(0) * n_log_n(n) + p(1),
            MathModel::Exponential => p(0) * (p(1) * n).exp(),
        }
    }

    /// Bind `params`, yielding `n ↦ f(n, params)`.
    pub fn function(self, params: Vec<f64>) -> impl Fn(f64) -> f64 + Send + Sync {
        move |n| self.evaluate(n, &params)
    }

    /// Human-readable formula with `params` substituted.
    pub fn describe(self, params: &[f64]) -> String {
        let p = |i: usize| params.get(i).copied().unwrap_or(0.0);
        match self {
            MathModel::Constant => format!("{:.6}", p(0)),
            MathModel::Linear => format!("{:.6} * n + {:.6}", p(0), p(1)),
            MathModel::Polynomial(d) => {
                let degree = usize::from(d);
                (0..=degree)
                    .map(|i| match degree - i {
                        0 => format!("{:.6}", p(i)),
                        1 => format!("{:.6}*n", p(i)),
                        power => format!("{:.6}*n^{power}", p(i)),
                    })
                    .collect::<Vec<_>>()
                    .join(" + ")
            }
            MathModel::LogN => format!("{:.6} * log n + {:.6}", p(0), p(1)),
            MathModel::NLogN => format!("{:.6} * n log n + {:.6}", p(0), p(1)),
            MathModel::Exponential => format!("{:.6} * e^({:.6} * n)", p(0), p(1)),
        }
    }
}

impl std::fmt::Display for MathModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
