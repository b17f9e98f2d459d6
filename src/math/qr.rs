//! Rank-revealing least squares.
//!
//! Solves `minimize ‖A·x - b‖²` for a tall or square `A` using a
//! column-pivoted QR decomposition:
//!
//! ```text
//! A·P = Q·R   =>   R·(Pᵀx) = Qᵀb
//! ```
//!
//! Nalgebra's `ColPivQR::solve` only handles square systems, so the
//! triangular solve is done here. Columns whose pivot is negligible next to
//! the largest one are treated as dependent and their components set to
//! zero, which yields a basic solution for rank-deficient Jacobians instead
//! of blowing up.

use nalgebra::{DMatrix, DVector};

/// Relative size below which a pivot counts as zero.
const RANK_TOL: f64 = 1e-12;

/// Least-squares solution of `a·x = b`, or `None` if it is not finite.
pub fn solve_least_squares_qr(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let cols = a.ncols();
    if a.nrows() != b.len() || cols == 0 {
        return None;
    }

    let qr = a.clone().col_piv_qr();
    let q = qr.q();
    let r = qr.r();
    let qtb = q.transpose() * b;

    let k = r.nrows().min(cols);
    let largest = (0..k).map(|i| r[(i, i)].abs()).fold(0.0, f64::max);
    let mut x = DVector::zeros(cols);
    if largest == 0.0 || !largest.is_finite() {
        return Some(x);
    }

    let rank = (0..k)
        .take_while(|&i| r[(i, i)].abs() > largest * RANK_TOL)
        .count();

    // Back substitution over the well-conditioned leading block.
    for i in (0..rank).rev() {
        let tail: f64 = (i + 1..rank).map(|j| r[(i, j)] * x[j]).sum();
        x[i] = (qtb[i] - tail) / r[(i, i)];
    }

    qr.p().inv_permute_rows(&mut x);
    x.iter().all(|v| v.is_finite()).then_some(x)
}
