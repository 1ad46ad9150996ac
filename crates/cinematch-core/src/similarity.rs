//! All-pairs sigmoid-kernel similarity.
//!
//! Every pair of TF-IDF rows is scored with
//! `tanh(coef · dot(row_i, row_j) + intercept)`. The result is a dense,
//! symmetric `n × n` matrix computed once before any query is served; it
//! is the dominant `O(n² · d)` cost of the whole pipeline.

use std::ops::ControlFlow;

use crate::vectorize::{sparse_dot, TfidfMatrix};

/// Bounded non-linear kernel over the dot product of two rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidKernel {
    pub coef: f64,
    pub intercept: f64,
}

impl Default for SigmoidKernel {
    fn default() -> Self {
        Self {
            coef: 1.0,
            intercept: 0.0,
        }
    }
}

impl SigmoidKernel {
    /// Apply the kernel to a precomputed dot product.
    pub fn apply(&self, dot: f64) -> f64 {
        (self.coef * dot + self.intercept).tanh()
    }
}

/// Receives progress while the similarity matrix is being built.
///
/// Returning [`ControlFlow::Break`] from [`row_done`](BuildObserver::row_done)
/// stops the build.
pub trait BuildObserver {
    /// Called after row `row` (0-based) of `total` has been scored.
    fn row_done(&mut self, row: usize, total: usize) -> ControlFlow<()>;
}

/// Observer that ignores progress and never cancels.
pub struct NoObserver;

impl BuildObserver for NoObserver {
    fn row_done(&mut self, _row: usize, _total: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> BuildObserver for F
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    fn row_done(&mut self, row: usize, total: usize) -> ControlFlow<()> {
        self(row, total)
    }
}

/// Dense, row-major `n × n` similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Number of items (rows and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// All `n` similarity scores of item `i`, indexed by row.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Compute the similarity matrix for every pair of rows in `matrix`.
pub fn compute(matrix: &TfidfMatrix, kernel: &SigmoidKernel) -> SimilarityMatrix {
    compute_with_observer(matrix, kernel, &mut NoObserver).unwrap_or_default()
}

/// Like [`compute`], reporting each finished row to `observer`.
///
/// Returns `None` if the observer cancelled the build.
pub fn compute_with_observer<O: BuildObserver + ?Sized>(
    matrix: &TfidfMatrix,
    kernel: &SigmoidKernel,
    observer: &mut O,
) -> Option<SimilarityMatrix> {
    let n = matrix.n_rows();
    let rows = matrix.rows();
    let mut data = vec![0.0f64; n * n];

    // Upper triangle only; the kernel is symmetric in its inputs.
    for i in 0..n {
        for j in i..n {
            let score = kernel.apply(sparse_dot(&rows[i], &rows[j]));
            data[i * n + j] = score;
            data[j * n + i] = score;
        }
        if observer.row_done(i, n).is_break() {
            tracing::info!(row = i, total = n, "similarity build cancelled");
            return None;
        }
    }

    Some(SimilarityMatrix { n, data })
}
