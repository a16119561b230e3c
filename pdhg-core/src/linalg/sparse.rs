//! Sparse constraint operator.
//!
//! The constraint matrix A is stored twice in CSR (Compressed Sparse Row)
//! format: once as A and once as Aᵀ. Both products Av and Aᵀw then become
//! row-wise dot products whose cost is proportional to nnz(A).

use sprs::{CsMat, TriMat};

use crate::error::ShapeError;

/// Sparse matrix in CSR format.
pub type SparseCsr = CsMat<f64>;

/// Immutable linear operator for A and Aᵀ.
#[derive(Debug, Clone)]
pub struct SparseOperator {
    a: SparseCsr,
    a_t: SparseCsr,
}

impl SparseOperator {
    /// Build the operator from parallel triplet arrays.
    ///
    /// Duplicate (row, col) entries are summed. Fails if the arrays differ in
    /// length or if any index lies outside `nrows × ncols`.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> Result<Self, ShapeError> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(ShapeError::TripletLengthMismatch {
                rows: rows.len(),
                cols: cols.len(),
                values: values.len(),
            });
        }

        let mut tri = TriMat::with_capacity((nrows, ncols), values.len());
        let mut tri_t = TriMat::with_capacity((ncols, nrows), values.len());
        for (k, ((&i, &j), &v)) in rows.iter().zip(cols).zip(values).enumerate() {
            if i >= nrows || j >= ncols {
                return Err(ShapeError::IndexOutOfBounds {
                    index: k,
                    row: i,
                    col: j,
                    nrows,
                    ncols,
                });
            }
            tri.add_triplet(i, j, v);
            tri_t.add_triplet(j, i, v);
        }

        Ok(Self {
            a: tri.to_csr(),
            a_t: tri_t.to_csr(),
        })
    }

    /// Number of rows (m).
    pub fn rows(&self) -> usize {
        self.a.rows()
    }

    /// Number of columns (n).
    pub fn cols(&self) -> usize {
        self.a.cols()
    }

    /// Number of stored nonzeros after duplicate summation.
    pub fn nnz(&self) -> usize {
        self.a.nnz()
    }

    /// Return a copy of the operator with every entry multiplied by `alpha`.
    pub fn scaled(&self, alpha: f64) -> Self {
        Self {
            a: self.a.map(|&v| alpha * v),
            a_t: self.a_t.map(|&v| alpha * v),
        }
    }

    /// Sparse matrix-vector product: y = alpha * A * x + beta * y
    pub fn spmv(&self, x: &[f64], y: &mut [f64], alpha: f64, beta: f64) {
        csr_spmv(&self.a, x, y, alpha, beta);
    }

    /// Transpose-vector product: y = alpha * A^T * x + beta * y
    pub fn spmv_transpose(&self, x: &[f64], y: &mut [f64], alpha: f64, beta: f64) {
        csr_spmv(&self.a_t, x, y, alpha, beta);
    }

    /// Compute Av.
    pub fn apply(&self, v: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.rows()];
        self.spmv(v, &mut out, 1.0, 0.0);
        out
    }

    /// Compute Aᵀw.
    pub fn apply_transpose(&self, w: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.cols()];
        self.spmv_transpose(w, &mut out, 1.0, 0.0);
        out
    }
}

fn csr_spmv(a: &SparseCsr, x: &[f64], y: &mut [f64], alpha: f64, beta: f64) {
    assert_eq!(a.cols(), x.len());
    assert_eq!(a.rows(), y.len());

    for (yi, row) in y.iter_mut().zip(a.outer_iterator()) {
        let dot: f64 = row.iter().map(|(j, &v)| v * x[j]).sum();
        // beta == 0 must overwrite, so stale NaN in y never leaks through
        *yi = if beta == 0.0 {
            alpha * dot
        } else {
            alpha * dot + beta * *yi
        };
    }
}
