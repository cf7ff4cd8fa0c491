//! Sparse matrix formats accepted for problem data.
//!
//! Problem data can be supplied in compressed sparse column, compressed
//! sparse row or triplet (coordinate) format.  The tagged
//! [`SparseMatrix`] wrapper dispatches each matrix operation once on the
//! variant, so all solver internals are written against the common
//! traits rather than a particular storage scheme.

use crate::algebra::*;
use enum_dispatch::*;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

mod csc;
mod csr;
mod triplet;
pub use csc::*;
pub use csr::*;
pub use triplet::*;

/// A sparse matrix in any of the supported storage formats.
///
/// Conversions `From` each of the concrete formats are provided, so
/// any of them can be passed where a `SparseMatrix` is expected
/// using `.into()`.
#[enum_dispatch(ShapedMatrix, MatrixVectorMultiply<T>, MatrixMath<T>, SparseMatrixOps<T>)]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub enum SparseMatrix<T: FloatT> {
    Csc(CscMatrix<T>),
    Csr(CsrMatrix<T>),
    Triplet(TripletMatrix<T>),
}

impl<T> SparseMatrix<T>
where
    T: FloatT,
{
    /// Storage format name
    pub fn format_name(&self) -> &'static str {
        match self {
            SparseMatrix::Csc(_) => "csc",
            SparseMatrix::Csr(_) => "csr",
            SparseMatrix::Triplet(_) => "triplet",
        }
    }
}

#[test]
fn test_sparse_dispatch() {
    // the same 2x3 matrix in all three formats
    //  [1. 0. 2.]
    //  [0. 3. 0.]
    let csc: SparseMatrix<f64> = CscMatrix::from(&[[1., 0., 2.], [0., 3., 0.]]).into();
    let csr: SparseMatrix<f64> =
        CsrMatrix::new(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1., 2., 3.]).into();
    let trp: SparseMatrix<f64> =
        TripletMatrix::new(2, 3, vec![1, 0, 0], vec![1, 2, 0], vec![3., 2., 1.]).into();

    let x = [1., -1., 2.];
    for M in [&csc, &csr, &trp] {
        assert_eq!(M.size(), (2, 3));
        assert_eq!(M.nnz(), 3);
        assert!(M.check_format().is_ok());

        let mut y = [0.; 2];
        M.gemv(&mut y, &x, 1.0, 0.0);
        assert_eq!(y, [5., -3.]);

        let mut z = [0.; 3];
        M.gemv_t(&mut z, &[1., 1.], 1.0, 0.0);
        assert_eq!(z, [1., 3., 2.]);

        let mut r = [0.; 3];
        M.row_to_dense(0, &mut r);
        assert_eq!(r, [1., 0., 2.]);

        let mut norms = [0.; 3];
        M.col_norms(&mut norms);
        assert_eq!(norms, [1., 3., 2.]);

        assert_eq!(M.to_csc(), csc.to_csc());
    }
    assert_eq!(trp.format_name(), "triplet");
}
