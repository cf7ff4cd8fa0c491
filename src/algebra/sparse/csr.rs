#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in Compressed Sparse Row (CSR) format
///
/// Row-major counterpart of [`CscMatrix`](crate::algebra::CscMatrix).
/// Entries within each row should appear in order of increasing
/// column index.

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CsrMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSR format row pointer, length `m+1`
    pub rowptr: Vec<usize>,
    /// vector of column indices
    pub colval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CsrMatrix<T>
where
    T: FloatT,
{
    /// `CsrMatrix` constructor.
    ///
    /// # Panics
    /// Panics if the array lengths are incompatible.
    pub fn new(m: usize, n: usize, rowptr: Vec<usize>, colval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(colval.len(), nzval.len());
        assert_eq!(rowptr.len(), m + 1);
        assert_eq!(rowptr[m], colval.len());
        CsrMatrix {
            m,
            n,
            rowptr,
            colval,
            nzval,
        }
    }
}

impl<T> ShapedMatrix for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T: FloatT> SparseMatrixOps<T> for CsrMatrix<T> {
    fn nnz(&self) -> usize {
        self.rowptr[self.m]
    }

    fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.colval.len() != self.nzval.len()
            || self.rowptr.len() != self.m + 1
            || self.rowptr[self.m] != self.colval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.rowptr.windows(2).any(|r| r[0] > r[1]) {
            return Err(SparseFormatError::BadRowptr);
        }
        if !self.colval.iter().all(|c| c < &self.n) {
            return Err(SparseFormatError::BadColval);
        }
        for row in 0..self.m {
            let rng = self.rowptr[row]..self.rowptr[row + 1];
            if self.colval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        Ok(())
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(usize, usize, T)) {
        for row in 0..self.m {
            for ptr in self.rowptr[row]..self.rowptr[row + 1] {
                f(row, self.colval[ptr], self.nzval[ptr]);
            }
        }
    }

    fn row_to_dense(&self, i: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.n);
        out.fill(T::zero());
        let (first, last) = (self.rowptr[i], self.rowptr[i + 1]);
        for (&col, &v) in zip(&self.colval[first..last], &self.nzval[first..last]) {
            out[col] += v;
        }
    }

    fn col_to_dense(&self, j: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.m);
        out.fill(T::zero());
        for (row, v) in out.iter_mut().enumerate() {
            let (first, last) = (self.rowptr[row], self.rowptr[row + 1]);
            if let Ok(k) = self.colval[first..last].binary_search(&j) {
                *v = self.nzval[first + k];
            }
        }
    }

    fn to_csc(&self) -> CscMatrix<T> {
        // a CSR matrix is the CSC form of its transpose
        let At = CscMatrix::new(
            self.n,
            self.m,
            self.rowptr.clone(),
            self.colval.clone(),
            self.nzval.clone(),
        );
        At.transpose()
    }
}

impl<T: FloatT> MatrixVectorMultiply<T> for CsrMatrix<T> {
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        for (row, yi) in y.iter_mut().enumerate() {
            let (first, last) = (self.rowptr[row], self.rowptr[row + 1]);
            let mut acc = T::zero();
            for (&col, &v) in zip(&self.colval[first..last], &self.nzval[first..last]) {
                acc += v * x[col];
            }
            *yi = if b == T::zero() { a * acc } else { a * acc + b * (*yi) };
        }
    }

    fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.m);
        assert_eq!(y.len(), self.n);

        if b == T::zero() {
            y.fill(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }
        for (row, &xi) in x.iter().enumerate() {
            let axi = a * xi;
            for ptr in self.rowptr[row]..self.rowptr[row + 1] {
                y[self.colval[ptr]] += self.nzval[ptr] * axi;
            }
        }
    }
}

impl<T: FloatT> MatrixMath<T> for CsrMatrix<T> {
    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        norms.fill(T::zero());
        for (col, val) in zip(&self.colval, &self.nzval) {
            norms[*col] = T::max(norms[*col], T::abs(*val));
        }
    }

    fn row_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.m);
        for (i, v) in norms.iter_mut().enumerate() {
            *v = self.nzval[self.rowptr[i]..self.rowptr[i + 1]]
                .iter()
                .fold(T::zero(), |m, &nzval| T::max(m, T::abs(nzval)));
        }
    }

    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(l.len(), self.m);
        assert_eq!(r.len(), self.n);

        for (row, &li) in l.iter().enumerate() {
            let (first, last) = (self.rowptr[row], self.rowptr[row + 1]);
            let vals = &mut self.nzval[first..last];
            let cols = &self.colval[first..last];
            for (val, col) in zip(vals, cols) {
                *val *= li * r[*col];
            }
        }
    }

    fn is_finite(&self) -> bool {
        self.nzval.is_finite()
    }
}

#[test]
fn test_csr_to_csc() {
    // A = [1. 0. 2.]
    //     [0. 3. 0.]
    let A = CsrMatrix::<f64>::new(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1., 2., 3.]);
    assert!(A.check_format().is_ok());

    let B = A.to_csc();
    assert_eq!(B, CscMatrix::<f64>::from(&[[1., 0., 2.], [0., 3., 0.]]));

    let mut y = [1., 1.];
    A.gemv(&mut y, &[1., 1., 1.], 1.0, -1.0);
    assert_eq!(y, [2., 2.]);

    let mut c = [0.; 2];
    A.col_to_dense(2, &mut c);
    assert_eq!(c, [2., 0.]);
}
