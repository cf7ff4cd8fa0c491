#![allow(non_snake_case)]

use crate::algebra::*;
use itertools::izip;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in coordinate (triplet) format
///
/// Entries may appear in any order.  Repeated `(row,col)`
/// pairs are summed by every operation.

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct TripletMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// row index of each entry
    pub rows: Vec<usize>,
    /// column index of each entry
    pub cols: Vec<usize>,
    /// value of each entry
    pub vals: Vec<T>,
}

impl<T> TripletMatrix<T>
where
    T: FloatT,
{
    /// `TripletMatrix` constructor.
    ///
    /// # Panics
    /// Panics if the index and value arrays have different lengths.
    pub fn new(m: usize, n: usize, rows: Vec<usize>, cols: Vec<usize>, vals: Vec<T>) -> Self {
        assert_eq!(rows.len(), vals.len());
        assert_eq!(cols.len(), vals.len());
        TripletMatrix {
            m,
            n,
            rows,
            cols,
            vals,
        }
    }

    /// Append an entry
    pub fn push(&mut self, row: usize, col: usize, val: T) {
        self.rows.push(row);
        self.cols.push(col);
        self.vals.push(val);
    }
}

impl<T> ShapedMatrix for TripletMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T: FloatT> SparseMatrixOps<T> for TripletMatrix<T> {
    fn nnz(&self) -> usize {
        self.vals.len()
    }

    fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rows.len() != self.vals.len() || self.cols.len() != self.vals.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if !self.rows.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }
        if !self.cols.iter().all(|c| c < &self.n) {
            return Err(SparseFormatError::BadColval);
        }
        Ok(())
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(usize, usize, T)) {
        for (&r, &c, &v) in izip!(&self.rows, &self.cols, &self.vals) {
            f(r, c, v);
        }
    }

    fn row_to_dense(&self, i: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.n);
        out.fill(T::zero());
        for (&r, &c, &v) in izip!(&self.rows, &self.cols, &self.vals) {
            if r == i {
                out[c] += v;
            }
        }
    }

    fn col_to_dense(&self, j: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.m);
        out.fill(T::zero());
        for (&r, &c, &v) in izip!(&self.rows, &self.cols, &self.vals) {
            if c == j {
                out[r] += v;
            }
        }
    }

    fn to_csc(&self) -> CscMatrix<T> {
        // order entries by column, then by row within each column
        let mut order: Vec<usize> = (0..self.vals.len()).collect();
        order.sort_by_key(|&k| (self.cols[k], self.rows[k]));

        let mut colptr = vec![0; self.n + 1];
        let mut rowval: Vec<usize> = Vec::with_capacity(order.len());
        let mut nzval: Vec<T> = Vec::with_capacity(order.len());
        let mut lastcol = usize::MAX;

        for k in order {
            let (r, c, v) = (self.rows[k], self.cols[k], self.vals[k]);
            if c == lastcol && rowval.last() == Some(&r) {
                // duplicate entry
                if let Some(last) = nzval.last_mut() {
                    *last += v;
                }
                continue;
            }
            rowval.push(r);
            nzval.push(v);
            colptr[c + 1] += 1;
            lastcol = c;
        }
        for col in 0..self.n {
            colptr[col + 1] += colptr[col];
        }
        CscMatrix::new(self.m, self.n, colptr, rowval, nzval)
    }
}

impl<T: FloatT> MatrixVectorMultiply<T> for TripletMatrix<T> {
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        if b == T::zero() {
            y.fill(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }
        for (&r, &c, &v) in izip!(&self.rows, &self.cols, &self.vals) {
            y[r] += a * v * x[c];
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
        for (&r, &c, &v) in izip!(&self.rows, &self.cols, &self.vals) {
            y[c] += a * v * x[r];
        }
    }
}

impl<T: FloatT> MatrixMath<T> for TripletMatrix<T> {
    // NB: norms are computed on the summed entries
    fn col_norms(&self, norms: &mut [T]) {
        self.to_csc().col_norms(norms);
    }

    fn row_norms(&self, norms: &mut [T]) {
        self.to_csc().row_norms(norms);
    }

    fn scale(&mut self, c: T) {
        self.vals.scale(c);
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(l.len(), self.m);
        assert_eq!(r.len(), self.n);
        for (&row, &col, v) in izip!(&self.rows, &self.cols, &mut self.vals) {
            *v *= l[row] * r[col];
        }
    }

    fn is_finite(&self) -> bool {
        self.vals.is_finite()
    }
}

#[test]
fn test_triplet_duplicates() {
    // [1+2  0 ]
    // [ 0   3 ]   given out of order with a repeated entry
    let A = TripletMatrix::<f64>::new(2, 2, vec![1, 0, 0], vec![1, 0, 0], vec![3., 1., 2.]);
    assert!(A.check_format().is_ok());

    let B = A.to_csc();
    assert_eq!(B.nnz(), 2);
    assert_eq!(B.get_entry((0, 0)), Some(3.));
    assert_eq!(B.get_entry((1, 1)), Some(3.));

    let mut y = [0.; 2];
    A.gemv(&mut y, &[1., 2.], 1.0, 0.0);
    assert_eq!(y, [3., 6.]);

    let mut r = [0.; 2];
    A.row_to_dense(0, &mut r);
    assert_eq!(r, [3., 0.]);

    let bad = TripletMatrix::<f64>::new(2, 2, vec![2], vec![0], vec![1.]);
    assert_eq!(bad.check_format(), Err(SparseFormatError::BadRowval));
}
