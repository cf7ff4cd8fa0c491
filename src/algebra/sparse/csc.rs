#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use quass::algebra::*;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Use [`check_format`](SparseMatrixOps::check_format)
    /// for a full check.
    ///
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// To make an m x n matrix of zeros, use
    /// ```no_run
    /// use quass::algebra::CscMatrix;
    /// let m = 3;
    /// let n = 4;
    /// let A : CscMatrix<f64> = CscMatrix::spalloc(m,n,0);
    /// ```
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// An `m x n` matrix with no structural nonzeros
    pub fn zeros(size: (usize, usize)) -> Self {
        Self::spalloc(size.0, size.1, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Diagonal matrix with entries `d`.  Zero entries are not stored.
    pub fn diagonal(d: &[T]) -> Self {
        let n = d.len();
        let mut colptr = vec![0; n + 1];
        let mut rowval = Vec::with_capacity(n);
        let mut nzval = Vec::with_capacity(n);
        for (i, &v) in d.iter().enumerate() {
            if v != T::zero() {
                rowval.push(i);
                nzval.push(v);
            }
            colptr[i + 1] = rowval.len();
        }
        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        let rows_in_this_column = &self.rowval[first..last];
        match rows_in_this_column.binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }

    /// Allocates the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let mut colptr = vec![0; self.m + 1];
        for &r in &self.rowval {
            colptr[r + 1] += 1;
        }
        for i in 0..self.m {
            colptr[i + 1] += colptr[i];
        }

        let nnz = self.nnz();
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];
        let mut next = colptr.clone();

        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                let row = self.rowval[ptr];
                let dest = next[row];
                rowval[dest] = col;
                nzval[dest] = self.nzval[ptr];
                next[row] += 1;
            }
        }
        CscMatrix::new(self.n, self.m, colptr, rowval, nzval)
    }

    /// True if the matrix is square and `|A - A'| <= tol` entrywise
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        let At = self.transpose();

        // compare entrywise against the transpose, allowing for
        // mismatched structural zeros on either side
        for col in 0..self.n {
            let (mut p, pend) = (self.colptr[col], self.colptr[col + 1]);
            let (mut q, qend) = (At.colptr[col], At.colptr[col + 1]);
            while p < pend || q < qend {
                let rp = if p < pend { self.rowval[p] } else { usize::MAX };
                let rq = if q < qend { At.rowval[q] } else { usize::MAX };
                let diff = if rp == rq {
                    let d = self.nzval[p] - At.nzval[q];
                    p += 1;
                    q += 1;
                    d
                } else if rp < rq {
                    p += 1;
                    self.nzval[p - 1]
                } else {
                    q += 1;
                    At.nzval[q - 1]
                };
                if T::abs(diff) > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T: FloatT> SparseMatrixOps<T> for CscMatrix<T> {
    fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }

        Ok(())
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(usize, usize, T)) {
        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                f(self.rowval[ptr], col, self.nzval[ptr]);
            }
        }
    }

    fn row_to_dense(&self, i: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.n);
        out.fill(T::zero());
        for (col, v) in out.iter_mut().enumerate() {
            let (first, last) = (self.colptr[col], self.colptr[col + 1]);
            if let Ok(k) = self.rowval[first..last].binary_search(&i) {
                *v = self.nzval[first + k];
            }
        }
    }

    fn col_to_dense(&self, j: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.m);
        out.fill(T::zero());
        let (first, last) = (self.colptr[j], self.colptr[j + 1]);
        for (&row, &v) in zip(&self.rowval[first..last], &self.nzval[first..last]) {
            out[row] += v;
        }
    }

    fn to_csc(&self) -> CscMatrix<T> {
        self.clone()
    }
}

impl<T: FloatT> MatrixVectorMultiply<T> for CscMatrix<T> {
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }

    fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self, y, x, a, b);
    }
}

impl<T: FloatT> MatrixMath<T> for CscMatrix<T> {
    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (i, v) in norms.iter_mut().enumerate() {
            *v = self.nzval[self.colptr[i]..self.colptr[i + 1]]
                .iter()
                .fold(T::zero(), |m, &nzval| T::max(m, T::abs(nzval)));
        }
    }

    fn row_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.m);
        norms.fill(T::zero());
        for (row, val) in zip(&self.rowval, &self.nzval) {
            norms[*row] = T::max(norms[*row], T::abs(*val));
        }
    }

    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        assert_eq!(self.nzval.len(), *self.colptr.last().unwrap());
        assert_eq!(l.len(), self.m);
        assert_eq!(r.len(), self.n);

        for (col, &ri) in r.iter().enumerate() {
            let (first, last) = (self.colptr[col], self.colptr[col + 1]);
            let vals = &mut self.nzval[first..last];
            let rows = &self.rowval[first..last];

            for (val, row) in zip(vals, rows) {
                *val *= l[*row] * ri;
            }
        }
    }

    fn is_finite(&self) -> bool {
        self.nzval.is_finite()
    }
}

impl<T, const N: usize, const M: usize> From<&[[T; N]; M]> for CscMatrix<T>
where
    T: FloatT,
{
    /// Build from a dense row-major array, dropping exact zeros
    fn from(rows: &[[T; N]; M]) -> Self {
        let mut colptr = vec![0; N + 1];
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        for col in 0..N {
            for (r, row) in rows.iter().enumerate() {
                if row[col] != T::zero() {
                    rowval.push(r);
                    nzval.push(row[col]);
                }
            }
            colptr[col + 1] = rowval.len();
        }
        CscMatrix::new(M, N, colptr, rowval, nzval)
    }
}

// sparse matrix-vector multiply, no transpose
fn _csc_axpby_N<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    for (j, &xj) in x.iter().enumerate() {
        let axj = a * xj;
        if axj == T::zero() {
            continue;
        }
        for i in A.colptr[j]..A.colptr[j + 1] {
            y[A.rowval[i]] += A.nzval[i] * axj;
        }
    }
}

// sparse matrix-vector multiply, transposed
fn _csc_axpby_T<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }

    if a == T::zero() {
        return;
    }

    for (j, yj) in y.iter_mut().enumerate() {
        let (first, last) = (A.colptr[j], A.colptr[j + 1]);
        let mut acc = T::zero();
        for (&row, &v) in zip(&A.rowval[first..last], &A.nzval[first..last]) {
            acc += v * x[row];
        }
        *yj += a * acc;
    }
}

#[test]
fn test_csc_get_entry() {
    // A =
    //[ ⋅   4.0    ⋅    ⋅   12.0]
    //[1.0  5.0    ⋅    ⋅     ⋅ ]
    //[ ⋅   6.0    ⋅    ⋅   13.0]
    //[2.0  7.0  10.0   ⋅     ⋅ ]
    //[ ⋅   8.0  11.0   ⋅   14.0]
    //[3.0  9.0    ⋅    ⋅     ⋅ ]

    let A = CscMatrix::new(
        6,                                                                 // m
        5,                                                                 // n
        vec![0, 3, 9, 11, 11, 14],                                         // colptr
        vec![1, 3, 5, 0, 1, 2, 3, 4, 5, 3, 4, 0, 2, 4],                    // rowval
        vec![1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12., 13., 14.], // nzval
    );

    assert_eq!(A.get_entry((1, 0)).unwrap(), 1.);
    assert_eq!(A.get_entry((5, 1)).unwrap(), 9.);
    assert_eq!(A.get_entry((4, 4)).unwrap(), 14.);
    assert!(A.get_entry((0, 0)).is_none());
    assert!(A.get_entry((2, 3)).is_none());

    let At = A.transpose();
    assert_eq!(At.size(), (5, 6));
    assert!(At.check_format().is_ok());
    assert_eq!(At.get_entry((1, 5)).unwrap(), 9.);
    assert_eq!(At.get_entry((4, 0)).unwrap(), 12.);
}

#[test]
fn test_csc_gemv() {
    let A: CscMatrix<f64> = CscMatrix::from(&[[1., 2., 0.], [0., 3., 4.]]);
    let x = [1., 1., 1.];
    let mut y = [0.; 2];
    A.gemv(&mut y, &x, 1.0, 0.0);
    assert_eq!(y, [3., 7.]);

    let mut z = [1.; 3];
    A.gemv_t(&mut z, &[1., -1.], 2.0, 1.0);
    assert_eq!(z, [3., -1., -7.]);
}

#[test]
fn test_csc_rows_and_symmetry() {
    let Q: CscMatrix<f64> = CscMatrix::from(&[[2., -1.], [-1., 4.]]);
    assert!(Q.is_symmetric(0.0));

    let mut r = [0.; 2];
    Q.row_to_dense(1, &mut r);
    assert_eq!(r, [-1., 4.]);

    let B: CscMatrix<f64> = CscMatrix::from(&[[2., -1.], [1., 4.]]);
    assert!(!B.is_symmetric(1e-12));
    assert!(B.is_symmetric(2.0));
}
