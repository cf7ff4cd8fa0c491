#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;
use std::ops::{Index, IndexMut};

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data.set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    #[inline]
    pub fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Mutable views of two distinct columns at once.
    pub fn col_pair_mut(&mut self, c1: usize, c2: usize) -> (&mut [T], &mut [T]) {
        assert!(c1 < c2 && c2 < self.n);
        let m = self.m;
        let (left, right) = self.data.split_at_mut(c2 * m);
        (&mut left[(c1 * m)..(c1 + 1) * m], &mut right[..m])
    }

    /// Copy of the leading `ncols` columns
    pub fn leading_cols(&self, ncols: usize) -> Matrix<T> {
        assert!(ncols <= self.n);
        Matrix::new_from_slice((self.m, ncols), &self.data[..self.m * ncols])
    }

    /// `y = a*self[:,cols]*x + b*y`, using only the columns in `cols`
    pub fn gemv_cols(&self, cols: std::ops::Range<usize>, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), cols.len());
        assert_eq!(y.len(), self.m);

        if b == T::zero() {
            y.fill(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }
        for (col, &xj) in zip(cols, x) {
            if xj == T::zero() {
                continue;
            }
            y.axpby(a * xj, self.col_slice(col), T::one());
        }
    }

    /// `y = a*self[:,cols]'*x + b*y`, using only the columns in `cols`
    pub fn gemv_t_cols(&self, cols: std::ops::Range<usize>, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.m);
        assert_eq!(y.len(), cols.len());

        for (col, yj) in zip(cols, y.iter_mut()) {
            let v = a * self.col_slice(col).dot(x);
            *yj = if b == T::zero() { v } else { v + b * (*yj) };
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> ShapedMatrix for Matrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T> MatrixVectorMultiply<T> for Matrix<T>
where
    T: FloatT,
{
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        self.gemv_cols(0..self.n, y, x, a, b);
    }

    fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(y.len(), self.n);
        self.gemv_t_cols(0..self.n, y, x, a, b);
    }
}

impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    // row major input, as it reads on the page
    fn from(rows: &[[T; N]; M]) -> Self {
        let mut A = Matrix::zeros((M, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                A[(i, j)] = v;
            }
        }
        A
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.m {
            write!(f, "[ ")?;
            for j in 0..self.n {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[test]
fn test_dense_gemv() {
    #[rustfmt::skip]
    let A = Matrix::<f64>::from(
        &[[1., 2., 3.],
          [4., 5., 6.]]);

    assert_eq!(A.size(), (2, 3));
    assert_eq!(A[(1, 0)], 4.);
    assert_eq!(A.col_slice(2), &[3., 6.]);

    let mut y = [1., 1.];
    A.gemv(&mut y, &[1., 0., -1.], 2.0, 1.0);
    assert_eq!(y, [-3., -3.]);

    let mut z = [0.; 3];
    A.gemv_t(&mut z, &[1., 1.], 1.0, 0.0);
    assert_eq!(z, [5., 7., 9.]);

    let mut w = [0.; 2];
    A.gemv_cols(1..3, &mut w, &[1., 1.], 1.0, 0.0);
    assert_eq!(w, [5., 11.]);
}

#[test]
fn test_dense_col_pair() {
    let mut A = Matrix::<f64>::identity(3);
    let (c0, c2) = A.col_pair_mut(0, 2);
    c0[1] = 5.;
    c2[1] = 7.;
    assert_eq!(A[(1, 0)], 5.);
    assert_eq!(A[(1, 2)], 7.);
    assert_eq!(A.leading_cols(1).data, vec![1., 5., 0.]);
}
