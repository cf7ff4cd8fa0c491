#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;

/// A plane rotation `G = [c s; -s c]` with `c^2 + s^2 = 1`.
///
/// Constructed so that `G * [a; b] = [r; 0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Givens<T> {
    pub c: T,
    pub s: T,
}

impl<T> Givens<T>
where
    T: FloatT,
{
    /// Rotation annihilating `b` against `a`.  Returns the
    /// rotation and the resulting value `r = hypot(a,b)`.
    pub fn new(a: T, b: T) -> (Self, T) {
        if b == T::zero() {
            return (
                Self {
                    c: T::one(),
                    s: T::zero(),
                },
                a,
            );
        }
        let r = T::hypot(a, b);
        (Self { c: a / r, s: b / r }, r)
    }

    /// Apply to a pair of vectors, i.e. `[x y] <- [x y] * G'`
    pub fn apply(&self, x: &mut [T], y: &mut [T]) {
        assert_eq!(x.len(), y.len());
        let (c, s) = (self.c, self.s);
        for (xi, yi) in zip(x, y) {
            let (a, b) = (*xi, *yi);
            *xi = c * a + s * b;
            *yi = c * b - s * a;
        }
    }

    /// Apply to rows `i1` and `i2` of `A`, restricted to `cols`.
    pub fn apply_rows(&self, A: &mut Matrix<T>, i1: usize, i2: usize, cols: std::ops::Range<usize>) {
        let (c, s) = (self.c, self.s);
        for j in cols {
            let (a, b) = (A[(i1, j)], A[(i2, j)]);
            A[(i1, j)] = c * a + s * b;
            A[(i2, j)] = c * b - s * a;
        }
    }

    /// Apply to columns `j1 < j2` of `A`
    pub fn apply_cols(&self, A: &mut Matrix<T>, j1: usize, j2: usize) {
        let (x, y) = A.col_pair_mut(j1, j2);
        self.apply(x, y);
    }
}

#[test]
fn test_givens_annihilates() {
    let (G, r) = Givens::<f64>::new(3., 4.);
    assert!((r - 5.).abs() < 1e-15);

    let mut x = [3.];
    let mut y = [4.];
    G.apply(&mut x, &mut y);
    assert!((x[0] - 5.).abs() < 1e-14);
    assert!(y[0].abs() < 1e-14);

    // trivial rotation leaves everything alone
    let (G, r) = Givens::<f64>::new(-2., 0.);
    assert_eq!((G.c, G.s, r), (1., 0., -2.));
}

#[test]
fn test_givens_rows_and_cols() {
    #[rustfmt::skip]
    let mut A = Matrix::<f64>::from(
        &[[1., 2.],
          [1., 0.]]);

    let (G, _) = Givens::new(A[(0, 0)], A[(1, 0)]);
    G.apply_rows(&mut A, 0, 1, 0..2);
    assert!(A[(1, 0)].abs() < 1e-14);
    assert!((A[(0, 0)] - 2f64.sqrt()).abs() < 1e-14);

    // an orthogonal update keeps the columns orthonormal
    let mut Q = Matrix::<f64>::identity(2);
    G.apply_cols(&mut Q, 0, 1);
    let q0 = Q.col_slice(0).to_vec();
    let q1 = Q.col_slice(1).to_vec();
    assert!(q0.dot(&q1).abs() < 1e-14);
    assert!((q0.norm() - 1.).abs() < 1e-14);
}
