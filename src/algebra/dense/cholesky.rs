#![allow(non_snake_case)]

use crate::algebra::*;

/// Symmetric pivoted Cholesky factorization of a positive
/// semidefinite matrix,
///
/// `P' H P = L L'`,  with `L = [L11 0; L21 0]`
///
/// where `L11` is `r x r` lower triangular and `r` is the
/// numerical rank of `H`.
pub struct PivotedCholesky<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
    /// pivot order.  `perm[k]` is the row of `H` placed at position `k`
    pub perm: Vec<usize>,
    /// numerical rank
    pub rank: usize,
}

impl<T> PivotedCholesky<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            L: Matrix::zeros((n, n)),
            perm: (0..n).collect(),
            rank: 0,
        }
    }

    pub fn dim(&self) -> usize {
        self.L.nrows()
    }

    /// Factor `H`.  Elimination stops once the largest remaining
    /// diagonal falls to `tol * max(1, max(diag(H)))`, which fixes
    /// the rank.  A remaining diagonal below `-tol` (relative) means
    /// `H` is indefinite.
    pub fn factor(&mut self, H: &Matrix<T>, tol: T) -> Result<(), FactorError> {
        let n = H.nrows();
        if !H.is_square() {
            return Err(FactorError::IncompatibleDimension);
        }
        if self.dim() != n {
            *self = Self::new(n);
        }

        // work on a copy of H, permuted symmetrically as we go
        let mut A = H.clone();
        self.perm.iter_mut().enumerate().for_each(|(i, p)| *p = i);
        self.L.data.set(T::zero());

        let maxdiag0 = (0..n).fold(T::zero(), |acc, i| T::max(acc, A[(i, i)]));
        let thresh = tol * T::max(T::one(), maxdiag0);

        let mut rank = 0;
        for k in 0..n {
            // pivot on the largest remaining diagonal
            let (piv, dmax) = (k..n).fold((k, -T::infinity()), |(p, d), i| {
                if A[(i, i)] > d {
                    (i, A[(i, i)])
                } else {
                    (p, d)
                }
            });

            if dmax <= thresh {
                // indefinite if a remaining diagonal is significantly negative
                let dmin = (k..n).fold(T::infinity(), |acc, i| T::min(acc, A[(i, i)]));
                if dmin < -thresh {
                    return Err(FactorError::NegativePivot(dmin.to_f64().unwrap_or(f64::NAN)));
                }
                break;
            }

            if piv != k {
                swap_symmetric(&mut A, k, piv);
                self.perm.swap(k, piv);
                // previously computed columns of L follow the rows
                for j in 0..k {
                    let tmp = self.L[(k, j)];
                    self.L[(k, j)] = self.L[(piv, j)];
                    self.L[(piv, j)] = tmp;
                }
            }

            let lkk = T::sqrt(A[(k, k)]);
            self.L[(k, k)] = lkk;
            for i in (k + 1)..n {
                self.L[(i, k)] = A[(i, k)] / lkk;
            }
            // rank one update of the trailing block
            for j in (k + 1)..n {
                let ljk = self.L[(j, k)];
                for i in j..n {
                    let v = A[(i, j)] - self.L[(i, k)] * ljk;
                    A[(i, j)] = v;
                    A[(j, i)] = v;
                }
            }
            rank += 1;
        }
        self.rank = rank;
        Ok(())
    }

    /// Orthonormal basis for the null space of the factored matrix,
    /// returned as the columns of an `n x (n-rank)` matrix.
    ///
    /// Spans `P [-L11^{-T} L21'; I]`, orthonormalized by modified
    /// Gram-Schmidt.
    pub fn null_basis(&self) -> Matrix<T> {
        let (n, r) = (self.dim(), self.rank);
        let mut N = Matrix::zeros((n, n - r));
        let mut w = vec![T::zero(); n];

        for c in 0..(n - r) {
            // permuted coordinates first
            w.set(T::zero());
            w[r + c] = T::one();
            for i in 0..r {
                w[i] = -self.L[(r + c, i)];
            }
            self.solve_upper_leading(&mut w[..r]);

            let col = N.col_slice_mut(c);
            for (k, &p) in self.perm.iter().enumerate() {
                col[p] = w[k];
            }
        }

        for c in 0..(n - r) {
            for prev in 0..c {
                let (q, v) = N.col_pair_mut(prev, c);
                let proj = q.dot(v);
                v.axpby(-proj, q, T::one());
            }
            let v = N.col_slice_mut(c);
            let nrm = v.norm();
            v.scale(T::recip(nrm));
        }
        N
    }

    /// Solve `H y = b` for `b` in the range of `H`, taking the
    /// component of `y` along the trailing pivots as zero.
    /// The solution overwrites `b`.
    pub fn solve_range(&self, b: &mut [T]) {
        let (n, r) = (self.dim(), self.rank);
        assert_eq!(b.len(), n);

        let mut w: Vec<T> = self.perm.iter().map(|&p| b[p]).collect();
        self.solve_lower_leading(&mut w[..r]);
        self.solve_upper_leading(&mut w[..r]);
        w[r..].set(T::zero());

        for (k, &p) in self.perm.iter().enumerate() {
            b[p] = w[k];
        }
    }

    // L11 x = b
    fn solve_lower_leading(&self, x: &mut [T]) {
        for i in 0..x.len() {
            let mut v = x[i];
            for j in 0..i {
                v -= self.L[(i, j)] * x[j];
            }
            x[i] = v / self.L[(i, i)];
        }
    }

    // L11' x = b
    fn solve_upper_leading(&self, x: &mut [T]) {
        for i in (0..x.len()).rev() {
            let mut v = x[i];
            for j in (i + 1)..x.len() {
                v -= self.L[(j, i)] * x[j];
            }
            x[i] = v / self.L[(i, i)];
        }
    }
}

// symmetric row and column interchange
fn swap_symmetric<T: FloatT>(A: &mut Matrix<T>, i: usize, j: usize) {
    let n = A.nrows();
    for k in 0..n {
        let tmp = A[(i, k)];
        A[(i, k)] = A[(j, k)];
        A[(j, k)] = tmp;
    }
    for k in 0..n {
        let tmp = A[(k, i)];
        A[(k, i)] = A[(k, j)];
        A[(k, j)] = tmp;
    }
}

#[cfg(test)]
fn residual_inf(H: &Matrix<f64>, y: &[f64], b: &[f64]) -> f64 {
    let mut r = b.to_vec();
    H.gemv(&mut r, y, 1.0, -1.0);
    r.norm_inf()
}

#[test]
fn test_cholesky_full_rank() {
    #[rustfmt::skip]
    let H = Matrix::from(
        &[[ 8., -2., 4.],
          [-2., 12., 2.],
          [ 4.,  2., 6.]]);

    let mut eng = PivotedCholesky::<f64>::new(3);
    assert!(eng.factor(&H, 1e-12).is_ok());
    assert_eq!(eng.rank, 3);
    assert_eq!(eng.null_basis().ncols(), 0);

    let b = [1., -2., 3.];
    let mut y = b.to_vec();
    eng.solve_range(&mut y);
    assert!(residual_inf(&H, &y, &b) < 1e-12);
}

#[test]
fn test_cholesky_rank_deficient() {
    // H = v v' + w w' with v = (1,1,0), w = (0,1,1)
    #[rustfmt::skip]
    let H = Matrix::from(
        &[[1., 1., 0.],
          [1., 2., 1.],
          [0., 1., 1.]]);

    let mut eng = PivotedCholesky::<f64>::new(3);
    assert!(eng.factor(&H, 1e-10).is_ok());
    assert_eq!(eng.rank, 2);

    let N = eng.null_basis();
    assert_eq!(N.size(), (3, 1));
    let mut HN = [0.; 3];
    H.gemv(&mut HN, N.col_slice(0), 1.0, 0.0);
    assert!(HN.norm_inf() < 1e-12);
    assert!((N.col_slice(0).norm() - 1.).abs() < 1e-12);

    // b = H * (1,2,3) lies in the range
    let mut b = [0.; 3];
    H.gemv(&mut b, &[1., 2., 3.], 1.0, 0.0);
    let mut y = b.to_vec();
    eng.solve_range(&mut y);
    assert!(residual_inf(&H, &y, &b) < 1e-10);
}

#[test]
fn test_cholesky_semidefinite_and_indefinite() {
    // singular diagonal
    let H = Matrix::from(&[[1., 0.], [0., 0.]]);
    let mut eng = PivotedCholesky::<f64>::new(2);
    assert!(eng.factor(&H, 1e-10).is_ok());
    assert_eq!(eng.rank, 1);
    let N = eng.null_basis();
    assert_eq!(N.col_slice(0), &[0., 1.]);

    let H = Matrix::from(&[[1., 0.], [0., -1.]]);
    assert!(matches!(
        eng.factor(&H, 1e-10),
        Err(FactorError::NegativePivot(_))
    ));

    let H = Matrix::<f64>::zeros((2, 2));
    assert!(eng.factor(&H, 1e-10).is_ok());
    assert_eq!(eng.rank, 0);
    assert_eq!(eng.null_basis().ncols(), 2);
}
