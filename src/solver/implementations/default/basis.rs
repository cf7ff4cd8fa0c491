#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::core::traits::BasisFactor;

/// Dense QR factorization of the working set.
///
/// With `W` the `k x n` matrix of active constraint normals, keeps an
/// orthogonal `Qf = [Y Z]` and upper triangular `R` (`k x k`) such that
///
/// `W' = Y R`,  `W Z = 0`.
///
/// Additions and removals are Givens updates of both factors.
#[derive(Debug, Clone)]
pub struct DenseQrBasis<T> {
    Qf: Matrix<T>,
    R: Matrix<T>,
    active: Vec<usize>,
    pivot_tol: T,
    work: Vec<T>,
}

impl<T> DenseQrBasis<T>
where
    T: FloatT,
{
    pub fn new(n: usize, pivot_tol: T) -> Self {
        Self {
            Qf: Matrix::identity(n),
            R: Matrix::zeros((n, n)),
            active: Vec::with_capacity(n),
            pivot_tol,
            work: vec![T::zero(); n],
        }
    }

    pub fn dim(&self) -> usize {
        self.Qf.nrows()
    }

    /// Empty the working set
    pub fn clear(&mut self) {
        self.Qf.set_identity();
        self.R.data.set(T::zero());
        self.active.clear();
    }

    /// Position of constraint `index` in the working set
    pub fn position(&self, index: usize) -> Option<usize> {
        self.active.iter().position(|&i| i == index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.position(index).is_some()
    }

    // R[0..k,0..k] x = b
    fn solve_r(&self, x: &mut [T]) -> Result<(), FactorError> {
        for i in (0..x.len()).rev() {
            let rii = self.R[(i, i)];
            if rii == T::zero() {
                return Err(FactorError::Singular(i));
            }
            let mut v = x[i];
            for j in (i + 1)..x.len() {
                v -= self.R[(i, j)] * x[j];
            }
            x[i] = v / rii;
        }
        Ok(())
    }

    // R[0..k,0..k]' x = b
    fn solve_rt(&self, x: &mut [T]) -> Result<(), FactorError> {
        for i in 0..x.len() {
            let rii = self.R[(i, i)];
            if rii == T::zero() {
                return Err(FactorError::Singular(i));
            }
            let mut v = x[i];
            for j in 0..i {
                v -= self.R[(j, i)] * x[j];
            }
            x[i] = v / rii;
        }
        Ok(())
    }
}

impl<T> BasisFactor<T> for DenseQrBasis<T>
where
    T: FloatT,
{
    fn add(&mut self, index: usize, normal: &[T]) -> Result<(), FactorError> {
        let n = self.dim();
        let k = self.active.len();
        if normal.len() != n {
            return Err(FactorError::IncompatibleDimension);
        }
        if k == n {
            return Err(FactorError::DependentConstraint(index));
        }

        // v = Qf' a.  The part of `a` outside span(Y) is v[k..]
        let v = &mut self.work;
        self.Qf.gemv_t(v, normal, T::one(), T::zero());
        if v[k..].norm() <= self.pivot_tol * normal.norm() {
            return Err(FactorError::DependentConstraint(index));
        }

        // rotate v[k..] onto its leading entry, bottom up
        for i in ((k + 1)..n).rev() {
            let (G, r) = Givens::new(v[i - 1], v[i]);
            v[i - 1] = r;
            v[i] = T::zero();
            G.apply_cols(&mut self.Qf, i - 1, i);
        }

        for i in 0..=k {
            self.R[(i, k)] = v[i];
        }
        self.active.push(index);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<(), FactorError> {
        let j = self
            .position(index)
            .ok_or(FactorError::NotInWorkingSet(index))?;
        let k = self.active.len();

        // drop column j of R.  The trailing columns become upper Hessenberg
        for col in j..(k - 1) {
            for i in 0..=(col + 1) {
                self.R[(i, col)] = self.R[(i, col + 1)];
            }
        }
        for i in 0..k {
            self.R[(i, k - 1)] = T::zero();
        }

        // restore triangularity, mirroring each row rotation in Qf
        for l in j..(k - 1) {
            let (G, r) = Givens::new(self.R[(l, l)], self.R[(l + 1, l)]);
            G.apply_rows(&mut self.R, l, l + 1, (l + 1)..(k - 1));
            self.R[(l, l)] = r;
            self.R[(l + 1, l)] = T::zero();
            G.apply_cols(&mut self.Qf, l, l + 1);
        }

        self.active.remove(j);
        Ok(())
    }

    fn refactor(&mut self, normal: &mut dyn FnMut(usize, &mut [T])) -> Vec<usize> {
        let previous = std::mem::take(&mut self.active);
        self.clear();

        let mut a = vec![T::zero(); self.dim()];
        let mut dropped = Vec::new();
        for i in previous {
            normal(i, &mut a);
            if self.add(i, &a).is_err() {
                dropped.push(i);
            }
        }
        dropped
    }

    fn multipliers(&self, g: &[T], lambda: &mut [T]) -> Result<(), FactorError> {
        let k = self.active.len();
        if lambda.len() != k || g.len() != self.dim() {
            return Err(FactorError::IncompatibleDimension);
        }
        self.Qf.gemv_t_cols(0..k, lambda, g, T::one(), T::zero());
        self.solve_r(lambda)
    }

    fn ztprod(&self, v: &[T], out: &mut [T]) {
        let k = self.active.len();
        self.Qf.gemv_t_cols(k..self.dim(), out, v, T::one(), T::zero());
    }

    fn zprod(&self, d: &[T], out: &mut [T]) {
        let k = self.active.len();
        self.Qf.gemv_cols(k..self.dim(), out, d, T::one(), T::zero());
    }

    fn zcol(&self, j: usize) -> &[T] {
        self.Qf.col_slice(self.active.len() + j)
    }

    fn solve_active(&self, r: &[T], out: &mut [T]) -> Result<(), FactorError> {
        // W = R'Y', so out = Y t with R't = r
        let k = self.active.len();
        if r.len() != k || out.len() != self.dim() {
            return Err(FactorError::IncompatibleDimension);
        }
        let mut t = r.to_vec();
        self.solve_rt(&mut t)?;
        self.Qf.gemv_cols(0..k, out, &t, T::one(), T::zero());
        Ok(())
    }

    fn nullspace_dim(&self) -> usize {
        self.dim() - self.active.len()
    }

    fn working_set(&self) -> &[usize] {
        &self.active
    }

    fn steepest_edge_weights(&self, weights: &mut [T]) -> Result<(), FactorError> {
        let k = self.active.len();
        if weights.len() != k {
            return Err(FactorError::IncompatibleDimension);
        }
        let mut t = vec![T::zero(); k];
        for (i, w) in weights.iter_mut().enumerate() {
            t.set(T::zero());
            t[i] = T::one();
            self.solve_rt(&mut t)?;
            *w = t.sumsq();
        }
        Ok(())
    }
}

// ---------------
// testing

#[cfg(test)]
fn check_factor(basis: &DenseQrBasis<f64>, normals: &[(usize, [f64; 3])]) {
    // every Z column is orthogonal to every active normal
    assert_eq!(basis.working_set().len(), normals.len());
    for j in 0..basis.nullspace_dim() {
        assert!((basis.zcol(j).norm() - 1.).abs() < 1e-12);
        for (_, a) in normals {
            assert!(basis.zcol(j).dot(a).abs() < 1e-12);
        }
    }
}

#[test]
fn test_basis_add_remove() {
    let a0 = [1., 1., 0.];
    let a5 = [0., 0., 1.];

    let mut basis = DenseQrBasis::<f64>::new(3, 1e-9);
    assert_eq!(basis.nullspace_dim(), 3);

    assert!(basis.add(0, &a0).is_ok());
    assert!(basis.add(5, &a5).is_ok());
    assert_eq!(basis.working_set(), &[0, 5]);
    assert_eq!(basis.nullspace_dim(), 1);
    check_factor(&basis, &[(0, a0), (5, a5)]);

    // dependent normals are rejected without modification
    assert_eq!(
        basis.add(7, &[2., 2., -1.]),
        Err(FactorError::DependentConstraint(7))
    );
    assert_eq!(basis.working_set(), &[0, 5]);

    // g = 2 a0 + 3 a5
    let mut lambda = [0.; 2];
    assert!(basis.multipliers(&[2., 2., 3.], &mut lambda).is_ok());
    assert!((lambda[0] - 2.).abs() < 1e-12);
    assert!((lambda[1] - 3.).abs() < 1e-12);

    // reduced gradient vanishes for g in the range of W'
    let mut rg = [0.; 1];
    basis.ztprod(&[2., 2., 3.], &mut rg);
    assert!(rg[0].abs() < 1e-12);

    assert!(basis.remove(0).is_ok());
    assert_eq!(basis.working_set(), &[5]);
    assert_eq!(basis.nullspace_dim(), 2);
    check_factor(&basis, &[(5, a5)]);

    let mut lambda = [0.; 1];
    assert!(basis.multipliers(&[1., -1., 3.], &mut lambda).is_ok());
    assert!((lambda[0] - 3.).abs() < 1e-12);

    assert_eq!(basis.remove(0), Err(FactorError::NotInWorkingSet(0)));
}

#[test]
fn test_basis_remove_middle() {
    let normals = [(3, [1., 0., 1.]), (4, [0., 1., 0.]), (1, [1., 2., 3.])];
    let mut basis = DenseQrBasis::<f64>::new(3, 1e-9);
    for (i, a) in normals.iter() {
        assert!(basis.add(*i, a).is_ok());
    }
    assert_eq!(basis.nullspace_dim(), 0);

    assert!(basis.remove(4).is_ok());
    assert_eq!(basis.working_set(), &[3, 1]);
    check_factor(&basis, &[normals[0], normals[2]]);

    // g = -a3 + 2 a1
    let g = [1., 4., 5.];
    let mut lambda = [0.; 2];
    assert!(basis.multipliers(&g, &mut lambda).is_ok());
    assert!((lambda[0] + 1.).abs() < 1e-12);
    assert!((lambda[1] - 2.).abs() < 1e-12);
}

#[test]
fn test_basis_solve_active_and_refactor() {
    let mut basis = DenseQrBasis::<f64>::new(3, 1e-9);
    assert!(basis.add(0, &[1., 1., 0.]).is_ok());
    assert!(basis.add(4, &[0., 0., 1.]).is_ok());

    // minimum norm solution of W x = (2, 1) is (1, 1, 1)
    let mut x = [0.; 3];
    assert!(basis.solve_active(&[2., 1.], &mut x).is_ok());
    assert!(x.norm_inf_diff(&[1., 1., 1.]) < 1e-12);

    // weights are |R^{-T} e_i|^2; a5 is a unit normal orthogonal to a0
    let mut w = [0.; 2];
    assert!(basis.steepest_edge_weights(&mut w).is_ok());
    assert!((w[0] - 0.5).abs() < 1e-12);
    assert!((w[1] - 1.0).abs() < 1e-12);

    // refactor drops a normal that has become dependent
    let dropped = basis.refactor(&mut |i, out: &mut [f64]| {
        let a = match i {
            0 => [1., 1., 0.],
            _ => [2., 2., 0.],
        };
        out.copy_from_slice(&a);
    });
    assert_eq!(dropped, vec![4]);
    assert_eq!(basis.working_set(), &[0]);
}
