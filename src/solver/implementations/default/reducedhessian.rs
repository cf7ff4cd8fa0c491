#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::core::traits::BasisFactor;

/// Kind of search direction returned by [`ReducedHessian::direction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Minimizer of the quadratic model on the working set
    Newton,
    /// Descent direction of zero curvature
    Ray,
}

/// Factorization of the reduced Hessian `Z'QZ` used to compute search
/// directions in the null space of the working set.
pub struct ReducedHessian<T> {
    H: Matrix<T>,
    QZ: Matrix<T>,
    chol: PivotedCholesky<T>,
    d: Vec<T>,
    t: Vec<T>,
}

impl<T> Default for ReducedHessian<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self {
            H: Matrix::zeros((0, 0)),
            QZ: Matrix::zeros((0, 0)),
            chol: PivotedCholesky::new(0),
            d: Vec::new(),
            t: Vec::new(),
        }
    }
}

impl<T> ReducedHessian<T>
where
    T: FloatT,
{
    /// Numerical rank of the most recent factorization
    pub fn rank(&self) -> usize {
        self.chol.rank
    }

    fn assemble<B: BasisFactor<T>>(&mut self, instance: &Instance<T>, basis: &B) {
        let n = instance.num_var;
        let nz = basis.nullspace_dim();
        if self.H.size() != (nz, nz) {
            self.H = Matrix::zeros((nz, nz));
            self.QZ = Matrix::zeros((n, nz));
        }
        for j in 0..nz {
            instance.q_vec_mat(basis.zcol(j), self.QZ.col_slice_mut(j));
        }
        for j in 0..nz {
            for i in 0..=j {
                let hij = basis.zcol(i).dot(self.QZ.col_slice(j));
                self.H[(i, j)] = hij;
                self.H[(j, i)] = hij;
            }
        }
    }

    /// Compute a search direction `p = Z d` for the reduced gradient
    /// `rg = Z'g`.
    ///
    /// If `Z'QZ` is singular and `rg` has a component of size above
    /// `opt_tol` in its null space, `d` is the projection of `-rg` onto
    /// that null space.  Otherwise `d` solves `Z'QZ d = -rg` on the
    /// range of `Z'QZ`.
    pub fn direction<B: BasisFactor<T>>(
        &mut self,
        instance: &Instance<T>,
        basis: &B,
        rg: &[T],
        p: &mut [T],
        curvature_tol: T,
        opt_tol: T,
    ) -> Result<SearchDirection, FactorError> {
        let nz = basis.nullspace_dim();
        if rg.len() != nz {
            return Err(FactorError::IncompatibleDimension);
        }
        self.assemble(instance, basis);
        self.chol.factor(&self.H, curvature_tol)?;

        self.d.resize(nz, T::zero());
        let mut kind = SearchDirection::Newton;

        let N = self.chol.null_basis();
        if N.ncols() > 0 {
            self.t.resize(N.ncols(), T::zero());
            N.gemv_t(&mut self.t, rg, T::one(), T::zero());
            if self.t.norm_inf() > opt_tol {
                N.gemv(&mut self.d, &self.t, -T::one(), T::zero());
                kind = SearchDirection::Ray;
            }
        }

        if kind == SearchDirection::Newton {
            self.d.copy_from_slice(rg);
            self.d.negate();
            self.chol.solve_range(&mut self.d);
        }

        if !self.d.is_finite() {
            return Err(FactorError::Singular(self.chol.rank));
        }
        basis.zprod(&self.d, p);
        Ok(kind)
    }
}

#[cfg(test)]
fn unconstrained(Q: CscMatrix<f64>) -> Instance<f64> {
    let n = Q.n;
    Instance::new(
        Q,
        &vec![0.; n],
        CscMatrix::<f64>::zeros((0, n)),
        &[],
        &[],
        &vec![f64::NEG_INFINITY; n],
        &vec![f64::INFINITY; n],
    )
    .unwrap()
}

#[test]
fn test_newton_direction() {
    // Q = diag(2, 4), x = 0, c = (-2, -4): the Newton step goes to (1, 1)
    let inst = unconstrained(CscMatrix::diagonal(&[2., 4.]));
    let basis = DenseQrBasis::<f64>::new(2, 1e-9);
    let mut rh = ReducedHessian::default();

    let g = [-2., -4.];
    let mut rg = [0.; 2];
    basis.ztprod(&g, &mut rg);

    let mut p = [0.; 2];
    let kind = rh.direction(&inst, &basis, &rg, &mut p, 1e-10, 1e-9);
    assert_eq!(kind, Ok(SearchDirection::Newton));
    assert!(p.norm_inf_diff(&[1., 1.]) < 1e-12);
    assert_eq!(rh.rank(), 2);
}

#[test]
fn test_ray_direction() {
    // Q = diag(1, 0), one bound x1 active.  Zero curvature along x2
    let inst = unconstrained(CscMatrix::diagonal(&[1., 0., 0.]));
    let mut basis = DenseQrBasis::<f64>::new(3, 1e-9);
    assert!(basis.add(3, &[0., 0., 1.]).is_ok());

    let g = [0., -1., 5.];
    let mut rg = [0.; 2];
    basis.ztprod(&g, &mut rg);

    let mut p = [0.; 3];
    let mut rh = ReducedHessian::default();
    let kind = rh.direction(&inst, &basis, &rg, &mut p, 1e-10, 1e-9);
    assert_eq!(kind, Ok(SearchDirection::Ray));
    assert!(p.norm_inf_diff(&[0., 1., 0.]) < 1e-12);

    // no null space component in the gradient: Newton on the range
    let g = [-1., 0., 5.];
    basis.ztprod(&g, &mut rg);
    let kind = rh.direction(&inst, &basis, &rg, &mut p, 1e-10, 1e-9);
    assert_eq!(kind, Ok(SearchDirection::Newton));
    assert!(p.norm_inf_diff(&[1., 0., 0.]) < 1e-12);
}
