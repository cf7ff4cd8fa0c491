#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::utils::infbounds::normalize_infinite_bounds;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned when constructing a problem [`Instance`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// An array or matrix has the wrong size
    #[error("Dimension mismatch in {0}")]
    IncompatibleDimension(&'static str),
    /// An objective or constraint coefficient is infinite or NaN
    #[error("Non-finite values in {0}")]
    NonFinite(&'static str),
    /// A bound is NaN
    #[error("NaN value in {0}")]
    NanBound(&'static str),
    /// A lower bound is +inf or an upper bound is -inf
    #[error("Bound {index} in {field} is infinite on the wrong side")]
    BadInfiniteBound { field: &'static str, index: usize },
    /// Lower bound exceeds upper bound
    #[error("Crossed bounds at index {0}")]
    CrossedBounds(usize),
    /// The Hessian is not symmetric
    #[error("Quadratic term is not symmetric")]
    AsymmetricQ,
    /// A sparse matrix is malformed
    #[error("Sparse matrix format error: {0}")]
    SparseFormat(#[from] SparseFormatError),
}

/// A convex quadratic program
///
/// ```text
/// minimize    ½ x'Qx + c'x + offset
/// subject to  con_lo ≤ A x ≤ con_up
///             var_lo ≤   x ≤ var_up
/// ```
///
/// Constraints are indexed over a combined space: indices `0..num_con`
/// are the rows of `A`, and index `num_con + j` is the bound on
/// variable `j`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct Instance<T: FloatT = f64> {
    pub num_var: usize,
    pub num_con: usize,
    /// Hessian, stored with both triangles
    pub Q: SparseMatrix<T>,
    pub c: Vec<T>,
    pub offset: T,
    pub A: SparseMatrix<T>,
    pub var_lo: Vec<T>,
    pub var_up: Vec<T>,
    pub con_lo: Vec<T>,
    pub con_up: Vec<T>,
}

impl<T> Instance<T>
where
    T: FloatT,
{
    /// Build and validate a problem instance.
    ///
    /// Bounds at or beyond the [infinity threshold](crate::solver::get_infinity)
    /// are replaced by infinities.  The constant `offset` is zero; use
    /// [`with_offset`](Instance::with_offset) to set it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        Q: impl Into<SparseMatrix<T>>,
        c: &[T],
        A: impl Into<SparseMatrix<T>>,
        con_lo: &[T],
        con_up: &[T],
        var_lo: &[T],
        var_up: &[T],
    ) -> Result<Self, DataError> {
        let Q = Q.into();
        let A = A.into();
        let num_var = c.len();
        let num_con = con_lo.len();

        let mut instance = Self {
            num_var,
            num_con,
            Q,
            c: c.to_vec(),
            offset: T::zero(),
            A,
            var_lo: var_lo.to_vec(),
            var_up: var_up.to_vec(),
            con_lo: con_lo.to_vec(),
            con_up: con_up.to_vec(),
        };
        normalize_infinite_bounds(&mut instance.var_lo);
        normalize_infinite_bounds(&mut instance.var_up);
        normalize_infinite_bounds(&mut instance.con_lo);
        normalize_infinite_bounds(&mut instance.con_up);

        instance.validate()?;
        Ok(instance)
    }

    /// Set the constant objective term
    pub fn with_offset(mut self, offset: T) -> Result<Self, DataError> {
        if !offset.is_finite() {
            return Err(DataError::NonFinite("offset"));
        }
        self.offset = offset;
        Ok(self)
    }

    /// Check dimensions, finiteness, bound consistency and symmetry
    pub fn validate(&self) -> Result<(), DataError> {
        let (n, m) = (self.num_var, self.num_con);

        self.Q.check_format()?;
        self.A.check_format()?;

        if self.Q.size() != (n, n) {
            return Err(DataError::IncompatibleDimension("Q"));
        }
        if self.A.size() != (m, n) {
            return Err(DataError::IncompatibleDimension("A"));
        }
        if self.c.len() != n {
            return Err(DataError::IncompatibleDimension("c"));
        }
        if self.var_lo.len() != n || self.var_up.len() != n {
            return Err(DataError::IncompatibleDimension("variable bounds"));
        }
        if self.con_lo.len() != m || self.con_up.len() != m {
            return Err(DataError::IncompatibleDimension("constraint bounds"));
        }

        if !self.Q.is_finite() {
            return Err(DataError::NonFinite("Q"));
        }
        if !self.A.is_finite() {
            return Err(DataError::NonFinite("A"));
        }
        if !self.c.is_finite() {
            return Err(DataError::NonFinite("c"));
        }
        if !self.offset.is_finite() {
            return Err(DataError::NonFinite("offset"));
        }

        check_bounds(&self.con_lo, &self.con_up, "constraint bounds", 0)?;
        check_bounds(&self.var_lo, &self.var_up, "variable bounds", m)?;

        let Qcsc = self.Q.to_csc();
        let mut qnorm = vec![T::zero(); n];
        Qcsc.col_norms(&mut qnorm);
        let tol = T::epsilon() * (100.).as_T() * T::max(T::one(), qnorm.norm_inf());
        if !Qcsc.is_symmetric(tol) {
            return Err(DataError::AsymmetricQ);
        }
        Ok(())
    }

    /// Total number of constraint indices, rows then variable bounds
    pub fn num_total(&self) -> usize {
        self.num_con + self.num_var
    }

    pub fn lower(&self, i: usize) -> T {
        if i < self.num_con {
            self.con_lo[i]
        } else {
            self.var_lo[i - self.num_con]
        }
    }

    pub fn upper(&self, i: usize) -> T {
        if i < self.num_con {
            self.con_up[i]
        } else {
            self.var_up[i - self.num_con]
        }
    }

    /// Value of constraint `i` at `x`, given the row activities `Ax`
    pub fn activity(&self, i: usize, x: &[T], rowactivity: &[T]) -> T {
        if i < self.num_con {
            rowactivity[i]
        } else {
            x[i - self.num_con]
        }
    }

    /// Equality row or fixed variable
    pub fn is_equality(&self, i: usize) -> bool {
        let (lo, up) = (self.lower(i), self.upper(i));
        lo.is_finite() && lo == up
    }

    /// Both bounds infinite
    pub fn is_free(&self, i: usize) -> bool {
        self.lower(i) == -T::infinity() && self.upper(i) == T::infinity()
    }

    /// Normal of constraint `i`, scattered into `out`
    pub fn constraint_normal(&self, i: usize, out: &mut [T]) {
        if i < self.num_con {
            self.A.row_to_dense(i, out);
        } else {
            out.set(T::zero());
            out[i - self.num_con] = T::one();
        }
    }

    /// `out = Q x`
    pub fn q_vec_mat(&self, x: &[T], out: &mut [T]) {
        self.Q.gemv(out, x, T::one(), T::zero());
    }

    /// `out = A x`
    pub fn row_activity(&self, x: &[T], out: &mut [T]) {
        self.A.gemv(out, x, T::one(), T::zero());
    }

    /// `½ x'Qx + c'x + offset`
    pub fn objective(&self, x: &[T]) -> T {
        let mut qx = vec![T::zero(); self.num_var];
        self.q_vec_mat(x, &mut qx);
        x.dot(&qx) * (0.5).as_T() + self.c.dot(x) + self.offset
    }

    /// Largest bound violation at `x`, given the row activities `Ax`
    pub fn max_violation(&self, x: &[T], rowactivity: &[T]) -> T {
        (0..self.num_total()).fold(T::zero(), |acc, i| {
            let v = self.activity(i, x, rowactivity);
            let viol = T::max(self.lower(i) - v, v - self.upper(i));
            T::max(acc, viol)
        })
    }

    /// A copy with every finite bound moved outward by `tol`
    pub fn with_relaxed_bounds(&self, tol: T) -> Self {
        let mut relaxed = self.clone();
        for v in relaxed.con_lo.iter_mut().chain(relaxed.var_lo.iter_mut()) {
            *v -= tol;
        }
        for v in relaxed.con_up.iter_mut().chain(relaxed.var_up.iter_mut()) {
            *v += tol;
        }
        relaxed
    }
}

fn check_bounds<T: FloatT>(
    lo: &[T],
    up: &[T],
    field: &'static str,
    offset: usize,
) -> Result<(), DataError> {
    for (k, (&l, &u)) in lo.iter().zip(up).enumerate() {
        if l.is_nan() || u.is_nan() {
            return Err(DataError::NanBound(field));
        }
        if l == T::infinity() || u == -T::infinity() {
            return Err(DataError::BadInfiniteBound {
                field,
                index: offset + k,
            });
        }
        if l > u {
            return Err(DataError::CrossedBounds(offset + k));
        }
    }
    Ok(())
}

#[cfg(test)]
fn box_instance() -> Instance<f64> {
    // min ½|x|² - x₁ - x₂,   x₁ + x₂ ≤ 1,  0 ≤ x ≤ 2
    Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::<f64>::from(&[[1., 1.]]),
        &[f64::NEG_INFINITY],
        &[1.],
        &[0., 0.],
        &[2., 2.],
    )
    .unwrap()
}

#[test]
fn test_instance_accessors() {
    let inst = box_instance().with_offset(3.).unwrap();
    assert_eq!(inst.num_total(), 3);
    assert_eq!(inst.lower(0), f64::NEG_INFINITY);
    assert_eq!(inst.upper(2), 2.);
    assert!(!inst.is_equality(0));
    assert!(!inst.is_free(0));

    let x = [0.5, 1.0];
    let mut ra = [0.];
    inst.row_activity(&x, &mut ra);
    assert_eq!(ra, [1.5]);
    assert_eq!(inst.activity(0, &x, &ra), 1.5);
    assert_eq!(inst.activity(2, &x, &ra), 1.0);
    assert_eq!(inst.max_violation(&x, &ra), 0.5);

    // ½(0.25+1) - 1.5 + 3
    assert!((inst.objective(&x) - 2.125).abs() < 1e-15);

    let mut a = [0.; 2];
    inst.constraint_normal(1, &mut a);
    assert_eq!(a, [1., 0.]);

    let relaxed = inst.with_relaxed_bounds(0.1);
    assert_eq!(relaxed.upper(0), 1.1);
    assert_eq!(relaxed.lower(0), f64::NEG_INFINITY);
    assert_eq!(relaxed.lower(1), -0.1);
}

#[test]
fn test_instance_validation() {
    let Q = CscMatrix::<f64>::identity(2);
    let A = CscMatrix::<f64>::from(&[[1., 1.]]);

    // crossed bounds are reported in the combined index space
    let err = Instance::new(Q.clone(), &[0., 0.], A.clone(), &[0.], &[1.], &[0., 3.], &[1., 2.]);
    assert_eq!(err, Err(DataError::CrossedBounds(2)));

    let err = Instance::new(Q.clone(), &[0., 0.], A.clone(), &[f64::INFINITY], &[f64::INFINITY], &[0., 0.], &[1., 1.]);
    assert!(matches!(err, Err(DataError::BadInfiniteBound { index: 0, .. })));

    let err = Instance::new(Q.clone(), &[0., f64::NAN], A.clone(), &[0.], &[1.], &[0., 0.], &[1., 1.]);
    assert_eq!(err, Err(DataError::NonFinite("c")));

    let err = Instance::new(Q.clone(), &[0., 0., 0.], A.clone(), &[0.], &[1.], &[0., 0.], &[1., 1.]);
    assert_eq!(err, Err(DataError::IncompatibleDimension("Q")));

    let asym = CscMatrix::<f64>::from(&[[1., 1.], [0., 1.]]);
    let err = Instance::new(asym, &[0., 0.], A, &[0.], &[1.], &[0., 0.], &[1., 1.]);
    assert_eq!(err, Err(DataError::AsymmetricQ));

    // large values are infinite
    let inst = Instance::new(Q, &[0., 0.], CscMatrix::<f64>::zeros((0, 2)), &[], &[], &[-1e30, 0.], &[1e20, 1.]).unwrap();
    assert!(inst.is_free(0));
    assert!(inst.with_offset(f64::INFINITY).is_err());
}
