//! Capability traits for the pieces of the active-set iteration that
//! admit alternative implementations.
//!
//! The [default implementation](crate::solver::implementations::default)
//! provides a dense QR working-set factorization and the Dantzig and
//! steepest-edge pricing rules.

use crate::algebra::*;
use enum_dispatch::*;

/// Factorization of the working-set block.
///
/// The working set is the ordered list of active constraint indices.
/// Writing `W` for the matrix whose rows are the corresponding
/// constraint normals, implementors maintain a factorization from
/// which the null space `Z` of `W` and the multiplier system
/// `W' λ = g` can be evaluated.
pub trait BasisFactor<T: FloatT> {
    /// Append constraint `index` with normal `normal` to the working set.
    /// Fails without modification if the normal is (numerically)
    /// dependent on the current working set.
    fn add(&mut self, index: usize, normal: &[T]) -> Result<(), FactorError>;

    /// Remove constraint `index` from the working set.
    fn remove(&mut self, index: usize) -> Result<(), FactorError>;

    /// Rebuild the factorization from scratch for the current working
    /// set.  `normal(i, out)` writes the normal of constraint `i`.
    /// Returns the indices dropped as dependent.
    fn refactor(&mut self, normal: &mut dyn FnMut(usize, &mut [T])) -> Vec<usize>;

    /// Least squares multipliers `λ` for `W' λ = g`, in working set order.
    fn multipliers(&self, g: &[T], lambda: &mut [T]) -> Result<(), FactorError>;

    /// `out = Z' v`
    fn ztprod(&self, v: &[T], out: &mut [T]);

    /// `out = Z d`
    fn zprod(&self, d: &[T], out: &mut [T]);

    /// Column `j` of the null space basis `Z`
    fn zcol(&self, j: usize) -> &[T];

    /// Minimum norm `out` with `W out = r`
    fn solve_active(&self, r: &[T], out: &mut [T]) -> Result<(), FactorError>;

    /// Dimension of the null space, i.e. `n - |working set|`
    fn nullspace_dim(&self) -> usize;

    /// Active constraint indices, in factor order
    fn working_set(&self) -> &[usize];

    /// Squared norms of the rows of `W` pseudoinverse, used to
    /// normalize multipliers for steepest edge pricing.
    fn steepest_edge_weights(&self, weights: &mut [T]) -> Result<(), FactorError>;
}

/// Selection of a working set constraint to release when the
/// multipliers show the current iterate is not optimal.
#[enum_dispatch]
pub trait Pricing {
    /// `violations[k]` is the (nonnegative) amount by which the multiplier
    /// of working set entry `k` has the wrong sign.  Returns the position
    /// in the working set of the constraint to drop, or `None` if no
    /// violation exceeds `tol`.
    fn price<T: FloatT, B: BasisFactor<T>>(
        &self,
        violations: &[T],
        basis: &B,
        tol: T,
    ) -> Option<usize>;
}
