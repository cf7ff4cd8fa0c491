//! Linear algebra types and operations used by the QP solver.
//!
//! All internal math goes through the traits defined here, which are
//! implemented generically for any [`FloatT`] type.  Problem data is
//! supplied as a [`SparseMatrix`] in one of the supported formats.  The
//! working-set factors and the reduced Hessian are small and dense, and
//! are stored as column major [`Matrix`] types.

// first import floats and traits.  The traits carry the
// enum_dispatch markers used by the sparse module.
mod floats;
pub use floats::*;
mod math_traits;
pub use math_traits::*;

// then implementations
mod scalarmath;
mod vecmath;

mod error_types;
pub use error_types::*;

mod sparse;
pub use sparse::*;
mod dense;
pub use dense::*;
