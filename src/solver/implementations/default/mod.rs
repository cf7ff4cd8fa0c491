//! Default implementation of the active-set QP solver.
//!
//! The working set is factored by a dense QR decomposition and the
//! reduced Hessian by a pivoted Cholesky factorization.  Problem data
//! is held in any of the supported sparse formats.

#![allow(non_snake_case)]

mod basis;
mod feasibility;
mod gradient;
mod info;
mod info_print;
mod instance;
mod perturbation;
mod pricing;
mod quass;
mod ratiotest;
mod reducedhessian;
mod runtime;
mod scaling;
mod settings;
mod solution;
mod solver;
mod statistics;

#[cfg(feature = "serde")]
mod json;

//export flattened
pub use basis::*;
pub(crate) use feasibility::*;
pub use gradient::*;
pub use info::*;
pub use instance::*;
pub use perturbation::*;
pub use pricing::*;
pub(crate) use quass::*;
pub use ratiotest::*;
pub use reducedhessian::*;
pub use runtime::*;
pub use scaling::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
pub use statistics::*;
