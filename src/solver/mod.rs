//! QP solver main module.
//!
//! This module contains the main types and traits for the solver.
//! The [default implementation](crate::solver::implementations::default)
//! solves problems in the form described on the top level
//! [API page](crate), using a dense QR factorization of the working
//! set.
//!
//! Other working set factorizations or pricing rules can be supplied by
//! implementing the core [traits](crate::solver::core::traits).

pub(crate) const _INFINITY_DEFAULT: f64 = 1e20;
// internal module structure
pub(crate) mod core;
pub mod implementations;
pub(crate) mod utils;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

pub use crate::solver::utils::infbounds::*;

//user facing types required to interact with solver
pub use crate::solver::core::callbacks::CancelToken;
pub use crate::solver::core::{SettingsError, SolverError, SolverStatus};

//user facing traits required to define new implementations
pub use crate::solver::core::traits;
pub use crate::solver::core::CoreSettings;

//Since we only have the default implementation, it is
//exposed at the top level as well
pub use crate::solver::implementations::default;
pub use crate::solver::implementations::default::*;
