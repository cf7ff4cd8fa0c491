//! __quass__ is a primal active-set solver for convex quadratic programs:
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T Q x + c^T x + c_0\\\\\[2ex\]
//!  \text{subject to} & l_A \le Ax \le u_A \\\\\[1ex\]
//!         & l_x \le x \le u_x
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, a symmetric positive
//! semidefinite $Q$, and bounds that may be infinite.  Equality
//! constraints are rows or variables with equal lower and upper bounds.
//!
//! ## Features
//!
//! * __Warm starts__: a solve can start from a given primal point, a row
//!   dual estimate and an initial working set.
//!
//! * __Degeneracy handling__: bounds that are tight at the start point
//!   are perturbed outward and restored after the main loop.  A Harris
//!   two pass ratio test is available.
//!
//! * __Infeasible starts__: a start point outside the feasible region is
//!   repaired by an elastic feasibility phase, which also detects
//!   infeasible problems.
//!
//! * __Sparse input__: problem matrices can be given in compressed sparse
//!   column, compressed sparse row or triplet format.
//!
//! * __Cooperative cancellation__: solves can be interrupted by a user
//!   callback, a [`CancelToken`](crate::solver::CancelToken) or a time limit.
//!
//! # Example
//!
//! ```
//! use quass::algebra::*;
//! use quass::solver::*;
//!
//! // minimize ½((x-2)² + (y-2)²)  subject to  x + y ≤ 1,  x, y ≥ 0
//! let instance = Instance::new(
//!     CscMatrix::<f64>::identity(2),
//!     &[-2., -2.],
//!     CscMatrix::<f64>::from(&[[1., 1.]]),
//!     &[f64::NEG_INFINITY],
//!     &[1.],
//!     &[0., 0.],
//!     &[f64::INFINITY, f64::INFINITY],
//! )
//! .unwrap()
//! .with_offset(4.)
//! .unwrap();
//!
//! let settings = DefaultSettingsBuilder::<f64>::default()
//!     .verbose(false)
//!     .build()
//!     .unwrap();
//!
//! let mut solver = QpSolver::new(instance, settings).unwrap();
//! assert_eq!(solver.solve(), SolverStatus::Optimal);
//! assert!((solver.solution.objective - 2.25).abs() < 1e-9);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod solver;
pub mod timers;
