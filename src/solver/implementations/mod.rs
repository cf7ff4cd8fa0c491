//! Solver implementations.  Only the [default] one exists.

pub mod default;
