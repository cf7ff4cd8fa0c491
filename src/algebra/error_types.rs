use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Column value exceeds the matrix column dimension")]
    /// Column value exceeds the matrix column dimension
    BadColval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    #[error("Bad row pointer values")]
    /// Matrix row pointer values are defective
    BadRowptr,
}

/// Error type returned by the dense factorizations used inside
/// the active-set iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// The new constraint normal lies (numerically) in the span
    /// of the current working set
    #[error("Constraint {0} is linearly dependent on the working set")]
    DependentConstraint(usize),
    /// The matrix is not positive semidefinite; carries the offending pivot
    #[error("Negative pivot {0:e} encountered in Cholesky factorization")]
    NegativePivot(f64),
    /// The constraint is not in the working set
    #[error("Constraint {0} is not in the working set")]
    NotInWorkingSet(usize),
    /// A triangular solve hit a (numerically) zero diagonal
    #[error("Singular triangular factor at position {0}")]
    Singular(usize),
}
