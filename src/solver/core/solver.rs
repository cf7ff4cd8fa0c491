use crate::algebra::SparseFormatError;
use crate::solver::core::SettingsError;
use crate::solver::implementations::default::DataError;
use thiserror::Error;

// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Solver terminated at a point satisfying the optimality conditions.
    Optimal = 0,
    /// A feasible ray of unbounded descent was found.
    Unbounded = 1,
    /// Iteration limit reached before a solution was found.
    IterationLimit = 2,
    /// Time limit reached before a solution was found.
    TimeLimit = 3,
    /// Solver terminated with a numerical error.  The iterate
    /// returned is the last one computed.
    NumericalError = 4,
    /// No point satisfies the constraints.
    Infeasible = 5,
    /// Terminated by a cancellation request or user callback.
    Interrupted = 6,
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved = 7,
}

impl SolverStatus {
    /// True for the statuses caused by a resource limit or an
    /// external request rather than by the problem itself
    pub fn is_limit(&self) -> bool {
        matches!(
            *self,
            SolverStatus::IterationLimit | SolverStatus::TimeLimit | SolverStatus::Interrupted
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error type returned by solver construction.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The problem data failed validation
    #[error("Bad problem data: {0}")]
    Data(#[from] DataError),
    /// The settings failed validation
    #[error("Bad settings: {0}")]
    Settings(#[from] SettingsError),
}

impl From<SparseFormatError> for SolverError {
    fn from(e: SparseFormatError) -> Self {
        SolverError::Data(DataError::from(e))
    }
}

#[test]
fn test_status_codes() {
    assert_eq!(SolverStatus::Optimal as u32, 0);
    assert_eq!(SolverStatus::Infeasible as u32, 5);
    assert_eq!(SolverStatus::Unsolved as u32, 7);
    assert_eq!(SolverStatus::default(), SolverStatus::Unsolved);
    assert!(SolverStatus::TimeLimit.is_limit());
    assert!(!SolverStatus::Unbounded.is_limit());
    assert_eq!(SolverStatus::Optimal.to_string(), "Optimal");
}
