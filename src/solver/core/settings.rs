use crate::solver::implementations::default::DefaultSettings;
use thiserror::Error;

/// Solver general core settings are the same as in the default solver.
///
/// Go [here](crate::solver::implementations::default::DefaultSettings)
/// to view the complete list.
///
pub type CoreSettings<T> = DefaultSettings<T>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A tolerance or factor that must be strictly positive is not
    #[error("Setting {0} must be positive and finite")]
    NotPositive(&'static str),
    /// A pair of settings is inconsistent
    #[error("Settings {0} and {1} are inconsistent")]
    Inconsistent(&'static str, &'static str),
    /// An error attributable to one of the fields
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}
