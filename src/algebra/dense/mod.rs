//! Dense matrices and the small factorizations used by the
//! active-set iteration.

mod cholesky;
mod core;
mod givens;
mod types;
pub use self::cholesky::*;
pub use self::givens::*;
pub use self::types::*;
