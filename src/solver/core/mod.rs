// package together all of the following and re-export
// in a partially flattened structure :
// : core component traits
// : callbacks and cancellation
// : user settings
// : solver status and errors

pub mod callbacks;
pub mod traits;

//partially flatten top level pieces

mod settings;
mod solver;
pub use settings::*;
pub use solver::*;
