mod solver;

pub use solver::config::{SolverConfig, SolverConfigError};
pub use solver::error::SolveError;
pub use solver::ids::{ActionId, StateId};
pub use solver::model::{FnModel, MdpModel};
pub use solver::snapshot::{SolutionSnapshot, StateSnapshot};
pub use solver::solution::Solution;
pub use solver::value_iteration::{RunMetrics, SweepMetrics, ValueIteration, value_iteration};
