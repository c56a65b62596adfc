use std::fmt;

use crate::solver::ids::StateId;

/// Configuration errors reported by the solver before any sweep runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The state set is empty, so there is no value to hold.
    EmptyStates,
    /// The action set is empty, so the max over actions is undefined.
    EmptyActions,
    /// The sweep budget must be at least one.
    ZeroIterations,
    /// Discount factor outside `[0, 1)` or not finite.
    InvalidDiscount { gamma: f64 },
    /// Convergence threshold negative or not finite.
    InvalidThreshold { theta: f64 },
    /// The same state appears twice in the state list.
    DuplicateState { state_id: StateId },
    /// Initial values do not contain an entry for this state.
    MissingInitialValue { state_id: StateId },
    /// Initial value for this state is NaN or infinite.
    NonFiniteInitialValue { state_id: StateId, value: f64 },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::EmptyStates => write!(f, "state set must not be empty"),
            SolveError::EmptyActions => write!(f, "action set must not be empty"),
            SolveError::ZeroIterations => {
                write!(f, "max_iterations must be greater than 0")
            }
            SolveError::InvalidDiscount { gamma } => {
                write!(f, "gamma must be finite and within [0, 1), got {gamma}")
            }
            SolveError::InvalidThreshold { theta } => {
                write!(f, "theta must be finite and >= 0, got {theta}")
            }
            SolveError::DuplicateState { state_id } => write!(
                f,
                "state at index {} duplicates an earlier state",
                state_id.index()
            ),
            SolveError::MissingInitialValue { state_id } => write!(
                f,
                "initial values are missing key for state at index {}",
                state_id.index()
            ),
            SolveError::NonFiniteInitialValue { state_id, value } => write!(
                f,
                "initial value for state at index {} must be finite, got {value}",
                state_id.index()
            ),
        }
    }
}

impl std::error::Error for SolveError {}
