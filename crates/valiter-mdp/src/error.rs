use thiserror::Error;
use valiter_core::SolveError;

#[derive(Debug, Error)]
/// Error type for MDP loading, validation, compilation, builder and grid-world operations.
pub enum MdpError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("MDP must declare at least one state")]
    NoStates,

    #[error("MDP must declare at least one action")]
    NoActions,

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("duplicate action id '{id}'")]
    DuplicateActionId { id: String },

    #[error("state '{state}' declares more than one transition for action '{action}'")]
    DuplicateTransition { state: String, action: String },

    #[error("state '{state}' references unknown action '{action}'")]
    UnknownAction { state: String, action: String },

    #[error("state '{state}' has no transition for action '{action}'")]
    MissingTransition { state: String, action: String },

    #[error("state '{state}' is terminal and cannot declare transitions")]
    TerminalStateHasTransitions { state: String },

    #[error("outcome in state '{state}', action '{action}' references unknown next state '{next}'")]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },

    #[error(
        "invalid probability in state '{state}', action '{action}', outcome {outcome_index}: {value}"
    )]
    InvalidProbability {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error("invalid reward in state '{state}', action '{action}': {value}")]
    InvalidReward {
        state: String,
        action: String,
        value: f64,
    },

    #[error(
        "probability sum for state '{state}', action '{action}' must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },

    #[error("state '{state}' action '{action}' must contain at least one outcome")]
    EmptyOutcomes { state: String, action: String },

    #[error("builder referenced unknown state '{state}'")]
    BuilderUnknownState { state: String },

    #[error("builder referenced unknown transition for action '{action}' in state '{state}'")]
    BuilderUnknownTransition { state: String, action: String },

    #[error("grid world must contain at least one cell")]
    EmptyGrid,

    #[error("intended move probability must be within [0, 1], got {value}")]
    InvalidMoveProbability { value: f64 },

    #[error("boundary penalty must be finite, got {value}")]
    InvalidBoundaryPenalty { value: f64 },

    #[error("reward for cell ({row}, {col}) must be finite, got {value}")]
    InvalidCellReward { row: i64, col: i64, value: f64 },

    #[error(transparent)]
    Solve(#[from] SolveError),
}
