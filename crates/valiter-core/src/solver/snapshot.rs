use serde::{Deserialize, Serialize};

pub(crate) const SOLUTION_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSnapshot {
    pub schema_version: u32,
    pub gamma: f64,
    pub iterations_requested: usize,
    pub sweeps_completed: usize,
    pub final_delta: f64,
    pub converged: bool,
    pub state_count: usize,
    pub action_count: usize,
    pub states: Vec<StateSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state_id: usize,
    pub value: f64,
    pub action_id: usize,
}

impl SolutionSnapshot {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot previously written with [`SolutionSnapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
