use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledMdp, MdpError, compiled::PROB_TOLERANCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable tabular MDP schema used for YAML IO and validation.
pub struct MdpSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Action ids shared by every state. Order decides policy tie-breaks.
    pub actions: Vec<String>,
    /// All state declarations in the model. Order fixes state indices.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration in the MDP schema.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Terminal states absorb every action with zero reward (defaults to `false`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
    /// One transition per action for non-terminal states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<TransitionSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Reward and successor distribution for one action taken in a state.
pub struct TransitionSpec {
    pub action: String,
    pub reward: f64,
    pub outcomes: Vec<OutcomeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One probabilistic successor of a transition.
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
}

impl MdpSpec {
    /// Validate schema invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), MdpError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, transitions, and probability constraints.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), MdpError> {
        if self.states.is_empty() {
            return Err(MdpError::NoStates);
        }
        if self.actions.is_empty() {
            return Err(MdpError::NoActions);
        }

        let mut action_ids = HashSet::with_capacity(self.actions.len());
        for action in &self.actions {
            if !action_ids.insert(action.as_str()) {
                return Err(MdpError::DuplicateActionId { id: action.clone() });
            }
        }

        let mut state_ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !state_ids.insert(state.id.as_str()) {
                return Err(MdpError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        for state in &self.states {
            let terminal = state.terminal.unwrap_or(false);
            let transitions = state.transitions.as_deref().unwrap_or(&[]);

            if terminal {
                if !transitions.is_empty() {
                    return Err(MdpError::TerminalStateHasTransitions {
                        state: state.id.clone(),
                    });
                }
                continue;
            }

            let mut declared = HashSet::with_capacity(transitions.len());
            for transition in transitions {
                if !action_ids.contains(transition.action.as_str()) {
                    return Err(MdpError::UnknownAction {
                        state: state.id.clone(),
                        action: transition.action.clone(),
                    });
                }
                if !declared.insert(transition.action.as_str()) {
                    return Err(MdpError::DuplicateTransition {
                        state: state.id.clone(),
                        action: transition.action.clone(),
                    });
                }
                validate_transition(&state.id, transition, &state_ids, tolerance)?;
            }

            // The solver maximizes over every action, so each must be defined.
            if let Some(missing) = self.actions.iter().find(|a| !declared.contains(a.as_str())) {
                return Err(MdpError::MissingTransition {
                    state: state.id.clone(),
                    action: missing.clone(),
                });
            }
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledMdp, MdpError> {
        CompiledMdp::from_spec(self)
    }
}

fn validate_transition(
    state_id: &str,
    transition: &TransitionSpec,
    known_state_ids: &HashSet<&str>,
    tolerance: f64,
) -> Result<(), MdpError> {
    if !transition.reward.is_finite() {
        return Err(MdpError::InvalidReward {
            state: state_id.to_string(),
            action: transition.action.clone(),
            value: transition.reward,
        });
    }

    if transition.outcomes.is_empty() {
        return Err(MdpError::EmptyOutcomes {
            state: state_id.to_string(),
            action: transition.action.clone(),
        });
    }

    let mut sum = 0.0_f64;
    for (i, outcome) in transition.outcomes.iter().enumerate() {
        if !outcome.prob.is_finite() || outcome.prob < 0.0 {
            return Err(MdpError::InvalidProbability {
                state: state_id.to_string(),
                action: transition.action.clone(),
                outcome_index: i,
                value: outcome.prob,
            });
        }

        if !known_state_ids.contains(outcome.next.as_str()) {
            return Err(MdpError::UnknownNextState {
                state: state_id.to_string(),
                action: transition.action.clone(),
                next: outcome.next.clone(),
            });
        }

        sum += outcome.prob;
    }

    if (sum - 1.0).abs() > tolerance {
        return Err(MdpError::ProbabilitySum {
            state: state_id.to_string(),
            action: transition.action.clone(),
            sum,
            tolerance,
        });
    }

    Ok(())
}
