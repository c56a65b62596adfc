use std::collections::HashMap;

use log::debug;
use valiter_core::{MdpModel, Solution, ValueIteration};

use crate::{MdpError, MdpSpec};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Dense index for states in a compiled MDP.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Dense index for actions in a compiled MDP.
pub struct ActionKey(usize);

impl ActionKey {
    /// Return the underlying action index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ActionKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of a tabular MDP with resolved references and precomputed CDFs.
pub struct CompiledMdp {
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
    action_ids: Vec<String>,
    action_id_to_key: HashMap<String, ActionKey>,
}

#[derive(Debug, Clone)]
struct StateRec {
    terminal: bool,
    /// Indexed by action key; empty for terminal states.
    transitions: Vec<TransitionRec>,
}

#[derive(Debug, Clone)]
struct TransitionRec {
    reward: f64,
    outcomes: Vec<(StateKey, f64)>,
    cdf: Vec<f64>,
}

impl CompiledMdp {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &MdpSpec) -> Result<Self, MdpError> {
        spec.validate_with_tolerance(PROB_TOLERANCE)?;

        let state_ids: Vec<String> = spec.states.iter().map(|s| s.id.clone()).collect();
        let state_id_to_key: HashMap<String, StateKey> = state_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), StateKey::from(idx)))
            .collect();

        let action_ids = spec.actions.clone();
        let action_id_to_key: HashMap<String, ActionKey> = action_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), ActionKey::from(idx)))
            .collect();

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let terminal = state.terminal.unwrap_or(false);
            if terminal {
                states.push(StateRec {
                    terminal,
                    transitions: Vec::new(),
                });
                continue;
            }

            let declared = state.transitions.as_deref().unwrap_or(&[]);
            let mut transitions = Vec::with_capacity(action_ids.len());

            // Store in action order regardless of declaration order.
            for action_id in &action_ids {
                let transition = declared
                    .iter()
                    .find(|t| &t.action == action_id)
                    .ok_or_else(|| MdpError::MissingTransition {
                        state: state.id.clone(),
                        action: action_id.clone(),
                    })?;

                let mut outcomes = Vec::with_capacity(transition.outcomes.len());
                let mut cdf = Vec::with_capacity(transition.outcomes.len());
                let mut cumulative = 0.0_f64;

                for outcome in &transition.outcomes {
                    cumulative += outcome.prob;
                    cdf.push(cumulative);
                    let next = state_id_to_key.get(&outcome.next).copied().ok_or_else(|| {
                        MdpError::UnknownNextState {
                            state: state.id.clone(),
                            action: action_id.clone(),
                            next: outcome.next.clone(),
                        }
                    })?;
                    outcomes.push((next, outcome.prob));
                }

                transitions.push(TransitionRec {
                    reward: transition.reward,
                    outcomes,
                    cdf,
                });
            }

            states.push(StateRec {
                terminal,
                transitions,
            });
        }

        debug!(
            "compiled MDP with {} states and {} actions",
            states.len(),
            action_ids.len()
        );

        Ok(Self {
            states,
            state_ids,
            state_id_to_key,
            action_ids,
            action_id_to_key,
        })
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Return the number of actions shared by all states.
    pub fn action_count(&self) -> usize {
        self.action_ids.len()
    }

    /// All state keys in declaration order.
    pub fn state_keys(&self) -> Vec<StateKey> {
        (0..self.states.len()).map(StateKey::from).collect()
    }

    /// All action keys in declaration order.
    pub fn action_keys(&self) -> Vec<ActionKey> {
        (0..self.action_ids.len()).map(ActionKey::from).collect()
    }

    /// Check whether a state is terminal.
    pub fn is_terminal(&self, key: StateKey) -> Option<bool> {
        self.states.get(key.index()).map(|state| state.terminal)
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }

    /// Convert an action key back to its original string id.
    pub fn action_id(&self, key: ActionKey) -> Option<&str> {
        self.action_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled action key.
    pub fn action_key(&self, id: &str) -> Option<ActionKey> {
        self.action_id_to_key.get(id).copied()
    }

    /// Run value iteration over every state and action of this MDP.
    pub fn solve(
        &self,
        solver: &ValueIteration,
    ) -> Result<Solution<StateKey, ActionKey>, MdpError> {
        let solution = solver.solve(&self.state_keys(), &self.action_keys(), self, None)?;
        Ok(solution)
    }

    fn transition(&self, state: StateKey, action: ActionKey) -> Option<&TransitionRec> {
        self.states
            .get(state.index())?
            .transitions
            .get(action.index())
    }

    /// Sample one transition for `(state, action)` using a uniform sample in `[0, 1)`.
    /// Terminal states loop onto themselves with zero reward.
    pub(crate) fn sample_transition(
        &self,
        state: StateKey,
        action: ActionKey,
        sample: f64,
    ) -> Option<(StateKey, f64, bool)> {
        let rec = self.states.get(state.index())?;
        if rec.terminal {
            return Some((state, 0.0, true));
        }

        let transition = rec.transitions.get(action.index())?;
        if transition.outcomes.is_empty() {
            return None;
        }

        let mut chosen_idx = transition.cdf.partition_point(|p| *p <= sample);
        if chosen_idx >= transition.outcomes.len() {
            chosen_idx = transition.outcomes.len() - 1;
        }

        let (next, _) = transition.outcomes[chosen_idx];
        let next_terminal = self.states.get(next.index())?.terminal;
        Some((next, transition.reward, next_terminal))
    }
}

impl MdpModel<StateKey, ActionKey> for CompiledMdp {
    fn probability(&self, next: &StateKey, state: &StateKey, action: &ActionKey) -> f64 {
        match self.is_terminal(*state) {
            Some(true) => {
                if next == state {
                    1.0
                } else {
                    0.0
                }
            }
            Some(false) => self
                .transition(*state, *action)
                .map(|t| {
                    t.outcomes
                        .iter()
                        .filter(|(key, _)| key == next)
                        .map(|(_, prob)| prob)
                        .sum()
                })
                .unwrap_or(0.0),
            None => 0.0,
        }
    }

    fn reward(&self, state: &StateKey, action: &ActionKey) -> f64 {
        self.transition(*state, *action)
            .map(|t| t.reward)
            .unwrap_or(0.0)
    }
}
