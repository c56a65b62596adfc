use std::{collections::HashMap, hash::Hash};

use crate::solver::{
    ids::{ActionId, StateId},
    interner::StateInterner,
    snapshot::{SOLUTION_SCHEMA_VERSION, SolutionSnapshot, StateSnapshot},
    value_iteration::RunMetrics,
};

/// Result of a value-iteration run: final values, greedy policy and metrics.
///
/// Values and policy are stored densely in the order the states were given.
#[derive(Debug, Clone)]
pub struct Solution<S, A>
where
    S: Clone + Eq + Hash,
{
    states: StateInterner<S>,
    actions: Vec<A>,
    values: Vec<f64>,
    policy: Vec<ActionId>,
    gamma: f64,
    metrics: RunMetrics,
}

impl<S, A> Solution<S, A>
where
    S: Clone + Eq + Hash,
{
    pub(crate) fn new(
        states: StateInterner<S>,
        actions: Vec<A>,
        values: Vec<f64>,
        policy: Vec<ActionId>,
        gamma: f64,
        metrics: RunMetrics,
    ) -> Self {
        Solution {
            states,
            actions,
            values,
            policy,
            gamma,
            metrics,
        }
    }

    /// Number of states covered by the solution.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Discount factor the values were computed with.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Dense id assigned to `state`, if it was part of the run.
    pub fn state_id(&self, state: &S) -> Option<StateId> {
        self.states.id_of(state)
    }

    /// Final value of `state`.
    pub fn value(&self, state: &S) -> Option<f64> {
        self.state_id(state).map(|id| self.values[id.index()])
    }

    /// Optimal action at `state`.
    pub fn action(&self, state: &S) -> Option<&A> {
        self.action_id(state)
            .map(|action_id| &self.actions[action_id.index()])
    }

    /// Index of the optimal action at `state` in the caller's action order.
    pub fn action_id(&self, state: &S) -> Option<ActionId> {
        self.state_id(state).map(|id| self.policy[id.index()])
    }

    /// Final values in state order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Optimal action ids in state order.
    pub fn policy_ids(&self) -> &[ActionId] {
        &self.policy
    }

    /// States in the order they were given.
    pub fn states(&self) -> &[S] {
        self.states.states()
    }

    /// Iterate `(state, action, value)` in state order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A, f64)> + '_ {
        self.states
            .states()
            .iter()
            .zip(self.policy.iter())
            .zip(self.values.iter())
            .map(|((state, action_id), value)| (state, &self.actions[action_id.index()], *value))
    }

    /// Value function as a map keyed by state.
    pub fn value_function(&self) -> HashMap<S, f64> {
        self.states
            .states()
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }

    /// Policy as a map keyed by state.
    pub fn optimal_policy(&self) -> HashMap<S, A>
    where
        A: Clone,
    {
        self.iter()
            .map(|(state, action, _)| (state.clone(), action.clone()))
            .collect()
    }

    /// Serializable view keyed by dense ids.
    pub fn snapshot(&self) -> SolutionSnapshot {
        let states = self
            .values
            .iter()
            .zip(self.policy.iter())
            .enumerate()
            .map(|(idx, (value, action_id))| StateSnapshot {
                state_id: idx,
                value: *value,
                action_id: action_id.index(),
            })
            .collect();

        SolutionSnapshot {
            schema_version: SOLUTION_SCHEMA_VERSION,
            gamma: self.gamma,
            iterations_requested: self.metrics.iterations_requested,
            sweeps_completed: self.metrics.sweeps_completed,
            final_delta: self.metrics.final_delta,
            converged: self.metrics.converged,
            state_count: self.states.len(),
            action_count: self.actions.len(),
            states,
        }
    }
}
