use std::collections::HashMap;
use std::hash::Hash;

use crate::solver::ids::StateId;

/// Stable dense index for caller states.
#[derive(Debug, Clone)]
pub(crate) struct StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    states: Vec<S>,
    state_to_id: HashMap<S, StateId>,
}

impl<S> StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            state_to_id: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a state that must not be present yet.
    /// Returns `None` if the state was already interned.
    pub fn insert_unique(&mut self, state: &S) -> Option<StateId> {
        if self.state_to_id.contains_key(state) {
            return None;
        }

        let id = StateId::from(self.states.len());
        self.states.push(state.clone());
        self.state_to_id.insert(state.clone(), id);
        Some(id)
    }

    pub fn id_of(&self, state: &S) -> Option<StateId> {
        self.state_to_id.get(state).copied()
    }

    /// States in id order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}
