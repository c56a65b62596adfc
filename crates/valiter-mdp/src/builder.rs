use crate::{CompiledMdp, MdpError, MdpSpec, OutcomeSpec, StateSpec, TransitionSpec};

#[derive(Debug, Clone, Default)]
/// Struct to build tabular MDPs
pub struct MdpBuilder {
    actions: Vec<String>,
    states: Vec<StateSpec>,
}

impl MdpBuilder {
    /// Create a new MdpBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an action shared by all states.
    /// Declaration order decides ties between equally good actions.
    pub fn add_action(&mut self, id: impl Into<String>) -> &mut Self {
        self.actions.push(id.into());
        self
    }

    /// Add a new state
    /// Terminal states absorb every action and cannot take transitions
    pub fn add_state(&mut self, id: impl Into<String>, terminal: bool) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            terminal: Some(terminal),
            transitions: Some(Vec::new()),
        });
        self
    }

    /// Add the transition for an action taken in a state
    pub fn add_transition(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl Into<String>,
        reward: f64,
    ) -> Result<&mut Self, MdpError> {
        let state_id = state_id.as_ref();
        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| MdpError::BuilderUnknownState {
                state: state_id.to_string(),
            })?;

        let transitions = state.transitions.get_or_insert_with(Vec::new);
        transitions.push(TransitionSpec {
            action: action_id.into(),
            reward,
            outcomes: Vec::new(),
        });

        Ok(self)
    }

    /// Add a successor to a transition
    /// Transitions can be stochastic so every outcome carries its own probability
    pub fn add_outcome(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl AsRef<str>,
        next: impl Into<String>,
        prob: f64,
    ) -> Result<&mut Self, MdpError> {
        let state_id = state_id.as_ref();
        let action_id = action_id.as_ref();

        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| MdpError::BuilderUnknownState {
                state: state_id.to_string(),
            })?;

        let transitions = state.transitions.get_or_insert_with(Vec::new);
        let transition = transitions
            .iter_mut()
            .find(|t| t.action == action_id)
            .ok_or_else(|| MdpError::BuilderUnknownTransition {
                state: state_id.to_string(),
                action: action_id.to_string(),
            })?;

        transition.outcomes.push(OutcomeSpec {
            next: next.into(),
            prob,
        });

        Ok(self)
    }

    pub fn build_spec(self) -> Result<MdpSpec, MdpError> {
        let spec = MdpSpec {
            version: Some(1),
            actions: self.actions,
            states: self.states,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledMdp, MdpError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
