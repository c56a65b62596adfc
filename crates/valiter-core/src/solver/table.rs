use crate::solver::ids::{ActionId, StateId};

/// Model evaluated once into dense rows, one per `(state, action)` pair.
/// Rows are laid out state-major: `state * num_actions + action`.
#[derive(Debug, Clone)]
pub(crate) struct TransitionTable {
    num_states: usize,
    num_actions: usize,
    rows: Vec<TransitionRow>,
}

#[derive(Debug, Clone)]
struct TransitionRow {
    reward: f64,
    /// Successors with non-zero probability, in state order.
    outcomes: Vec<(StateId, f64)>,
}

impl TransitionTable {
    /// Evaluate `reward` for every `(s, a)` and `probability` for every
    /// `(s', s, a)`. The first callback error aborts compilation.
    pub fn compile<S, A, FP, FR, E>(
        states: &[S],
        actions: &[A],
        mut probability: FP,
        mut reward: FR,
    ) -> Result<Self, E>
    where
        FP: FnMut(&S, &S, &A) -> Result<f64, E>,
        FR: FnMut(&S, &A) -> Result<f64, E>,
    {
        let mut rows = Vec::with_capacity(states.len() * actions.len());

        for state in states {
            for action in actions {
                let reward = reward(state, action)?;
                let mut outcomes = Vec::new();

                for (idx, next) in states.iter().enumerate() {
                    let prob = probability(next, state, action)?;
                    // Zero terms add nothing to the expectation.
                    if prob != 0.0 {
                        outcomes.push((StateId::from(idx), prob));
                    }
                }

                rows.push(TransitionRow { reward, outcomes });
            }
        }

        Ok(TransitionTable {
            num_states: states.len(),
            num_actions: actions.len(),
            rows,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn row(&self, state: StateId, action: ActionId) -> &TransitionRow {
        &self.rows[state.index() * self.num_actions + action.index()]
    }

    /// `R(s, a) + gamma * sum_{s'} P(s', s, a) * V[s']`
    pub fn q_value(&self, state: StateId, action: ActionId, gamma: f64, values: &[f64]) -> f64 {
        let row = self.row(state, action);
        let expected = row
            .outcomes
            .iter()
            .fold(0.0_f64, |acc, &(next, prob)| acc + prob * values[next.index()]);
        row.reward + gamma * expected
    }
}
