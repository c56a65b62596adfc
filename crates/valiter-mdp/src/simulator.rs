use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use valiter_core::Solution;

use crate::{ActionKey, CompiledMdp, StateKey};

#[derive(Debug, Clone)]
/// Seeded simulator over a compiled MDP, used to check solved values by rollouts.
pub struct MdpSimulator {
    mdp: CompiledMdp,
    rng: ChaCha8Rng,
}

impl MdpSimulator {
    /// Create a simulator with deterministic RNG seed.
    pub fn new(mdp: CompiledMdp, seed: u64) -> Self {
        Self {
            mdp,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Borrow the underlying compiled MDP.
    pub fn mdp(&self) -> &CompiledMdp {
        &self.mdp
    }

    /// Sample one `(next_state, reward, terminal)` transition.
    /// Invalid state/action inputs are treated as a no-op terminal transition.
    pub fn step(&mut self, state: StateKey, action: ActionKey) -> (StateKey, f64, bool) {
        let sample = (self.rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0);
        self.mdp
            .sample_transition(state, action, sample)
            .unwrap_or((state, 0.0, true))
    }

    /// Follow the solved policy from `start` for at most `max_steps` steps and
    /// return the discounted reward sum, using the solution's discount factor.
    pub fn episode_return(
        &mut self,
        start: StateKey,
        solution: &Solution<StateKey, ActionKey>,
        max_steps: usize,
    ) -> f64 {
        let gamma = solution.gamma();
        let mut state = start;
        let mut total_return = 0.0;
        let mut discount = 1.0;

        for _ in 0..max_steps {
            if self.mdp.is_terminal(state).unwrap_or(true) {
                break;
            }
            let Some(action) = solution.action(&state).copied() else {
                break;
            };

            let (next, reward, terminal) = self.step(state, action);
            total_return += discount * reward;
            discount *= gamma;
            state = next;

            if terminal {
                break;
            }
        }

        total_return
    }

    /// Average [`MdpSimulator::episode_return`] over `episodes` rollouts.
    /// Returns 0 when `episodes` is 0.
    pub fn estimate_return(
        &mut self,
        start: StateKey,
        solution: &Solution<StateKey, ActionKey>,
        max_steps: usize,
        episodes: usize,
    ) -> f64 {
        if episodes == 0 {
            return 0.0;
        }

        let total: f64 = (0..episodes)
            .map(|_| self.episode_return(start, solution, max_steps))
            .sum();
        total / episodes as f64
    }
}
