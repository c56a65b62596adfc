use proptest::prelude::*;

use crate::{MdpModel, SolutionSnapshot, SolverConfig, ValueIteration};

/// Dense random MDP over `0..num_states` and `0..num_actions`.
#[derive(Debug, Clone)]
struct RandomMdp {
    num_states: usize,
    num_actions: usize,
    probs: Vec<f64>,
    rewards: Vec<f64>,
}

impl RandomMdp {
    fn new(num_states: usize, num_actions: usize, weights: Vec<f64>, rewards: Vec<f64>) -> Self {
        let mut probs = weights;
        for row_idx in 0..num_states * num_actions {
            let row = &mut probs[row_idx * num_states..(row_idx + 1) * num_states];
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                row.iter_mut().for_each(|p| *p /= sum);
            } else {
                let state = row_idx / num_actions;
                row[state] = 1.0;
            }
        }

        RandomMdp {
            num_states,
            num_actions,
            probs,
            rewards,
        }
    }

    fn states(&self) -> Vec<usize> {
        (0..self.num_states).collect()
    }

    fn actions(&self) -> Vec<usize> {
        (0..self.num_actions).collect()
    }

    fn q(&self, state: usize, action: usize, gamma: f64, values: &[f64]) -> f64 {
        let expected: f64 = (0..self.num_states)
            .map(|next| self.probability(&next, &state, &action) * values[next])
            .sum();
        self.reward(&state, &action) + gamma * expected
    }
}

impl MdpModel<usize, usize> for RandomMdp {
    fn probability(&self, next: &usize, state: &usize, action: &usize) -> f64 {
        self.probs[(state * self.num_actions + action) * self.num_states + next]
    }

    fn reward(&self, state: &usize, action: &usize) -> f64 {
        self.rewards[state * self.num_actions + action]
    }
}

fn arb_mdp() -> impl Strategy<Value = RandomMdp> {
    (1usize..6, 1usize..4).prop_flat_map(|(num_states, num_actions)| {
        (
            proptest::collection::vec(0.0f64..1.0, num_states * num_actions * num_states),
            proptest::collection::vec(-10.0f64..10.0, num_states * num_actions),
        )
            .prop_map(move |(weights, rewards)| {
                RandomMdp::new(num_states, num_actions, weights, rewards)
            })
    })
}

proptest! {
    #[test]
    fn parallel_sweeps_are_bit_identical(
        mdp in arb_mdp(),
        gamma in 0.0f64..0.99,
        budget in 1usize..60,
    ) {
        let states = mdp.states();
        let actions = mdp.actions();

        let sequential = ValueIteration::new(SolverConfig::new(gamma, budget))
            .unwrap()
            .solve(&states, &actions, &mdp, None)
            .unwrap();
        let parallel = ValueIteration::new(SolverConfig::new(gamma, budget).with_parallel(true))
            .unwrap()
            .solve(&states, &actions, &mdp, None)
            .unwrap();

        for (a, b) in sequential.values().iter().zip(parallel.values()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
        prop_assert_eq!(sequential.policy_ids(), parallel.policy_ids());
    }

    #[test]
    fn values_stay_within_discounted_reward_bound(
        mdp in arb_mdp(),
        gamma in 0.0f64..0.95,
        budget in 1usize..200,
    ) {
        let states = mdp.states();
        let actions = mdp.actions();
        let max_reward = mdp.rewards.iter().fold(0.0f64, |acc, r| acc.max(r.abs()));
        let bound = max_reward / (1.0 - gamma) + 1e-9;

        let solution = ValueIteration::new(SolverConfig::new(gamma, budget))
            .unwrap()
            .solve(&states, &actions, &mdp, None)
            .unwrap();

        for value in solution.values() {
            prop_assert!(value.abs() <= bound);
        }
    }

    #[test]
    fn snapshot_json_round_trips_exactly(
        mdp in arb_mdp(),
        gamma in 0.0f64..0.99,
        budget in 1usize..40,
    ) {
        let states = mdp.states();
        let actions = mdp.actions();

        let solution = ValueIteration::new(SolverConfig::new(gamma, budget))
            .unwrap()
            .solve(&states, &actions, &mdp, None)
            .unwrap();
        let snapshot = solution.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = SolutionSnapshot::from_json(&json).unwrap();

        prop_assert_eq!(restored.gamma.to_bits(), snapshot.gamma.to_bits());
        prop_assert_eq!(restored.final_delta.to_bits(), snapshot.final_delta.to_bits());
        for (a, b) in restored.states.iter().zip(&snapshot.states) {
            prop_assert_eq!(a.value.to_bits(), b.value.to_bits());
        }
        prop_assert_eq!(restored, snapshot);
    }

    #[test]
    fn converged_values_satisfy_bellman_optimality(mdp in arb_mdp(), gamma in 0.0f64..0.9) {
        let states = mdp.states();
        let actions = mdp.actions();

        let solution = ValueIteration::new(SolverConfig::new(gamma, 10_000).with_theta(1e-11))
            .unwrap()
            .solve(&states, &actions, &mdp, None)
            .unwrap();
        prop_assert!(solution.metrics().converged);

        let values = solution.values();
        for state in &states {
            let chosen = solution.action(state).copied().unwrap();
            let chosen_q = mdp.q(*state, chosen, gamma, values);
            let best_q = actions
                .iter()
                .map(|a| mdp.q(*state, *a, gamma, values))
                .fold(f64::NEG_INFINITY, f64::max);

            prop_assert!((values[*state] - best_q).abs() < 1e-8);
            prop_assert!(chosen_q >= best_q - 1e-9);
        }
    }
}
