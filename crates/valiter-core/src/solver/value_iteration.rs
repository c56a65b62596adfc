use std::{collections::HashMap, hash::Hash};

use log::{debug, info, warn};

use crate::solver::{
    config::SolverConfig,
    error::SolveError,
    ids::StateId,
    interner::StateInterner,
    model::{FnModel, MdpModel},
    solution::Solution,
    sweep::{extract_policy, sweep},
    table::TransitionTable,
};

/// Metrics emitted after every sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepMetrics {
    /// 1-based number of the sweep that just finished.
    pub sweep: usize,
    /// Largest absolute per-state value change during the sweep.
    pub delta: f64,
}

/// Aggregate metrics for a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    pub iterations_requested: usize,
    pub sweeps_completed: usize,
    pub final_delta: f64,
    /// `true` only if a threshold was set and the last delta fell below it.
    pub converged: bool,
}

impl RunMetrics {
    fn new(iterations_requested: usize) -> Self {
        RunMetrics {
            iterations_requested,
            sweeps_completed: 0,
            final_delta: 0.0,
            converged: false,
        }
    }

    fn record(&mut self, metrics: SweepMetrics) {
        self.sweeps_completed = metrics.sweep;
        self.final_delta = metrics.delta;
    }
}

/// Value-iteration solver for finite MDPs.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    /// Create a solver after validating `config`.
    pub fn new(config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        Ok(ValueIteration { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the MDP given by `model` over the ordered `states` and `actions`.
    ///
    /// `initial_values` seeds the value function and must contain every state;
    /// the map is only read. Without it every state starts at zero.
    pub fn solve<S, A, M>(
        &self,
        states: &[S],
        actions: &[A],
        model: &M,
        initial_values: Option<&HashMap<S, f64>>,
    ) -> Result<Solution<S, A>, SolveError>
    where
        S: Clone + Eq + Hash,
        A: Clone,
        M: MdpModel<S, A> + ?Sized,
    {
        self.solve_with_hook(states, actions, model, initial_values, |_| {})
    }

    /// Solve and invoke a callback after each completed sweep.
    pub fn solve_with_hook<S, A, M, FHook>(
        &self,
        states: &[S],
        actions: &[A],
        model: &M,
        initial_values: Option<&HashMap<S, f64>>,
        on_sweep: FHook,
    ) -> Result<Solution<S, A>, SolveError>
    where
        S: Clone + Eq + Hash,
        A: Clone,
        M: MdpModel<S, A> + ?Sized,
        FHook: FnMut(&SweepMetrics),
    {
        self.solve_fallible(
            states,
            actions,
            |next, state, action| Ok::<f64, SolveError>(model.probability(next, state, action)),
            |state, action| Ok::<f64, SolveError>(model.reward(state, action)),
            initial_values,
            on_sweep,
        )
    }

    /// Fallible variant where the model callbacks may fail.
    ///
    /// Configuration errors are checked before any callback runs. The first
    /// callback error aborts the run and is returned unchanged.
    pub fn solve_fallible<S, A, FP, FR, FHook, E>(
        &self,
        states: &[S],
        actions: &[A],
        probability: FP,
        reward: FR,
        initial_values: Option<&HashMap<S, f64>>,
        mut on_sweep: FHook,
    ) -> Result<Solution<S, A>, E>
    where
        S: Clone + Eq + Hash,
        A: Clone,
        FP: FnMut(&S, &S, &A) -> Result<f64, E>,
        FR: FnMut(&S, &A) -> Result<f64, E>,
        FHook: FnMut(&SweepMetrics),
        E: From<SolveError>,
    {
        if states.is_empty() {
            return Err(SolveError::EmptyStates.into());
        }
        if actions.is_empty() {
            return Err(SolveError::EmptyActions.into());
        }

        let mut interner = StateInterner::with_capacity(states.len());
        for (idx, state) in states.iter().enumerate() {
            if interner.insert_unique(state).is_none() {
                return Err(SolveError::DuplicateState {
                    state_id: StateId::from(idx),
                }
                .into());
            }
        }

        let mut current = match initial_values {
            Some(init) => seed_values(&interner, init)?,
            None => vec![0.0; states.len()],
        };
        let mut next = vec![0.0; states.len()];

        let table = TransitionTable::compile(states, actions, probability, reward)?;

        let config = &self.config;
        let mut metrics = RunMetrics::new(config.max_iterations);

        for sweep_idx in 1..=config.max_iterations {
            let delta = sweep(&table, config.gamma, &current, &mut next, config.parallel);
            std::mem::swap(&mut current, &mut next);

            let sweep_metrics = SweepMetrics {
                sweep: sweep_idx,
                delta,
            };
            debug!("sweep {sweep_idx}: delta={delta:e}");
            on_sweep(&sweep_metrics);
            metrics.record(sweep_metrics);

            if config.has_converged(delta) {
                metrics.converged = true;
                break;
            }
        }

        if let (Some(theta), false) = (config.theta, metrics.converged) {
            warn!(
                "threshold {theta:e} not reached after {} sweeps (last delta {:e})",
                metrics.sweeps_completed, metrics.final_delta
            );
        }
        info!(
            "value iteration finished: states={} actions={} sweeps={} delta={:e}",
            states.len(),
            actions.len(),
            metrics.sweeps_completed,
            metrics.final_delta
        );

        let policy = extract_policy(&table, config.gamma, &current);

        Ok(Solution::new(
            interner,
            actions.to_vec(),
            current,
            policy,
            config.gamma,
            metrics,
        ))
    }
}

/// Copy the caller's initial values into state order.
fn seed_values<S>(
    interner: &StateInterner<S>,
    init: &HashMap<S, f64>,
) -> Result<Vec<f64>, SolveError>
where
    S: Clone + Eq + Hash,
{
    interner
        .states()
        .iter()
        .enumerate()
        .map(|(idx, state)| -> Result<f64, SolveError> {
            let state_id = StateId::from(idx);
            let value = init
                .get(state)
                .copied()
                .ok_or(SolveError::MissingInitialValue { state_id })?;
            if !value.is_finite() {
                return Err(SolveError::NonFiniteInitialValue { state_id, value });
            }
            Ok(value)
        })
        .collect()
}

/// Run value iteration with plain closures for `P(s', s, a)` and `R(s, a)`.
///
/// Equivalent to building a [`ValueIteration`] from a [`SolverConfig`] with
/// the given `gamma`, `max_iterations` and `theta` and solving an [`FnModel`].
#[allow(clippy::too_many_arguments)]
pub fn value_iteration<S, A, P, R>(
    states: &[S],
    actions: &[A],
    probability: P,
    reward: R,
    gamma: f64,
    max_iterations: usize,
    initial_values: Option<&HashMap<S, f64>>,
    theta: Option<f64>,
) -> Result<Solution<S, A>, SolveError>
where
    S: Clone + Eq + Hash,
    A: Clone,
    P: Fn(&S, &S, &A) -> f64,
    R: Fn(&S, &A) -> f64,
{
    let config = SolverConfig {
        gamma,
        max_iterations,
        theta,
        parallel: false,
    };
    let solver = ValueIteration::new(config)?;
    let model = FnModel::new(probability, reward);
    solver.solve(states, actions, &model, initial_values)
}
