use rayon::prelude::*;

use crate::solver::{
    ids::{ActionId, StateId},
    table::TransitionTable,
};

/// Pick the action with the highest Q value for `state`.
/// Ties go to the lowest action index.
pub(crate) fn best_action(
    table: &TransitionTable,
    state: StateId,
    gamma: f64,
    values: &[f64],
) -> (ActionId, f64) {
    let mut best_idx: usize = 0;
    let mut best_q = table.q_value(state, ActionId::from(0), gamma, values);

    for idx in 1..table.num_actions() {
        let q = table.q_value(state, ActionId::from(idx), gamma, values);
        if q > best_q {
            best_q = q;
            best_idx = idx;
        }
    }

    (ActionId::from(best_idx), best_q)
}

/// One Jacobi sweep: every entry of `next` is backed up from `current` only.
/// Returns the largest absolute per-state change.
pub(crate) fn sweep(
    table: &TransitionTable,
    gamma: f64,
    current: &[f64],
    next: &mut [f64],
    parallel: bool,
) -> f64 {
    debug_assert_eq!(current.len(), table.num_states());
    debug_assert_eq!(next.len(), table.num_states());

    let backup = |(idx, slot): (usize, &mut f64)| {
        *slot = best_action(table, StateId::from(idx), gamma, current).1;
    };

    if parallel {
        next.par_iter_mut().enumerate().for_each(backup);
    } else {
        next.iter_mut().enumerate().for_each(backup);
    }

    current
        .iter()
        .zip(next.iter())
        .fold(0.0_f64, |delta, (old, new)| delta.max((new - old).abs()))
}

/// Greedy policy with respect to `values`, one action per state.
pub(crate) fn extract_policy(table: &TransitionTable, gamma: f64, values: &[f64]) -> Vec<ActionId> {
    (0..table.num_states())
        .map(|idx| best_action(table, StateId::from(idx), gamma, values).0)
        .collect()
}
