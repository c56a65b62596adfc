/// Transition and reward functions of a finite MDP.
///
/// Both methods must be pure: the solver may call them in any order and
/// any number of times, and it assumes repeated calls return the same value.
/// For each `(state, action)` the probabilities over all next states are
/// expected to sum to 1. The solver does not check this.
pub trait MdpModel<S, A> {
    /// Probability of landing in `next` after taking `action` in `state`.
    fn probability(&self, next: &S, state: &S, action: &A) -> f64;

    /// Immediate reward for taking `action` in `state`.
    fn reward(&self, state: &S, action: &A) -> f64;
}

/// Model assembled from a probability closure and a reward closure.
#[derive(Debug, Clone, Copy)]
pub struct FnModel<P, R> {
    probability: P,
    reward: R,
}

impl<P, R> FnModel<P, R> {
    pub fn new<S, A>(probability: P, reward: R) -> Self
    where
        P: Fn(&S, &S, &A) -> f64,
        R: Fn(&S, &A) -> f64,
    {
        FnModel {
            probability,
            reward,
        }
    }
}

impl<S, A, P, R> MdpModel<S, A> for FnModel<P, R>
where
    P: Fn(&S, &S, &A) -> f64,
    R: Fn(&S, &A) -> f64,
{
    fn probability(&self, next: &S, state: &S, action: &A) -> f64 {
        (self.probability)(next, state, action)
    }

    fn reward(&self, state: &S, action: &A) -> f64 {
        (self.reward)(state, action)
    }
}

impl<S, A, M> MdpModel<S, A> for &M
where
    M: MdpModel<S, A> + ?Sized,
{
    fn probability(&self, next: &S, state: &S, action: &A) -> f64 {
        (**self).probability(next, state, action)
    }

    fn reward(&self, state: &S, action: &A) -> f64 {
        (**self).reward(state, action)
    }
}
