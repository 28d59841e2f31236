pub mod solvers;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Expected discounted return of a state.
pub type Utility = f64;

/// One stochastic outcome of taking an action: the successor state and the
/// probability mass assigned to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    pub next_state: S,
    pub probability: f64,
}

/// Markov Decision Process - Sutton & Barto 2018.
///
/// The environment model is read-only to the solvers: a finite state set, a
/// per-state action set (empty exactly for terminal states), a total reward
/// function over states, and a stochastic transition function.
///
/// Contract (assumed, not re-validated on the hot path): for every
/// non-terminal state and available action, `transitions` lists valid model
/// states with non-negative probabilities summing to 1.0, with outcomes
/// landing on the same successor aggregated into a single entry. Querying an
/// unknown state, or an action the state does not offer, is a programming
/// error and panics.
pub trait Mdp {
    type State: Copy + Eq + Hash + Debug;
    type Action: Copy + Eq + Debug;

    /// All valid states, in a deterministic enumeration order.
    fn states(&self) -> Vec<Self::State>;

    /// Actions available at `state`; empty iff `state` is terminal.
    fn actions(&self, state: Self::State) -> Vec<Self::Action>;

    /// Reward for occupying `state`. Total: states without an explicit
    /// reward entry get the model's default (the living penalty).
    fn reward(&self, state: Self::State) -> Utility;

    fn is_terminal(&self, state: Self::State) -> bool;

    /// Stochastic outcomes of taking `action` in `state`; empty for
    /// terminal states (no action is ever taken from one).
    fn transitions(&self, state: Self::State, action: Self::Action) -> Vec<Transition<Self::State>>;
}

/// State -> chosen action; `None` for terminal states.
pub type Policy<S, A> = HashMap<S, Option<A>>;

/// State -> expected-return estimate.
pub type Utilities<S> = HashMap<S, Utility>;

/// Result of one solver run.
#[derive(Debug, Clone)]
pub struct Solution<S: Eq + Hash, A> {
    pub policy: Policy<S, A>,
    pub utilities: Utilities<S>,
    /// Whether the Bellman-residual bound was met before the iteration cap.
    /// Hitting the cap is not fatal; the best current estimate is returned.
    pub converged: bool,
    /// Sweeps executed (value iteration) or outer rounds executed (policy
    /// iteration).
    pub iterations: usize,
    /// Max absolute utility change per sweep (value iteration) or at the end
    /// of each evaluation phase (policy iteration).
    pub residuals: Vec<f64>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("discount factor must lie strictly within (0, 1), got {0}")]
    InvalidDiscount(f64),
}
