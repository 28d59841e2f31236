use super::{check_discount, expected_utility, greedy_policy, residual_bound, zero_utilities};
use crate::mdps::{Mdp, Solution, SolverError};

/// Value Iteration - Sutton & Barto 2018, ch. 4.4.
///
/// Runs synchronous (Jacobi) Bellman backups from an all-zeros utility
/// table: every state of sweep `k` reads only sweep `k-1`'s table. Terminal
/// states are pinned to their reward; every other state gets
/// `reward + discount * max_a E[U(s')]`. Sweeping stops once the largest
/// per-sweep change drops below `epsilon * (1 - discount) / discount` or
/// after `max_iterations` sweeps, whichever comes first. The policy is
/// extracted greedily from the final table in one extra pass, with ties
/// broken by the model's action enumeration order.
pub fn value_iteration<M: Mdp>(
    mdp: &M,
    discount: f64,
    max_iterations: usize,
    epsilon: f64,
) -> Result<Solution<M::State, M::Action>, SolverError> {
    check_discount(discount)?;

    let states = mdp.states();
    let bound = residual_bound(epsilon, discount);
    let mut utilities = zero_utilities(mdp);
    let mut residuals = Vec::new();
    let mut converged = false;

    for _ in 0..max_iterations {
        // Double-buffered sweep: reads go to `utilities`, writes to `next`.
        let mut next = utilities.clone();
        let mut delta: f64 = 0.;

        for &s in &states {
            let u_new = if mdp.is_terminal(s) {
                mdp.reward(s)
            } else {
                let best_q = mdp
                    .actions(s)
                    .into_iter()
                    .map(|a| expected_utility(mdp, s, a, &utilities))
                    .fold(f64::NEG_INFINITY, f64::max);
                mdp.reward(s) + discount * best_q
            };

            delta = delta.max((u_new - utilities[&s]).abs());
            next.insert(s, u_new);
        }

        utilities = next;
        residuals.push(delta);
        if delta < bound {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(
            max_iterations,
            epsilon,
            "value iteration hit the sweep cap before meeting the convergence bound"
        );
    }

    let policy = greedy_policy(mdp, &utilities);
    let iterations = residuals.len();

    Ok(Solution {
        policy,
        utilities,
        converged,
        iterations,
        residuals,
    })
}
