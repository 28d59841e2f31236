pub mod policy_iteration;
pub mod value_iteration;

use super::{Mdp, Policy, SolverError, Utilities};

/// Probability-weighted utility of the successors of (state, action) under
/// the given utility table.
pub(crate) fn expected_utility<M: Mdp>(
    mdp: &M,
    state: M::State,
    action: M::Action,
    utilities: &Utilities<M::State>,
) -> f64 {
    mdp.transitions(state, action)
        .iter()
        .map(|t| t.probability * utilities[&t.next_state])
        .sum()
}

/// Greedy policy with respect to a utility table.
///
/// Tie-break rule: actions are scanned in the model's enumeration order and
/// only a strictly greater expected utility displaces the incumbent, so the
/// first (lowest-index) maximizing action wins. Terminal states map to
/// `None`.
pub(crate) fn greedy_policy<M: Mdp>(
    mdp: &M,
    utilities: &Utilities<M::State>,
) -> Policy<M::State, M::Action> {
    mdp.states()
        .into_iter()
        .map(|s| (s, greedy_action(mdp, s, utilities)))
        .collect()
}

pub(crate) fn greedy_action<M: Mdp>(
    mdp: &M,
    state: M::State,
    utilities: &Utilities<M::State>,
) -> Option<M::Action> {
    if mdp.is_terminal(state) {
        return None;
    }

    let mut best: Option<M::Action> = None;
    let mut best_q = f64::NEG_INFINITY;
    for action in mdp.actions(state) {
        let q = expected_utility(mdp, state, action, utilities);
        if q > best_q {
            best_q = q;
            best = Some(action);
        }
    }

    best
}

/// Bellman-residual stopping bound: once the largest per-sweep utility
/// change drops below this, the estimate is within a bounded error of the
/// fixed point.
pub(crate) fn residual_bound(epsilon: f64, discount: f64) -> f64 {
    epsilon * (1. - discount) / discount
}

/// Degenerate discounts break the convergence math; reject them before any
/// computation starts.
pub(crate) fn check_discount(discount: f64) -> Result<(), SolverError> {
    if discount > 0. && discount < 1. {
        Ok(())
    } else {
        Err(SolverError::InvalidDiscount(discount))
    }
}

/// Fresh all-zeros utility table over the model's states.
pub(crate) fn zero_utilities<M: Mdp>(mdp: &M) -> Utilities<M::State> {
    mdp.states().into_iter().map(|s| (s, 0.)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::grid_world::{GridAction, GridPos, GridWorld};
    use float_eq::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.)]
    #[case(1.)]
    #[case(-0.5)]
    #[case(1.5)]
    fn check_discount_rejects_degenerate_values(#[case] discount: f64) {
        assert_eq!(
            check_discount(discount),
            Err(SolverError::InvalidDiscount(discount))
        );
    }

    #[rstest]
    #[case(0.9)]
    #[case(0.5)]
    #[case(1e-6)]
    fn check_discount_accepts_open_interval(#[case] discount: f64) {
        assert_eq!(check_discount(discount), Ok(()));
    }

    #[test]
    fn residual_bound_matches_formula() {
        assert_float_eq!(residual_bound(1e-4, 0.9), 1e-4 * (1. - 0.9) / 0.9, ulps <= 2);
    }

    #[test]
    fn expected_utility_weighs_successors() {
        let gw = GridWorld::new();
        let mut utilities = zero_utilities(&gw);
        utilities.insert(GridPos { row: 0, col: 1 }, 1.);

        // From (0,0), East reaches (0,1) with 0.8; the slips resolve to
        // staying put and to (1,0), both worth 0 here.
        let q = expected_utility(&gw, GridPos { row: 0, col: 0 }, GridAction::East, &utilities);
        assert_float_eq!(q, 0.8, abs <= 1e-12);
    }

    #[test]
    fn greedy_action_breaks_ties_by_enumeration_order() {
        let gw = GridWorld::new();
        // All-zero utilities make every action's expected value equal, so
        // the first enumerated action must win.
        let utilities = zero_utilities(&gw);
        let a = greedy_action(&gw, GridPos { row: 2, col: 0 }, &utilities);
        assert_eq!(a, Some(GridAction::North));
    }

    #[test]
    fn greedy_action_is_none_for_terminals() {
        let gw = GridWorld::new();
        let utilities = zero_utilities(&gw);
        assert_eq!(greedy_action(&gw, gw.goal(), &utilities), None);
        assert_eq!(greedy_action(&gw, gw.trap(), &utilities), None);
    }
}
