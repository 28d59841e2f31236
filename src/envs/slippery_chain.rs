#[cfg(test)]
use crate::mdps::{Mdp, Transition, Utility};

/// Three-state chain for solver tests: advancing moves right with
/// probability 0.9 and slips back onto the same square with 0.1; staying is
/// deterministic. State 2 is terminal with reward +1, the rest pay the
/// living penalty. Small enough that fixed-policy utilities have a
/// closed-form solution.
#[cfg(test)]
pub struct SlipperyChain {
    living_penalty: Utility,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainAction {
    Advance,
    Stay,
}

#[cfg(test)]
impl SlipperyChain {
    pub fn new() -> Self {
        Self {
            living_penalty: -0.1,
        }
    }

    pub fn living_penalty(&self) -> Utility {
        self.living_penalty
    }
}

#[cfg(test)]
impl Mdp for SlipperyChain {
    type State = usize;
    type Action = ChainAction;

    fn states(&self) -> Vec<usize> {
        vec![0, 1, 2]
    }

    fn actions(&self, state: usize) -> Vec<ChainAction> {
        if self.is_terminal(state) {
            vec![]
        } else {
            vec![ChainAction::Advance, ChainAction::Stay]
        }
    }

    fn reward(&self, state: usize) -> Utility {
        if state == 2 {
            1.
        } else {
            self.living_penalty
        }
    }

    fn is_terminal(&self, state: usize) -> bool {
        state == 2
    }

    fn transitions(&self, state: usize, action: ChainAction) -> Vec<Transition<usize>> {
        if self.is_terminal(state) {
            return vec![];
        }

        match action {
            ChainAction::Advance => vec![
                Transition {
                    next_state: state + 1,
                    probability: 0.9,
                },
                Transition {
                    next_state: state,
                    probability: 0.1,
                },
            ],
            ChainAction::Stay => vec![Transition {
                next_state: state,
                probability: 1.,
            }],
        }
    }
}
