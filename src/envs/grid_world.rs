use crate::mdps::{Mdp, Transition, Utility};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Chance of moving in the intended direction.
pub const MOVE_PROB: f64 = 0.8;
/// Chance of slipping 90 degrees to either side of the intended direction.
pub const SLIP_PROB: f64 = 0.1;

/// Cell coordinate, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GridAction {
    North,
    South,
    East,
    West,
}

impl GridAction {
    /// Fixed enumeration order; greedy tie-breaks resolve to the earliest
    /// entry here.
    pub const ALL: [GridAction; 4] = [
        GridAction::North,
        GridAction::South,
        GridAction::East,
        GridAction::West,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            GridAction::North => (-1, 0),
            GridAction::South => (1, 0),
            GridAction::East => (0, 1),
            GridAction::West => (0, -1),
        }
    }

    fn slip_left(self) -> Self {
        match self {
            GridAction::North => GridAction::West,
            GridAction::South => GridAction::East,
            GridAction::East => GridAction::North,
            GridAction::West => GridAction::South,
        }
    }

    fn slip_right(self) -> Self {
        match self {
            GridAction::North => GridAction::East,
            GridAction::South => GridAction::West,
            GridAction::East => GridAction::South,
            GridAction::West => GridAction::North,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            GridAction::North => '^',
            GridAction::South => 'v',
            GridAction::East => '>',
            GridAction::West => '<',
        }
    }
}

/// The classic Russell-Norvig 4x3 gridworld.
///
/// Layout (row, col):
///
/// ```text
/// (0,0) (0,1) (0,2) (0,3) [GOAL, +1]
/// (1,0) [WALL] (1,2) (1,3) [TRAP, -1]
/// (2,0) [START] (2,1) (2,2) (2,3)
/// ```
///
/// Moves succeed with probability 0.8 and slip 90 degrees left or right with
/// probability 0.1 each; a move off the grid or into the wall leaves the
/// agent where it is. Non-terminal squares cost the living penalty (-0.04)
/// per step.
pub struct GridWorld {
    height: i32,
    width: i32,
    start: GridPos,
    goal: GridPos,
    trap: GridPos,
    walls: HashSet<GridPos>,
    terminals: HashSet<GridPos>,
    rewards: HashMap<GridPos, Utility>,
    living_penalty: Utility,
    states: Vec<GridPos>,
}

impl GridWorld {
    pub fn new() -> Self {
        let height = 3;
        let width = 4;
        let goal = GridPos { row: 0, col: 3 };
        let trap = GridPos { row: 1, col: 3 };
        let walls = HashSet::from([GridPos { row: 1, col: 1 }]);

        let states = (0..height)
            .flat_map(|row| (0..width).map(move |col| GridPos { row, col }))
            .filter(|p| !walls.contains(p))
            .collect();

        Self {
            height,
            width,
            start: GridPos { row: 2, col: 0 },
            goal,
            trap,
            terminals: HashSet::from([goal, trap]),
            rewards: HashMap::from([(goal, 1.), (trap, -1.)]),
            walls,
            living_penalty: -0.04,
            states,
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    pub fn trap(&self) -> GridPos {
        self.trap
    }

    pub fn is_wall(&self, pos: GridPos) -> bool {
        self.walls.contains(&pos)
    }

    /// Resolves one candidate move against the grid: leaving the bounds or
    /// entering the wall keeps the agent in place.
    fn resolve_move(&self, from: GridPos, action: GridAction) -> GridPos {
        let (dr, dc) = action.delta();
        let to = GridPos {
            row: from.row + dr,
            col: from.col + dc,
        };

        let in_bounds = (0..self.height).contains(&to.row) && (0..self.width).contains(&to.col);
        if in_bounds && !self.walls.contains(&to) {
            to
        } else {
            from
        }
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Mdp for GridWorld {
    type State = GridPos;
    type Action = GridAction;

    /// Row-major over the non-wall cells.
    fn states(&self) -> Vec<GridPos> {
        self.states.clone()
    }

    fn actions(&self, state: GridPos) -> Vec<GridAction> {
        assert!(
            self.states.contains(&state),
            "{state:?} is not a state of this gridworld"
        );

        if self.is_terminal(state) {
            vec![]
        } else {
            GridAction::ALL.to_vec()
        }
    }

    fn reward(&self, state: GridPos) -> Utility {
        self.rewards
            .get(&state)
            .copied()
            .unwrap_or(self.living_penalty)
    }

    fn is_terminal(&self, state: GridPos) -> bool {
        self.terminals.contains(&state)
    }

    fn transitions(&self, state: GridPos, action: GridAction) -> Vec<Transition<GridPos>> {
        assert!(
            self.states.contains(&state),
            "{state:?} is not a state of this gridworld"
        );

        if self.is_terminal(state) {
            return vec![];
        }

        let candidates = [
            (action, MOVE_PROB),
            (action.slip_left(), SLIP_PROB),
            (action.slip_right(), SLIP_PROB),
        ];

        // Outcomes landing on the same cell (slips and bounces collapsing
        // onto one square) are folded into a single entry.
        let mut transitions: Vec<Transition<GridPos>> = Vec::with_capacity(3);
        for (direction, probability) in candidates {
            let next_state = self.resolve_move(state, direction);
            match transitions.iter_mut().find(|t| t.next_state == next_state) {
                Some(t) => t.probability += probability,
                None => transitions.push(Transition {
                    next_state,
                    probability,
                }),
            }
        }

        transitions
    }
}
