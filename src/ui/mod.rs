//! Console rendering of solver output. Presentation glue only: reads the
//! returned policy and utility tables, never mutates them.

use crate::envs::grid_world::{GridAction, GridPos, GridWorld};
use crate::mdps::{Policy, Utilities};
use itertools::Itertools;

/// Policy as a grid of action symbols: `^ v > <` for moves, `#` wall,
/// `G` goal, `T` trap, `.` for a missing or absent action.
pub fn policy_grid(gw: &GridWorld, policy: &Policy<GridPos, GridAction>) -> String {
    (0..gw.height())
        .map(|row| {
            (0..gw.width())
                .map(|col| {
                    let pos = GridPos { row, col };
                    if gw.is_wall(pos) {
                        '#'
                    } else if pos == gw.goal() {
                        'G'
                    } else if pos == gw.trap() {
                        'T'
                    } else {
                        match policy.get(&pos) {
                            Some(Some(a)) => a.symbol(),
                            _ => '.',
                        }
                    }
                })
                .join("  ")
        })
        .join("\n")
}

/// Utilities as a fixed-width grid, `#` for the wall cell. Missing entries
/// render as 0.00 (should not occur for states the model enumerates).
pub fn utility_grid(gw: &GridWorld, utilities: &Utilities<GridPos>) -> String {
    (0..gw.height())
        .map(|row| {
            (0..gw.width())
                .map(|col| {
                    let pos = GridPos { row, col };
                    if gw.is_wall(pos) {
                        format!("{:>6}", '#')
                    } else {
                        format!("{:6.2}", utilities.get(&pos).copied().unwrap_or(0.))
                    }
                })
                .join(" ")
        })
        .join("\n")
}
