extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod envs;
pub mod mdps;
pub mod ui;

pub use mdps::solvers::policy_iteration::policy_iteration;
pub use mdps::solvers::value_iteration::value_iteration;
pub use mdps::{Mdp, Policy, Solution, SolverError, Transition, Utilities, Utility};
