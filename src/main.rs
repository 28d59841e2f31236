use anyhow::Result;
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use mdp_gridworld::envs::grid_world::GridWorld;
use mdp_gridworld::{policy_iteration, ui, value_iteration};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

/// Solve the reference 4x3 gridworld MDP with a dynamic-programming solver
/// and print the resulting utility and policy grids.
#[derive(Parser)]
#[command(name = "mdp-gridworld")]
struct Cli {
    /// Solver algorithm to run.
    #[arg(short, long, value_enum, default_value = "value-iteration")]
    algorithm: Algorithm,

    /// Geometric discount factor, strictly within (0, 1).
    #[arg(long, default_value_t = 0.9)]
    discount: f64,

    /// Safety cap on sweeps / solver rounds.
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Convergence tolerance for the Bellman-residual bound.
    #[arg(long, default_value_t = 1e-4)]
    epsilon: f64,

    /// Seed for policy iteration's random initial policy.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit the solution as JSON instead of the console grids.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    ValueIteration,
    PolicyIteration,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let gw = GridWorld::new();

    tracing::info!(
        algorithm = ?cli.algorithm,
        discount = cli.discount,
        max_iterations = cli.max_iterations,
        epsilon = cli.epsilon,
        "solving the 4x3 gridworld"
    );

    let solution = match cli.algorithm {
        Algorithm::ValueIteration => {
            value_iteration(&gw, cli.discount, cli.max_iterations, cli.epsilon)?
        }
        Algorithm::PolicyIteration => {
            let mut rng = StdRng::seed_from_u64(cli.seed);
            policy_iteration(&gw, cli.discount, cli.max_iterations, cli.epsilon, &mut rng)?
        }
    };

    tracing::info!(
        converged = solution.converged,
        iterations = solution.iterations,
        "solver finished"
    );

    if cli.json {
        let states = solution
            .policy
            .keys()
            .copied()
            .sorted()
            .map(|s| {
                json!({
                    "row": s.row,
                    "col": s.col,
                    "action": solution.policy[&s],
                    "utility": solution.utilities[&s],
                })
            })
            .collect_vec();
        let out = json!({
            "converged": solution.converged,
            "iterations": solution.iterations,
            "states": states,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Optimal Utilities:");
        println!("{}", ui::utility_grid(&gw, &solution.utilities));
        println!();
        println!("Optimal Policy:");
        println!("{}", ui::policy_grid(&gw, &solution.policy));
    }

    Ok(())
}
