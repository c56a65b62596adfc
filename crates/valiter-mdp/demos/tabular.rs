use std::path::PathBuf;

use valiter_core::{SolverConfig, ValueIteration};
use valiter_mdp::{MdpSimulator, compile_yaml};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/valiter-mdp/demos/dice.mdp.yaml"));

    let compiled = compile_yaml(&path).expect("failed to compile MDP YAML");
    let solver = ValueIteration::new(SolverConfig::new(0.9, 1000).with_theta(1e-10))
        .expect("invalid solver config");
    let solution = compiled.solve(&solver).expect("value iteration failed");

    for (state, action, value) in solution.iter() {
        println!(
            "{:>8} -> {:<8} value={value:.6}",
            compiled.state_id(*state).unwrap_or("?"),
            compiled.action_id(*action).unwrap_or("?"),
        );
    }

    let Some(start) = compiled.state_keys().first().copied() else {
        return;
    };
    let mut simulator = MdpSimulator::new(compiled, 12345);
    let estimate = simulator.estimate_return(start, &solution, 256, 1000);
    println!("rollout_estimate={estimate:.6}");

    let json = solution.snapshot().to_json().expect("snapshot serialization failed");
    println!("{json}");
}
