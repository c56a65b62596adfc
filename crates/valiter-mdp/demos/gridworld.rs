use std::path::PathBuf;

use valiter_core::{SolverConfig, ValueIteration};
use valiter_mdp::{GridWorldConfig, Move, load_grid_yaml};

fn arrow(mv: Move) -> char {
    match mv {
        Move::Up => '^',
        Move::Down => 'v',
        Move::Left => '<',
        Move::Right => '>',
    }
}

fn main() {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_grid_yaml(&path).expect("failed to load grid YAML"),
        None => GridWorldConfig::default(),
    };

    let model = config.build().expect("invalid grid config");
    let solver = ValueIteration::new(SolverConfig::from_default_yaml().expect("default config"))
        .expect("invalid solver config");
    let solution = model.solve(&solver).expect("value iteration failed");

    for row in 0..config.rows as i64 {
        let line: String = (0..config.cols as i64)
            .filter_map(|col| solution.action(&(row, col)).copied())
            .map(arrow)
            .collect();
        let values: Vec<String> = (0..config.cols as i64)
            .filter_map(|col| solution.value(&(row, col)))
            .map(|v| format!("{v:8.3}"))
            .collect();
        println!("{line}   {}", values.join(" "));
    }

    let metrics = solution.metrics();
    println!(
        "sweeps={} final_delta={:e} converged={}",
        metrics.sweeps_completed, metrics.final_delta, metrics.converged
    );
}
