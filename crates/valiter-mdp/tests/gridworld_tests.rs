use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use valiter_core::{MdpModel, SolverConfig, ValueIteration};
use valiter_mdp::{GridWorld, GridWorldConfig, GridWorldModel, MdpError, Move};

fn solver(gamma: f64, max_iterations: usize) -> ValueIteration {
    ValueIteration::new(SolverConfig::new(gamma, max_iterations)).expect("valid config")
}

#[test]
fn two_by_two_grid_heads_for_the_goal() {
    let grid = GridWorld::rectangle(2, 2).expect("grid should build");
    let rewards = HashMap::from([((1, 1), 10.0)]);
    let model = GridWorldModel::new(grid, rewards, 1.0, 1.0).expect("model should build");

    let solution = model.solve(&solver(0.9, 100)).expect("solve should succeed");

    // Down and Right tie from the corner; Down comes first.
    assert_eq!(solution.action(&(0, 0)), Some(&Move::Down));
    assert_eq!(solution.action(&(0, 1)), Some(&Move::Down));
    assert_eq!(solution.action(&(1, 0)), Some(&Move::Right));
    assert!(solution.value(&(1, 1)).unwrap() >= solution.value(&(0, 0)).unwrap());
    assert!(solution.value(&(0, 1)).unwrap() > solution.value(&(0, 0)).unwrap());

    // V(1,1) = 0.9 V(0,1), V(0,1) = 10 + 0.9 V(1,1)  =>  V(1,1) = 9 / 0.19
    assert_abs_diff_eq!(solution.value(&(1, 1)).unwrap(), 9.0 / 0.19, epsilon = 1e-2);
}

#[test]
fn moves_off_the_grid_stay_in_place() {
    let grid = GridWorld::rectangle(2, 3).expect("grid should build");

    assert_eq!(grid.next_position((0, 0), Move::Up), (0, 0));
    assert_eq!(grid.next_position((0, 0), Move::Left), (0, 0));
    assert_eq!(grid.next_position((0, 0), Move::Right), (0, 1));
    assert_eq!(grid.next_position((1, 2), Move::Down), (1, 2));
    assert_eq!(grid.next_position((1, 2), Move::Up), (0, 2));
}

#[test]
fn holes_in_the_grid_block_moves() {
    let grid = GridWorld::new([(0, 0), (0, 2), (1, 0), (1, 1), (1, 2), (0, 0)])
        .expect("grid should build");

    assert_eq!(grid.cells().len(), 5);
    assert!(!grid.contains((0, 1)));
    assert_eq!(grid.next_position((0, 0), Move::Right), (0, 0));
    assert_eq!(grid.next_position((1, 1), Move::Up), (1, 1));
}

#[test]
fn slippery_transitions_form_distributions() {
    let grid = GridWorld::new([(0, 0), (0, 2), (1, 0), (1, 1), (1, 2), (2, 1)])
        .expect("grid should build");
    let model = GridWorldModel::new(grid.clone(), HashMap::new(), 1.0, 0.7)
        .expect("model should build");

    for state in grid.cells() {
        for action in Move::ALL {
            let total: f64 = grid
                .cells()
                .iter()
                .map(|next| model.probability(next, state, &action))
                .sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    // From (1,1), Right is intended; the other three directions each get 0.1.
    assert_abs_diff_eq!(model.probability(&(1, 2), &(1, 1), &Move::Right), 0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(model.probability(&(1, 0), &(1, 1), &Move::Right), 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(model.probability(&(2, 1), &(1, 1), &Move::Right), 0.1, epsilon = 1e-12);
    // Up from (1,1) is blocked by the hole, so it slips back into place.
    assert_abs_diff_eq!(model.probability(&(1, 1), &(1, 1), &Move::Right), 0.1, epsilon = 1e-12);
    assert_eq!(model.probability(&(0, 0), &(1, 1), &Move::Right), 0.0);
}

#[test]
fn rewards_charge_boundary_and_pay_on_entry() {
    let grid = GridWorld::rectangle(2, 2).expect("grid should build");
    let rewards = HashMap::from([((0, 1), 5.0)]);
    let model = GridWorldModel::new(grid, rewards, 2.5, 0.8).expect("model should build");

    assert_eq!(model.reward(&(0, 0), &Move::Up), -2.5);
    assert_eq!(model.reward(&(0, 0), &Move::Right), 5.0);
    assert_eq!(model.reward(&(0, 0), &Move::Down), 0.0);
}

#[test]
fn invalid_generator_parameters_are_rejected() {
    let grid = GridWorld::rectangle(1, 1).expect("grid should build");

    let err = GridWorldModel::new(grid.clone(), HashMap::new(), 1.0, 1.2)
        .expect_err("probability above 1 should fail");
    assert!(matches!(err, MdpError::InvalidMoveProbability { .. }));

    let err = GridWorldModel::new(grid.clone(), HashMap::new(), f64::NAN, 0.5)
        .expect_err("NaN penalty should fail");
    assert!(matches!(err, MdpError::InvalidBoundaryPenalty { .. }));

    let err = GridWorldModel::new(grid, HashMap::from([((0, 0), f64::INFINITY)]), 1.0, 0.5)
        .expect_err("infinite reward should fail");
    assert!(matches!(err, MdpError::InvalidCellReward { row: 0, col: 0, .. }));

    let err = GridWorld::rectangle(0, 4).expect_err("empty grid should fail");
    assert!(matches!(err, MdpError::EmptyGrid));
}

#[test]
fn config_yaml_builds_a_solvable_world() {
    let yaml = r#"
rows: 3
cols: 4
boundary_penalty: 1.0
intended_move_prob: 0.8
rewards:
  - row: 0
    col: 3
    reward: 10.0
"#;

    let config = GridWorldConfig::from_yaml_str(yaml).expect("config should parse");
    let model = config.build().expect("model should build");
    let solution = model
        .solve(&ValueIteration::new(SolverConfig::new(0.9, 500).with_theta(1e-9)).unwrap())
        .expect("solve should succeed");

    assert_eq!(solution.len(), 12);
    assert_eq!(solution.action(&(0, 2)), Some(&Move::Right));
    assert!(solution.metrics().converged);
}

#[test]
fn config_defaults_fill_missing_fields() {
    let config = GridWorldConfig::from_yaml_str("rows: 2\ncols: 2\n").expect("config should parse");
    assert_eq!(config.intended_move_prob, GridWorldConfig::default().intended_move_prob);

    let err = GridWorldConfig::from_yaml_str("intended_move_prob: -0.5\n")
        .expect_err("negative probability should fail");
    assert!(matches!(err, MdpError::InvalidMoveProbability { .. }));
}

#[test]
fn blocked_moves_pool_their_mass_in_a_corner() {
    let grid = GridWorld::rectangle(2, 2).expect("grid should build");
    let model = GridWorldModel::new(grid, HashMap::new(), 1.0, 0.7).expect("model should build");

    // From (0,0), Up and Left both bump the boundary and stay in place.
    assert_abs_diff_eq!(model.probability(&(0, 0), &(0, 0), &Move::Right), 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(model.probability(&(0, 1), &(0, 0), &Move::Right), 0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(model.probability(&(1, 0), &(0, 0), &Move::Right), 0.1, epsilon = 1e-12);

    // Intending a blocked move adds the intended mass to the stay-in-place cell.
    assert_abs_diff_eq!(model.probability(&(0, 0), &(0, 0), &Move::Up), 0.8, epsilon = 1e-12);
}
