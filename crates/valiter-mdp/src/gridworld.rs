use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};
use valiter_core::{MdpModel, Solution, ValueIteration};

use crate::MdpError;

/// Grid position as `(row, col)`. Rows grow downwards.
pub type GridCell = (i64, i64);

/// Directional move on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in tie-break order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` offset of the move.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }
}

/// Finite set of cells. Moves that would leave the set keep the agent in place.
#[derive(Debug, Clone)]
pub struct GridWorld {
    cells: Vec<GridCell>,
    members: HashSet<GridCell>,
}

impl GridWorld {
    /// Build a grid from arbitrary cells. Repeated cells are kept once, at
    /// their first position.
    pub fn new(cells: impl IntoIterator<Item = GridCell>) -> Result<Self, MdpError> {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();
        for cell in cells {
            if members.insert(cell) {
                ordered.push(cell);
            }
        }

        if ordered.is_empty() {
            return Err(MdpError::EmptyGrid);
        }

        Ok(GridWorld {
            cells: ordered,
            members,
        })
    }

    /// Full `rows x cols` rectangle in row-major order.
    pub fn rectangle(rows: usize, cols: usize) -> Result<Self, MdpError> {
        let (rows, cols) = (rows as i64, cols as i64);
        Self::new((0..rows).flat_map(|row| (0..cols).map(move |col| (row, col))))
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.members.contains(&cell)
    }

    /// Cell reached by attempting `mv` from `cell`.
    pub fn next_position(&self, cell: GridCell, mv: Move) -> GridCell {
        let (dr, dc) = mv.offset();
        let moved = (cell.0 + dr, cell.1 + dc);
        if self.contains(moved) { moved } else { cell }
    }
}

/// Reward granted for entering a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardCell {
    pub row: i64,
    pub col: i64,
    pub reward: f64,
}

/// YAML description of a rectangular grid world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridWorldConfig {
    pub rows: usize,
    pub cols: usize,
    /// Charged (as a negative reward) for bumping into the grid boundary.
    pub boundary_penalty: f64,
    /// Probability of moving in the chosen direction. The rest is split
    /// evenly over the other three directions.
    pub intended_move_prob: f64,
    pub rewards: Vec<RewardCell>,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        GridWorldConfig {
            rows: 3,
            cols: 4,
            boundary_penalty: 1.0,
            intended_move_prob: 0.8,
            rewards: vec![RewardCell {
                row: 0,
                col: 3,
                reward: 10.0,
            }],
        }
    }
}

impl GridWorldConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MdpError> {
        let config: GridWorldConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MdpError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MdpError::EmptyGrid);
        }
        check_move_probability(self.intended_move_prob)?;
        check_boundary_penalty(self.boundary_penalty)?;
        for cell in &self.rewards {
            check_cell_reward((cell.row, cell.col), cell.reward)?;
        }
        Ok(())
    }

    /// Build the grid-world model described by this config.
    pub fn build(&self) -> Result<GridWorldModel, MdpError> {
        self.validate()?;
        let grid = GridWorld::rectangle(self.rows, self.cols)?;
        let rewards = self
            .rewards
            .iter()
            .map(|cell| ((cell.row, cell.col), cell.reward))
            .collect();
        GridWorldModel::new(grid, rewards, self.boundary_penalty, self.intended_move_prob)
    }
}

/// Transition and reward functions of a grid world with slippery moves.
#[derive(Debug, Clone)]
pub struct GridWorldModel {
    grid: GridWorld,
    rewards: HashMap<GridCell, f64>,
    boundary_penalty: f64,
    intended_move_prob: f64,
}

impl GridWorldModel {
    /// `rewards` maps destination cells to the reward for entering them;
    /// unlisted cells pay 0.
    pub fn new(
        grid: GridWorld,
        rewards: HashMap<GridCell, f64>,
        boundary_penalty: f64,
        intended_move_prob: f64,
    ) -> Result<Self, MdpError> {
        check_move_probability(intended_move_prob)?;
        check_boundary_penalty(boundary_penalty)?;
        for (cell, reward) in &rewards {
            check_cell_reward(*cell, *reward)?;
        }

        Ok(GridWorldModel {
            grid,
            rewards,
            boundary_penalty,
            intended_move_prob,
        })
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    /// Solve over every cell with the moves in [`Move::ALL`] order.
    pub fn solve(&self, solver: &ValueIteration) -> Result<Solution<GridCell, Move>, MdpError> {
        debug!(
            "solving grid world with {} cells, intended move probability {}",
            self.grid.cells().len(),
            self.intended_move_prob
        );
        let solution = solver.solve(self.grid.cells(), &Move::ALL, self, None)?;
        Ok(solution)
    }
}

impl MdpModel<GridCell, Move> for GridWorldModel {
    /// Each move contributes its own mass (`intended_move_prob` for `action`,
    /// `(1 - intended_move_prob) / 3` for the others) to the cell it lands on.
    /// Moves that land on the same cell, such as two blocked moves that both
    /// stay in place, are summed rather than counted once, so every
    /// `(state, action)` row sums to 1.
    fn probability(&self, next: &GridCell, state: &GridCell, action: &Move) -> f64 {
        let slip = (1.0 - self.intended_move_prob) / 3.0;

        Move::ALL
            .iter()
            .filter(|mv| self.grid.next_position(*state, **mv) == *next)
            .map(|mv| {
                if mv == action {
                    self.intended_move_prob
                } else {
                    slip
                }
            })
            .sum()
    }

    fn reward(&self, state: &GridCell, action: &Move) -> f64 {
        let dest = self.grid.next_position(*state, *action);
        if dest == *state {
            return -self.boundary_penalty;
        }
        self.rewards.get(&dest).copied().unwrap_or(0.0)
    }
}

fn check_move_probability(value: f64) -> Result<(), MdpError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MdpError::InvalidMoveProbability { value });
    }
    Ok(())
}

fn check_boundary_penalty(value: f64) -> Result<(), MdpError> {
    if !value.is_finite() {
        return Err(MdpError::InvalidBoundaryPenalty { value });
    }
    Ok(())
}

fn check_cell_reward(cell: GridCell, value: f64) -> Result<(), MdpError> {
    if !value.is_finite() {
        return Err(MdpError::InvalidCellReward {
            row: cell.0,
            col: cell.1,
            value,
        });
    }
    Ok(())
}
