mod builder;
mod compiled;
mod error;
mod gridworld;
mod io;
mod simulator;
mod spec;

pub use builder::MdpBuilder;
pub use compiled::{ActionKey, CompiledMdp, StateKey};
pub use error::MdpError;
pub use gridworld::{GridCell, GridWorld, GridWorldConfig, GridWorldModel, Move, RewardCell};
pub use io::{compile_yaml, load_grid_yaml, load_yaml, save_yaml};
pub use simulator::MdpSimulator;
pub use spec::{MdpSpec, OutcomeSpec, StateSpec, TransitionSpec};
