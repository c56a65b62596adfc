pub mod config;
pub mod error;
pub mod ids;
mod interner;
pub mod model;
pub mod snapshot;
pub mod solution;
mod sweep;
mod table;
pub mod value_iteration;

#[cfg(test)]
mod tests;
