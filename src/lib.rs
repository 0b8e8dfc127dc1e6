//! Evolves genomes of four-legged virtual walkers with a generational
//! genetic algorithm: roulette selection, uniform crossover, bounded
//! mutation and elitism, with JSON checkpoints of the full run state.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{Result, WalkerError};
pub use types::{GenerationStat, Hyperparameters, Individual};
