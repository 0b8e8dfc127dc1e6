use super::traits::ConfigSection;
use crate::error::WalkerError;
use crate::types::Hyperparameters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub mutation_magnitude: f64,
    pub num_champions: usize,
    pub num_generations: usize,
    /// Generations between checkpoints; 0 disables them.
    pub checkpoint_interval: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 0.1,
            mutation_magnitude: 0.2,
            num_champions: 2,
            num_generations: 50,
            checkpoint_interval: 10,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            population_size: self.population_size,
            mutation_rate: self.mutation_rate,
            mutation_magnitude: self.mutation_magnitude,
            num_champions: self.num_champions,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), WalkerError> {
        validate_hyperparameters(&self.hyperparameters())
    }
}

/// Shared by configuration files and resumed checkpoints.
pub fn validate_hyperparameters(params: &Hyperparameters) -> Result<(), WalkerError> {
    if params.population_size < 1 {
        return Err(WalkerError::Configuration(
            "Population size must be at least 1".to_string()
        ));
    }
    if !(0.0..=1.0).contains(&params.mutation_rate) {
        return Err(WalkerError::Configuration(
            "Mutation rate must be between 0 and 1".to_string()
        ));
    }
    if !params.mutation_magnitude.is_finite() || params.mutation_magnitude < 0.0 {
        return Err(WalkerError::Configuration(
            "Mutation magnitude must be a finite, non-negative number".to_string()
        ));
    }
    Ok(())
}
