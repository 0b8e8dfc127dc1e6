use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::random_genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A labelled genome plus the score it earned in the current generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub name: String,
    pub genome: Genome,
    #[serde(default)]
    pub score: f64,
}

impl Individual {
    pub fn new(name: impl Into<String>, genome: Genome) -> Self {
        Self {
            name: name.into(),
            genome,
            score: 0.0,
        }
    }

    /// Fresh walker with a factory genome and no score yet.
    pub fn random<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        Self::new(name, random_genome(rng))
    }
}

/// Hyperparameters shared by checkpoints, results and the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub mutation_magnitude: f64,
    pub num_champions: usize,
}

/// One entry of the fitness history, recorded after ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStat {
    pub generation: usize,
    pub best_score: f64,
    pub avg_score: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl GenerationStat {
    /// Summarise a population that has already been ranked best-first.
    pub fn from_ranked(generation: usize, population: &[Individual]) -> Self {
        let best_score = population.first().map(|w| w.score).unwrap_or(0.0);
        let count = population.len() as f64;
        let avg_score = if population.is_empty() {
            0.0
        } else {
            let total = population.iter().map(|w| w.score).sum::<f64>();
            if total.is_finite() {
                total / count
            } else {
                population.iter().map(|w| w.score / count).sum()
            }
        };

        Self {
            generation,
            best_score,
            avg_score,
            timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
        }
    }
}
