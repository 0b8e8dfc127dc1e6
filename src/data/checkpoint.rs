use crate::error::{Result, WalkerError};
use crate::types::{GenerationStat, Hyperparameters, Individual};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Full simulation state, written every `checkpoint_interval` generations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub generation: usize,
    pub population_size: usize,
    pub mutation_rate: f64,
    pub mutation_magnitude: f64,
    pub num_champions: usize,
    pub population: Vec<Individual>,
    pub fitness_history: Vec<GenerationStat>,
}

impl Checkpoint {
    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            population_size: self.population_size,
            mutation_rate: self.mutation_rate,
            mutation_magnitude: self.mutation_magnitude,
            num_champions: self.num_champions,
        }
    }

    /// Check that the document can seed a resumed run.
    pub fn validate(&self) -> Result<()> {
        if self.population.len() != self.population_size {
            return Err(WalkerError::InvalidState(format!(
                "checkpoint holds {} individuals but population_size is {}",
                self.population.len(),
                self.population_size
            )));
        }
        if self.fitness_history.len() != self.generation {
            log::warn!(
                "Checkpoint at generation {} carries {} history entries",
                self.generation,
                self.fitness_history.len()
            );
        }
        for individual in &self.population {
            individual.genome.validate().map_err(|e| {
                WalkerError::InvalidGenome(format!("{}: {}", individual.name, e))
            })?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(path.as_ref(), self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let checkpoint: Checkpoint = read_json(path.as_ref())?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// `checkpoint_gen_{generation}.json` inside `dir`
    pub fn path_in(dir: &Path, generation: usize) -> PathBuf {
        dir.join(format!("checkpoint_gen_{}.json", generation))
    }
}

/// Summary written once a run completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResults {
    pub final_generation: usize,
    pub total_generations: usize,
    pub best_individual: Option<Individual>,
    pub fitness_history: Vec<GenerationStat>,
    pub parameters: Hyperparameters,
    /// RFC 3339 wall-clock time the summary was produced.
    pub timestamp: String,
}

impl FinalResults {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(path.as_ref(), self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json(path.as_ref())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
