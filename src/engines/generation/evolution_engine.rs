use crate::config::evolution::{validate_hyperparameters, EvolutionConfig};
use crate::config::OutputConfig;
use crate::data::{Checkpoint, FinalResults, GenomeStore};
use crate::engines::evaluation::{FitnessEvaluator, PlaceholderEvaluator};
use crate::engines::generation::{
    operators::{crossover, mutate, random_genome, roulette_selection},
    population::{evaluate_all, rank},
    progress::{LogProgressCallback, ProgressCallback},
};
use crate::error::{Result, WalkerError};
use crate::types::{GenerationStat, Hyperparameters, Individual};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Lifecycle of an [`EvolutionEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready { generation: usize },
    Terminated { generation: usize },
}

pub struct EvolutionEngine {
    params: Hyperparameters,
    rng: StdRng,
    evaluator: Box<dyn FitnessEvaluator>,
    population: Vec<Individual>,
    history: Vec<GenerationStat>,
    generation: usize,
    state: EngineState,
    output: OutputConfig,
    store: Option<Arc<dyn GenomeStore>>,
}

impl EvolutionEngine {
    pub fn new(config: &EvolutionConfig) -> Result<Self> {
        Self::with_parameters(config.hyperparameters(), config.seed)
    }

    pub fn with_parameters(params: Hyperparameters, seed: Option<u64>) -> Result<Self> {
        validate_hyperparameters(&params)?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            params,
            rng,
            evaluator: Box::new(PlaceholderEvaluator::default()),
            population: Vec::new(),
            history: Vec::new(),
            generation: 0,
            state: EngineState::Uninitialized,
            output: OutputConfig::default(),
            store: None,
        })
    }

    /// Rebuild a `Ready` engine from a checkpoint document.
    pub fn from_checkpoint(checkpoint: Checkpoint, seed: Option<u64>) -> Result<Self> {
        checkpoint.validate()?;
        let mut engine = Self::with_parameters(checkpoint.hyperparameters(), seed)?;

        engine.generation = checkpoint.generation;
        engine.population = checkpoint.population;
        engine.history = checkpoint.fitness_history;
        engine.state = EngineState::Ready {
            generation: engine.generation,
        };

        log::info!(
            "Resumed at generation {} with {} walkers",
            engine.generation,
            engine.population.len()
        );
        Ok(engine)
    }

    pub fn with_evaluator<E: FitnessEvaluator + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Publish every checkpoint and the final results to `store` as well.
    pub fn with_store(mut self, store: Arc<dyn GenomeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fill the population with factory walkers and reset to generation 0.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.history.clear();
        self.population = (0..self.params.population_size)
            .map(|i| {
                Individual::new(
                    format!("Walker_{}_{}", self.generation, i),
                    random_genome(&mut self.rng),
                )
            })
            .collect();
        self.state = EngineState::Ready { generation: 0 };

        log::debug!("Initialized {} walkers", self.population.len());
    }

    /// Evaluate, rank, record and breed one generation.
    pub fn advance_generation(&mut self) -> Result<GenerationStat> {
        match self.state {
            EngineState::Ready { .. } => {}
            EngineState::Uninitialized => {
                return Err(WalkerError::InvalidState(
                    "advance_generation called before initialize".to_string(),
                ))
            }
            EngineState::Terminated { generation } => {
                return Err(WalkerError::InvalidState(format!(
                    "run already terminated at generation {}",
                    generation
                )))
            }
        }

        evaluate_all(&mut self.population, self.evaluator.as_ref(), &mut self.rng);
        rank(&mut self.population);

        let stat = GenerationStat::from_ranked(self.generation, &self.population);
        self.history.push(stat.clone());

        let next = self
            .breed()
            .map_err(|e| e.during(self.generation, "breeding"))?;

        self.population = next;
        self.generation += 1;
        self.state = EngineState::Ready {
            generation: self.generation,
        };

        Ok(stat)
    }

    /// Build the next population from the ranked current one.
    fn breed(&mut self) -> Result<Vec<Individual>> {
        let size = self.params.population_size;
        let mut next_generation = Vec::with_capacity(size);

        // Elitism: copy top performers, score preserved
        for champion in self.population.iter().take(self.params.num_champions.min(size)) {
            next_generation.push(Individual {
                name: elite_name(&champion.name, self.generation + 1),
                genome: champion.genome.clone(),
                score: champion.score,
            });
        }

        // Generate offspring
        while next_generation.len() < size {
            let parent1 = roulette_selection(&self.population, &mut self.rng)?;
            let parent2 = roulette_selection(&self.population, &mut self.rng)?;

            let name = format!("Child_{}_{}", self.generation, next_generation.len());
            let mut child = crossover(parent1, parent2, name, &mut self.rng);
            mutate(
                &mut child.genome,
                self.params.mutation_rate,
                self.params.mutation_magnitude,
                &mut self.rng,
            );

            next_generation.push(child);
        }

        log::debug!(
            "Bred generation {}: {} elites, {} children",
            self.generation + 1,
            self.params.num_champions.min(size),
            size - self.params.num_champions.min(size)
        );

        Ok(next_generation)
    }

    /// Run `num_generations` generations, logging progress.
    pub fn run(&mut self, num_generations: usize, checkpoint_interval: usize) -> Result<FinalResults> {
        let callback = LogProgressCallback::new(num_generations);
        self.run_with_callback(num_generations, checkpoint_interval, callback)
    }

    /// Run the evolution process
    ///
    /// Writes a checkpoint whenever the generation counter reaches a multiple
    /// of `checkpoint_interval` (never when it is 0), so resumed runs keep the
    /// same cadence, and the final results once the loop finishes.
    /// Any failure aborts the run and names the generation it happened in.
    pub fn run_with_callback<C: ProgressCallback>(
        &mut self,
        num_generations: usize,
        checkpoint_interval: usize,
        mut callback: C,
    ) -> Result<FinalResults> {
        if self.state == EngineState::Uninitialized {
            self.initialize();
        }

        let started = std::time::Instant::now();
        log::info!(
            "Starting {} generations from generation {} (population {})",
            num_generations,
            self.generation,
            self.params.population_size
        );

        for _ in 0..num_generations {
            callback.on_generation_start(self.generation);

            let stat = self.advance_generation()?;
            callback.on_generation_complete(&stat);

            if checkpoint_interval > 0 && self.generation % checkpoint_interval == 0 {
                let path = Checkpoint::path_in(&self.output.checkpoint_dir, self.generation);
                let checkpoint = self.checkpoint();
                checkpoint
                    .save(&path)
                    .map_err(|e| e.during(self.generation, "checkpoint write"))?;
                self.publish_checkpoint(&checkpoint)?;
                callback.on_checkpoint_saved(self.generation, &path);
            }
        }

        let results = self.final_results();
        results
            .save(&self.output.results_file)
            .map_err(|e| e.during(self.generation, "results write"))?;
        self.publish_results(&results)?;

        self.state = EngineState::Terminated {
            generation: self.generation,
        };
        log::info!(
            "Run finished at generation {} in {:.2}s, results saved to {}",
            self.generation,
            started.elapsed().as_secs_f64(),
            self.output.results_file.display()
        );

        Ok(results)
    }

    fn publish_checkpoint(&self, checkpoint: &Checkpoint) -> Result<()> {
        if let Some(store) = &self.store {
            let document = serde_json::to_value(checkpoint)
                .map_err(|e| WalkerError::from(e).during(self.generation, "checkpoint publish"))?;
            let id = store
                .create_population(document)
                .map_err(|e| e.during(self.generation, "checkpoint publish"))?;
            log::debug!("Published checkpoint as {}", id);
        }
        Ok(())
    }

    fn publish_results(&self, results: &FinalResults) -> Result<()> {
        if let Some(store) = &self.store {
            let document = serde_json::to_value(results)
                .map_err(|e| WalkerError::from(e).during(self.generation, "results publish"))?;
            let id = store
                .create_result(document)
                .map_err(|e| e.during(self.generation, "results publish"))?;
            log::debug!("Published results as {}", id);
        }
        Ok(())
    }

    /// Snapshot the full simulation state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            generation: self.generation,
            population_size: self.params.population_size,
            mutation_rate: self.params.mutation_rate,
            mutation_magnitude: self.params.mutation_magnitude,
            num_champions: self.params.num_champions,
            population: self.population.clone(),
            fitness_history: self.history.clone(),
        }
    }

    pub fn final_results(&self) -> FinalResults {
        FinalResults {
            final_generation: self.generation,
            total_generations: self.history.len(),
            best_individual: self.best_individual().cloned(),
            fitness_history: self.history.clone(),
            parameters: self.params,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Highest-scoring walker currently held. After breeding this is the
    /// leading elite copy; freshly bred children score 0 until evaluated.
    pub fn best_individual(&self) -> Option<&Individual> {
        self.population.iter().fold(None, |best: Option<&Individual>, w| match best {
            Some(b) if b.score >= w.score => Some(b),
            _ => Some(w),
        })
    }

    /// Up to `count` walkers, best first.
    pub fn top_individuals(&self, count: usize) -> Vec<&Individual> {
        let mut ranked: Vec<&Individual> = self.population.iter().collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(count);
        ranked
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn history(&self) -> &[GenerationStat] {
        &self.history
    }

    pub fn parameters(&self) -> &Hyperparameters {
        &self.params
    }
}

/// `{root}@g{generation}`, where `root` drops a trailing `@g<digits>` tag.
fn elite_name(name: &str, generation: usize) -> String {
    let root = match name.rsplit_once("@g") {
        Some((root, tag)) if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_digit()) => root,
        _ => name,
    };
    format!("{}@g{}", root, generation)
}
