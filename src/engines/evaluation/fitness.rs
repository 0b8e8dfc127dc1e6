use crate::engines::generation::genome::{Genome, LEG_COUNT};
use rand::{Rng, RngCore};

/// Scores a genome. Higher is better.
///
/// The engine floors every returned score at zero, so implementations do not
/// need to. Any `Fn(&Genome) -> f64` closure is an evaluator; evaluators that
/// need noise draw it from the engine's random source so seeded runs stay
/// reproducible.
pub trait FitnessEvaluator {
    fn evaluate(&self, genome: &Genome, rng: &mut dyn RngCore) -> f64;
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&Genome) -> f64,
{
    fn evaluate(&self, genome: &Genome, _rng: &mut dyn RngCore) -> f64 {
        self(genome)
    }
}

/// Gene-magnitude heuristic standing in for a physics simulation
///
/// `10·mean|amplitude| + 5·mean(frequency) + 10·(width + height) + 15·leg_length`
/// plus uniform jitter in `[-jitter, jitter)`, floored at zero.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderEvaluator {
    pub jitter: f64,
}

impl Default for PlaceholderEvaluator {
    fn default() -> Self {
        Self { jitter: 5.0 }
    }
}

impl PlaceholderEvaluator {
    /// Deterministic part of the score for a given jitter draw.
    pub fn score_with_noise(genome: &Genome, noise: f64) -> f64 {
        let legs = LEG_COUNT as f64;
        let avg_amplitude = genome.motor_amplitudes.iter().map(|a| a.abs()).sum::<f64>() / legs;
        let avg_frequency = genome.motor_frequencies.iter().sum::<f64>() / legs;

        let score = avg_amplitude * 10.0
            + avg_frequency * 5.0
            + (genome.body_width + genome.body_height) * 10.0
            + genome.leg_segment_length * 15.0
            + noise;

        score.max(0.0)
    }
}

impl FitnessEvaluator for PlaceholderEvaluator {
    fn evaluate(&self, genome: &Genome, rng: &mut dyn RngCore) -> f64 {
        let noise = if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..self.jitter)
        } else {
            0.0
        };
        Self::score_with_noise(genome, noise)
    }
}
