use crate::engines::generation::genome::{
    wrap_phase, GeneRange, Genome, BODY_HEIGHT, BODY_WIDTH, LEG_COUNT, LEG_SEGMENT_LENGTH,
    LEG_SEGMENT_THICKNESS, MOTOR_AMPLITUDE, MOTOR_FREQUENCY, MOTOR_PHASE,
};
use crate::error::{Result, WalkerError};
use crate::types::Individual;
use rand::Rng;

/// Lowest roulette weight any individual can have
pub const MIN_SELECTION_WEIGHT: f64 = 0.1;

/// Generate random genome, every gene uniform in its generation range
pub fn random_genome<R: Rng + ?Sized>(rng: &mut R) -> Genome {
    Genome {
        body_width: sample(&BODY_WIDTH.generate, rng),
        body_height: sample(&BODY_HEIGHT.generate, rng),
        leg_segment_length: sample(&LEG_SEGMENT_LENGTH.generate, rng),
        leg_segment_thickness: sample(&LEG_SEGMENT_THICKNESS.generate, rng),
        motor_amplitudes: std::array::from_fn(|_| sample(&MOTOR_AMPLITUDE.generate, rng)),
        motor_frequencies: std::array::from_fn(|_| sample(&MOTOR_FREQUENCY.generate, rng)),
        motor_phases: std::array::from_fn(|_| sample(&MOTOR_PHASE.generate, rng)),
    }
}

fn sample<R: Rng + ?Sized>(range: &GeneRange, rng: &mut R) -> f64 {
    rng.gen_range(range.min..range.max)
}

/// Roulette wheel selection: probability proportional to `max(0.1, score)`
///
/// Falls back to the first individual if rounding leaves the cumulative
/// weight just short of the target. Weights whose sum overflows `f64` are
/// rescaled by the largest weight, which keeps the proportions.
pub fn roulette_selection<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    rng: &mut R,
) -> Result<&'a Individual> {
    let first = population.first().ok_or(WalkerError::EmptyPopulation)?;

    let mut divisor = 1.0;
    let mut total_weight: f64 = population.iter().map(selection_weight).sum();
    if !total_weight.is_finite() {
        divisor = population
            .iter()
            .map(selection_weight)
            .fold(MIN_SELECTION_WEIGHT, f64::max);
        total_weight = population.iter().map(|w| selection_weight(w) / divisor).sum();
    }
    let target = rng.gen_range(0.0..total_weight);

    let mut cumulative = 0.0;
    for individual in population {
        cumulative += selection_weight(individual) / divisor;
        if cumulative >= target {
            return Ok(individual);
        }
    }

    Ok(first)
}

fn selection_weight(individual: &Individual) -> f64 {
    individual.score.max(MIN_SELECTION_WEIGHT)
}

/// Uniform crossover: every gene is copied from one parent on a coin flip
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Individual,
    parent2: &Individual,
    name: impl Into<String>,
    rng: &mut R,
) -> Individual {
    let a = &parent1.genome;
    let b = &parent2.genome;

    let genome = Genome {
        body_width: pick(a.body_width, b.body_width, rng),
        body_height: pick(a.body_height, b.body_height, rng),
        leg_segment_length: pick(a.leg_segment_length, b.leg_segment_length, rng),
        leg_segment_thickness: pick(a.leg_segment_thickness, b.leg_segment_thickness, rng),
        motor_amplitudes: pick_legs(&a.motor_amplitudes, &b.motor_amplitudes, rng),
        motor_frequencies: pick_legs(&a.motor_frequencies, &b.motor_frequencies, rng),
        motor_phases: pick_legs(&a.motor_phases, &b.motor_phases, rng),
    };

    Individual::new(name, genome)
}

fn pick<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

fn pick_legs<R: Rng + ?Sized>(
    a: &[f64; LEG_COUNT],
    b: &[f64; LEG_COUNT],
    rng: &mut R,
) -> [f64; LEG_COUNT] {
    std::array::from_fn(|i| pick(a[i], b[i], rng))
}

/// Mutation: perturb genes by `U(-1, 1) * magnitude`, each with probability `mutation_rate`
///
/// Scalars, amplitudes and frequencies clamp to their legal range; phases wrap.
pub fn mutate<'g, R: Rng + ?Sized>(
    genome: &'g mut Genome,
    mutation_rate: f64,
    mutation_magnitude: f64,
    rng: &mut R,
) -> &'g mut Genome {
    for (gene, range) in [
        (&mut genome.body_width, BODY_WIDTH.legal),
        (&mut genome.body_height, BODY_HEIGHT.legal),
        (&mut genome.leg_segment_length, LEG_SEGMENT_LENGTH.legal),
        (&mut genome.leg_segment_thickness, LEG_SEGMENT_THICKNESS.legal),
    ] {
        if perturb(gene, mutation_rate, mutation_magnitude, rng) {
            *gene = range.clamp(*gene);
        }
    }

    for i in 0..LEG_COUNT {
        let amplitude = &mut genome.motor_amplitudes[i];
        if perturb(amplitude, mutation_rate, mutation_magnitude, rng) {
            *amplitude = MOTOR_AMPLITUDE.legal.clamp(*amplitude);
        }

        let frequency = &mut genome.motor_frequencies[i];
        if perturb(frequency, mutation_rate, mutation_magnitude, rng) {
            *frequency = MOTOR_FREQUENCY.legal.clamp(*frequency);
        }

        let phase = &mut genome.motor_phases[i];
        if perturb(phase, mutation_rate, mutation_magnitude, rng) {
            *phase = wrap_phase(*phase);
        }
    }

    genome
}

fn perturb<R: Rng + ?Sized>(value: &mut f64, rate: f64, magnitude: f64, rng: &mut R) -> bool {
    if rng.gen::<f64>() < rate {
        *value += rng.gen_range(-1.0..1.0) * magnitude;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn walker(name: &str, score: f64, rng: &mut StdRng) -> Individual {
        let mut w = Individual::random(name, rng);
        w.score = score;
        w
    }

    #[test]
    fn test_selection_with_overflowing_weight_sum() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut population = vec![walker("big", f64::MAX, &mut rng)];
        for i in 0..5 {
            population.push(walker(&format!("w{}", i), f64::MAX / 100.0, &mut rng));
        }

        let draws = 20_000;
        let mut dominant = 0;
        for _ in 0..draws {
            let picked = roulette_selection(&population, &mut rng).unwrap();
            assert!(population.iter().any(|w| std::ptr::eq(w, picked)));
            if picked.name == "big" {
                dominant += 1;
            }
        }

        let expected = 1.0 / 1.05;
        let observed = dominant as f64 / draws as f64;
        assert!((observed - expected).abs() < 0.01, "observed {}", observed);
    }

    #[test]
    fn test_selection_on_empty_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = roulette_selection(&[], &mut rng);
        assert!(matches!(result, Err(WalkerError::EmptyPopulation)));
    }

    #[test]
    fn test_selection_with_all_zero_scores() {
        let mut rng = StdRng::seed_from_u64(2);
        let population: Vec<Individual> = (0..5).map(|i| walker(&format!("w{}", i), 0.0, &mut rng)).collect();

        let mut seen = [0usize; 5];
        for _ in 0..5000 {
            let picked = roulette_selection(&population, &mut rng).unwrap();
            let idx = population.iter().position(|w| w.name == picked.name).unwrap();
            seen[idx] += 1;
        }

        // Equal floor weights: every walker remains selectable
        assert!(seen.iter().all(|&count| count > 800));
    }

    #[test]
    fn test_selection_ignores_negative_scores() {
        let mut rng = StdRng::seed_from_u64(4);
        let population = vec![walker("neg", -50.0, &mut rng), walker("pos", 0.1, &mut rng)];

        let picks = (0..4000)
            .filter(|_| roulette_selection(&population, &mut rng).unwrap().name == "neg")
            .count();
        let freq = picks as f64 / 4000.0;
        assert!((freq - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(5);
        let original = random_genome(&mut rng);
        let mut genome = original.clone();

        mutate(&mut genome, 0.0, 5.0, &mut rng);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_rate_one_touches_every_gene() {
        let mut rng = StdRng::seed_from_u64(6);
        let original = random_genome(&mut rng);
        let mut genome = original.clone();

        mutate(&mut genome, 1.0, 0.05, &mut rng);
        assert_ne!(genome.body_width, original.body_width);
        for i in 0..LEG_COUNT {
            assert_ne!(genome.motor_amplitudes[i], original.motor_amplitudes[i]);
            assert_ne!(genome.motor_phases[i], original.motor_phases[i]);
        }
    }

    #[test]
    fn test_crossover_child_is_fresh() {
        let mut rng = StdRng::seed_from_u64(7);
        let p1 = walker("p1", 40.0, &mut rng);
        let p2 = walker("p2", 20.0, &mut rng);

        let child = crossover(&p1, &p2, "Child_0_2", &mut rng);
        assert_eq!(child.name, "Child_0_2");
        assert_eq!(child.score, 0.0);
    }
}
