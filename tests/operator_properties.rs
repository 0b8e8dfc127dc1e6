use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::TAU;
use walker_evolve::engines::generation::genome::{
    GeneRange, BODY_HEIGHT, BODY_WIDTH, LEG_SEGMENT_LENGTH, LEG_SEGMENT_THICKNESS,
    MOTOR_AMPLITUDE, MOTOR_FREQUENCY,
};
use walker_evolve::engines::generation::operators::{
    crossover, mutate, random_genome, roulette_selection,
};
use walker_evolve::engines::generation::{Genome, LEG_COUNT};
use walker_evolve::Individual;

fn within(range: &GeneRange, value: f64) -> bool {
    range.contains(value)
}

fn assert_legal(genome: &Genome) {
    assert!(within(&BODY_WIDTH.legal, genome.body_width));
    assert!(within(&BODY_HEIGHT.legal, genome.body_height));
    assert!(within(&LEG_SEGMENT_LENGTH.legal, genome.leg_segment_length));
    assert!(within(&LEG_SEGMENT_THICKNESS.legal, genome.leg_segment_thickness));
    for i in 0..LEG_COUNT {
        assert!(within(&MOTOR_AMPLITUDE.legal, genome.motor_amplitudes[i]));
        assert!(within(&MOTOR_FREQUENCY.legal, genome.motor_frequencies[i]));
        assert!(genome.motor_phases[i] >= 0.0 && genome.motor_phases[i] < TAU);
    }
}

#[test]
fn test_factory_genes_within_generation_ranges() {
    let mut rng = StdRng::seed_from_u64(100);

    for _ in 0..500 {
        let genome = random_genome(&mut rng);
        assert!(within(&BODY_WIDTH.generate, genome.body_width));
        assert!(within(&BODY_HEIGHT.generate, genome.body_height));
        assert!(within(&LEG_SEGMENT_LENGTH.generate, genome.leg_segment_length));
        assert!(within(&LEG_SEGMENT_THICKNESS.generate, genome.leg_segment_thickness));
        for i in 0..LEG_COUNT {
            assert!(within(&MOTOR_AMPLITUDE.generate, genome.motor_amplitudes[i]));
            assert!(within(&MOTOR_FREQUENCY.generate, genome.motor_frequencies[i]));
            assert!(genome.motor_phases[i] >= 0.0 && genome.motor_phases[i] < TAU);
        }
    }
}

#[test]
fn test_mutation_respects_clamp_and_wrap() {
    let mut rng = StdRng::seed_from_u64(101);

    for magnitude in [0.2, 3.0, 50.0] {
        let mut genome = random_genome(&mut rng);
        for _ in 0..200 {
            mutate(&mut genome, 1.0, magnitude, &mut rng);
            assert_legal(&genome);
        }
    }
}

#[test]
fn test_heavy_mutation_reaches_clamp_bounds() {
    let mut rng = StdRng::seed_from_u64(102);
    let mut genome = random_genome(&mut rng);

    let mut hit_upper = false;
    let mut hit_lower = false;
    for _ in 0..200 {
        mutate(&mut genome, 1.0, 100.0, &mut rng);
        hit_upper |= genome.body_width == BODY_WIDTH.legal.max;
        hit_lower |= genome.body_width == BODY_WIDTH.legal.min;
    }
    assert!(hit_upper && hit_lower);
}

#[test]
fn test_crossover_is_gene_wise() {
    let mut rng = StdRng::seed_from_u64(103);

    for _ in 0..200 {
        let p1 = Individual::random("p1", &mut rng);
        let p2 = Individual::random("p2", &mut rng);
        let child = crossover(&p1, &p2, "child", &mut rng);

        let (a, b, c) = (&p1.genome, &p2.genome, &child.genome);
        let from_parent = |x: f64, y: f64, z: f64| z == x || z == y;

        assert!(from_parent(a.body_width, b.body_width, c.body_width));
        assert!(from_parent(a.body_height, b.body_height, c.body_height));
        assert!(from_parent(a.leg_segment_length, b.leg_segment_length, c.leg_segment_length));
        assert!(from_parent(
            a.leg_segment_thickness,
            b.leg_segment_thickness,
            c.leg_segment_thickness
        ));
        for i in 0..LEG_COUNT {
            assert!(from_parent(a.motor_amplitudes[i], b.motor_amplitudes[i], c.motor_amplitudes[i]));
            assert!(from_parent(a.motor_frequencies[i], b.motor_frequencies[i], c.motor_frequencies[i]));
            assert!(from_parent(a.motor_phases[i], b.motor_phases[i], c.motor_phases[i]));
        }
    }
}

#[test]
fn test_crossover_mixes_both_parents() {
    let mut rng = StdRng::seed_from_u64(104);
    let p1 = Individual::random("p1", &mut rng);
    let p2 = Individual::random("p2", &mut rng);

    let mut from_first = 0;
    let mut from_second = 0;
    for _ in 0..400 {
        let child = crossover(&p1, &p2, "child", &mut rng);
        for i in 0..LEG_COUNT {
            if child.genome.motor_frequencies[i] == p1.genome.motor_frequencies[i] {
                from_first += 1;
            } else {
                from_second += 1;
            }
        }
    }

    // 1600 fair coin flips
    assert!(from_first > 700 && from_second > 700);
}

#[test]
fn test_selection_frequency_follows_weights() {
    let mut rng = StdRng::seed_from_u64(105);
    let mut population: Vec<Individual> = (0..6)
        .map(|i| Individual::random(format!("w{}", i), &mut rng))
        .collect();
    population[0].score = 1000.0;
    for walker in population.iter_mut().skip(1) {
        walker.score = 1.0;
    }

    let draws = 20_000;
    let mut dominant = 0;
    for _ in 0..draws {
        let picked = roulette_selection(&population, &mut rng).unwrap();
        assert!(population.iter().any(|w| std::ptr::eq(w, picked)));
        if picked.name == "w0" {
            dominant += 1;
        }
    }

    let expected = 1000.0 / 1005.0;
    let observed = dominant as f64 / draws as f64;
    assert!((observed - expected).abs() < 0.01, "observed {}", observed);
}

#[test]
fn test_selection_with_scores_near_f64_max() {
    let mut rng = StdRng::seed_from_u64(106);
    let mut population: Vec<Individual> = (0..4)
        .map(|i| Individual::random(format!("w{}", i), &mut rng))
        .collect();
    population[0].score = f64::MAX;
    for walker in population.iter_mut().skip(1) {
        walker.score = f64::MAX / 3.0;
    }

    let draws = 20_000;
    let mut dominant = 0;
    for _ in 0..draws {
        let picked = roulette_selection(&population, &mut rng).unwrap();
        assert!(population.iter().any(|w| std::ptr::eq(w, picked)));
        if picked.name == "w0" {
            dominant += 1;
        }
    }

    // weights 3:1:1:1
    let observed = dominant as f64 / draws as f64;
    assert!((observed - 0.5).abs() < 0.02, "observed {}", observed);
}
