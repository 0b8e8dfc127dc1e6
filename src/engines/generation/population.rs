use crate::engines::evaluation::FitnessEvaluator;
use crate::types::Individual;
use rand::RngCore;

/// Score every individual once, overwriting the previous score.
///
/// Negative and non-finite scores from the evaluator are stored as zero.
pub fn evaluate_all(
    population: &mut [Individual],
    evaluator: &dyn FitnessEvaluator,
    rng: &mut dyn RngCore,
) {
    for individual in population.iter_mut() {
        let score = evaluator.evaluate(&individual.genome, &mut *rng);
        individual.score = if score.is_finite() { score.max(0.0) } else { 0.0 };
    }
}

/// Sort best-first by score. Ties keep no particular order.
pub fn rank(population: &mut [Individual]) {
    population.sort_unstable_by(|a, b| {
        b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::Genome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_all_floors_scores() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut population: Vec<Individual> =
            (0..4).map(|i| Individual::random(format!("w{}", i), &mut rng)).collect();

        let negative = |_: &Genome| -3.0;
        evaluate_all(&mut population, &negative, &mut rng);
        assert!(population.iter().all(|w| w.score == 0.0));

        let nan = |_: &Genome| f64::NAN;
        evaluate_all(&mut population, &nan, &mut rng);
        assert!(population.iter().all(|w| w.score == 0.0));

        let infinite = |_: &Genome| f64::INFINITY;
        evaluate_all(&mut population, &infinite, &mut rng);
        assert!(population.iter().all(|w| w.score == 0.0));
    }

    #[test]
    fn test_rank_orders_descending() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut population: Vec<Individual> =
            (0..5).map(|i| Individual::random(format!("w{}", i), &mut rng)).collect();

        let by_width = |g: &Genome| g.body_width;
        evaluate_all(&mut population, &by_width, &mut rng);
        rank(&mut population);

        assert_eq!(population.len(), 5);
        for pair in population.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
