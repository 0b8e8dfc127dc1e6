pub mod fitness;

pub use fitness::{FitnessEvaluator, PlaceholderEvaluator};
