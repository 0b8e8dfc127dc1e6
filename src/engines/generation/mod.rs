pub mod genome;
pub mod operators;
pub mod population;
pub mod evolution_engine;
pub mod progress;

pub use genome::{Genome, GeneBounds, GeneRange, LEG_COUNT};
pub use evolution_engine::{EngineState, EvolutionEngine};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressCallback, ProgressMessage};
