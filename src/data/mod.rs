pub mod checkpoint;
pub mod store;

pub use checkpoint::{Checkpoint, FinalResults};
pub use store::{GenomeStore, InMemoryStore};
