use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkerError {
    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("Selection requires a non-empty population")]
    EmptyPopulation,

    #[error("Invalid engine state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Generation {generation}: {operation} failed: {source}")]
    Run {
        generation: usize,
        operation: &'static str,
        #[source]
        source: Box<WalkerError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl WalkerError {
    /// Tag an error with the generation and operation that produced it.
    pub fn during(self, generation: usize, operation: &'static str) -> Self {
        match self {
            already @ WalkerError::Run { .. } => already,
            other => WalkerError::Run {
                generation,
                operation,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, WalkerError>;
