use super::traits::ConfigSection;
use crate::error::WalkerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub checkpoint_dir: PathBuf,
    pub results_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: PathBuf::from("."),
            results_file: PathBuf::from("final_results.json"),
        }
    }
}

impl ConfigSection for OutputConfig {
    fn section_name() -> &'static str {
        "output"
    }

    fn validate(&self) -> Result<(), WalkerError> {
        if self.results_file.as_os_str().is_empty() {
            return Err(WalkerError::Configuration(
                "Results file must not be empty".to_string()
            ));
        }
        if self.checkpoint_dir.is_file() {
            return Err(WalkerError::Configuration(format!(
                "Checkpoint directory {} is a file",
                self.checkpoint_dir.display()
            )));
        }
        Ok(())
    }
}
