use crate::types::GenerationStat;
use std::path::Path;

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stat: &GenerationStat);
    fn on_checkpoint_saved(&mut self, generation: usize, path: &Path);
}

/// Reports progress through the `log` facade
pub struct LogProgressCallback {
    total_generations: usize,
    completed: usize,
}

impl LogProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self {
            total_generations,
            completed: 0,
        }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, stat: &GenerationStat) {
        self.completed += 1;
        log::info!(
            "Generation {} complete ({}/{}). Best score: {:.2}, average: {:.2}",
            stat.generation,
            self.completed,
            self.total_generations,
            stat.best_score,
            stat.avg_score
        );
    }

    fn on_checkpoint_saved(&mut self, generation: usize, path: &Path) {
        log::info!("Checkpoint for generation {} saved to {}", generation, path.display());
    }
}

// For collecting progress in tests or a supervising thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationStat),
    CheckpointSaved { generation: usize, path: std::path::PathBuf },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stat: &GenerationStat) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(stat.clone()));
    }

    fn on_checkpoint_saved(&mut self, generation: usize, path: &Path) {
        let _ = self.sender.send(ProgressMessage::CheckpointSaved {
            generation,
            path: path.to_path_buf(),
        });
    }
}
