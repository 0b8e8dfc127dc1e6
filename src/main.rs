use anyhow::{bail, Context};
use std::path::PathBuf;
use walker_evolve::config::ConfigManager;
use walker_evolve::data::Checkpoint;
use walker_evolve::engines::generation::EvolutionEngine;

const USAGE: &str = "usage: walker-evolve [CONFIG.toml] [--resume CHECKPOINT.json]";

struct Args {
    config: Option<PathBuf>,
    resume: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args { config: None, resume: None };
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--resume" => {
                let path = iter.next().context(USAGE)?;
                args.resume = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other if args.config.is_none() && !other.starts_with('-') => {
                args.config = Some(PathBuf::from(other));
            }
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    let manager = ConfigManager::new();
    manager.load(args.config.as_deref())?;
    let config = manager.get()?;

    let engine = match &args.resume {
        Some(path) => {
            let checkpoint = Checkpoint::load(path)
                .with_context(|| format!("Failed to load checkpoint {}", path.display()))?;
            EvolutionEngine::from_checkpoint(checkpoint, config.evolution.seed)?
        }
        None => EvolutionEngine::new(&config.evolution)?,
    };
    let mut engine = engine.with_output(config.output.clone());

    let results = engine.run(
        config.evolution.num_generations,
        config.evolution.checkpoint_interval,
    )?;

    match results.fitness_history.last() {
        Some(last) => log::info!(
            "Final generation {}: best score {:.2}, average {:.2}",
            last.generation,
            last.best_score,
            last.avg_score
        ),
        None => log::warn!("No generations were run"),
    }

    Ok(())
}
