use super::{evolution::EvolutionConfig, output::OutputConfig, traits::ConfigSection};
use crate::error::WalkerError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `WALKERS_EVOLUTION__POPULATION_SIZE=80`.
pub const ENV_PREFIX: &str = "WALKERS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), WalkerError> {
        self.evolution.validate().map_err(section_error::<EvolutionConfig>)?;
        self.output.validate().map_err(section_error::<OutputConfig>)?;
        Ok(())
    }
}

fn section_error<S: ConfigSection>(err: WalkerError) -> WalkerError {
    match err {
        WalkerError::Configuration(msg) => {
            WalkerError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layer defaults, an optional TOML file and `WALKERS_*` environment
    /// variables, then validate the result.
    pub fn load(&self, path: Option<&Path>) -> Result<(), WalkerError> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| WalkerError::Configuration(format!("Failed to build defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            if !path.exists() {
                return Err(WalkerError::Configuration(format!(
                    "Config file {} not found",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| WalkerError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);

        *self.write()? = config;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WalkerError> {
        self.load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WalkerError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| WalkerError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| WalkerError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, WalkerError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| WalkerError::Configuration("Config lock poisoned".to_string()))
    }

    pub fn update<F>(&self, f: F) -> Result<(), WalkerError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        candidate.validate()?;
        *self.write()? = candidate;
        Ok(())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, WalkerError> {
        self.config
            .write()
            .map_err(|_| WalkerError::Configuration("Config lock poisoned".to_string()))
    }
}
