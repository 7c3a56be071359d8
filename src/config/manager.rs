use super::{evolution::EvolutionConfig, fitness::FitnessConfig, traits::validate_section};
use crate::error::{LabanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `LABANEVO_EVOLUTION__POPULATION_SIZE=100`
pub const ENV_PREFIX: &str = "LABANEVO";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        validate_section(&self.evolution)?;
        validate_section(&self.fitness)?;
        Ok(())
    }
}

#[derive(Clone)]
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

    /// Build the configuration from defaults, an optional TOML file and
    /// `LABANEVO_`-prefixed environment variables, in that order of precedence.
    pub fn load_layered(&self, path: Option<&Path>) -> Result<()> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| LabanError::Configuration(format!("Failed to seed defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| LabanError::Configuration(format!("Failed to load config: {}", e)))?;

        self.replace(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| LabanError::Toml(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| LabanError::Toml(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to a copy of the configuration and keep it only if it validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| LabanError::Configuration("Configuration lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fitness::Coefficient;

    #[test]
    fn test_rejected_update_keeps_previous_config() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.population_size = 7);
        match result {
            Err(LabanError::Configuration(message)) => assert!(message.starts_with("[evolution]"), "{}", message),
            other => panic!("expected a configuration error, got {:?}", other),
        }
        assert_eq!(manager.get().evolution.population_size, 200);
    }

    #[test]
    fn test_update_applies_valid_changes() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.population_size = 50;
                c.fitness.set(Coefficient::EffortHigh, 3.0);
            })
            .unwrap();
        let config = manager.get();
        assert_eq!(config.evolution.population_size, 50);
        assert_eq!(config.fitness.get(Coefficient::EffortHigh), 3.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.fitness, config.fitness);
        assert_eq!(parsed.evolution.population_size, config.evolution.population_size);
    }
}
