use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{LabanError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,      // Must be even
    pub iteration_count: usize,
    pub selection_fraction: f64,
    pub mutation_fraction: f64,
    pub crossover_count: usize,      // Attribute slots swapped per child pair
    /// When set, swap this share of the slots instead of `crossover_count`
    pub crossover_fraction: Option<f64>,
    pub final_selection_size: usize,
    pub parallel_fitness: bool,
    pub degenerate_policy: DegeneratePolicy,
    pub seed: Option<u64>,
}

/// How many attribute slots a crossover exchanges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrossoverMode {
    Count(usize),
    Fraction(f64),
}

impl CrossoverMode {
    /// Slots to swap out of `total`; fractions truncate toward zero.
    pub fn slots(self, total: usize) -> usize {
        match self {
            CrossoverMode::Count(count) => count,
            CrossoverMode::Fraction(fraction) => (total as f64 * fraction) as usize,
        }
    }
}

/// What proportional selection does when the fitness total is not positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Report `LabanError::NoViableIndividuals`
    Fail,
    /// Fall back to drawing uniformly among the candidates
    Uniform,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            iteration_count: 5,
            selection_fraction: 0.2,
            mutation_fraction: 0.1,
            crossover_count: 2,
            crossover_fraction: None,
            final_selection_size: 5,
            parallel_fitness: false,
            degenerate_policy: DegeneratePolicy::Fail,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Number of survivors picked by each selection pass
    pub fn selection_count(&self) -> usize {
        (self.population_size as f64 * self.selection_fraction).round() as usize
    }

    pub fn crossover_mode(&self) -> CrossoverMode {
        match self.crossover_fraction {
            Some(fraction) => CrossoverMode::Fraction(fraction),
            None => CrossoverMode::Count(self.crossover_count),
        }
    }

    /// Number of individuals mutated in a population of `len`
    pub fn mutation_count(&self, len: usize) -> usize {
        (len as f64 * self.mutation_fraction).round() as usize
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.population_size == 0 || self.population_size % 2 != 0 {
            return Err(LabanError::Configuration(format!(
                "Population size must be a positive even number, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.selection_fraction) {
            return Err(LabanError::Configuration(
                "Selection fraction must be between 0 and 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_fraction) {
            return Err(LabanError::Configuration(
                "Mutation fraction must be between 0 and 1".to_string()
            ));
        }
        if let Some(fraction) = self.crossover_fraction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(LabanError::Configuration(
                    "Crossover fraction must be between 0 and 1".to_string()
                ));
            }
        }
        if self.selection_count() < 2 {
            return Err(LabanError::Configuration(format!(
                "Selection must keep at least two parents, {} x {} keeps {}",
                self.population_size,
                self.selection_fraction,
                self.selection_count()
            )));
        }
        if self.final_selection_size == 0 {
            return Err(LabanError::Configuration(
                "Final selection size must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest {
                    name: "population_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(defaults.population_size),
                    min: Some(2.0),
                    max: None,
                    description: "Number of skeletons in the population (even)".to_string(),
                },
                FieldManifest {
                    name: "iteration_count".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(defaults.iteration_count),
                    min: Some(0.0),
                    max: None,
                    description: "Generations run before the final selection".to_string(),
                },
                FieldManifest {
                    name: "selection_fraction".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(defaults.selection_fraction),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Share of the population kept as parents".to_string(),
                },
                FieldManifest {
                    name: "mutation_fraction".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(defaults.mutation_fraction),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Share of the population mutated each generation".to_string(),
                },
                FieldManifest {
                    name: "crossover_count".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(defaults.crossover_count),
                    min: Some(0.0),
                    max: None,
                    description: "Attribute slots exchanged between two children".to_string(),
                },
                FieldManifest {
                    name: "crossover_fraction".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::Value::Null,
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Share of attribute slots exchanged; overrides crossover_count"
                        .to_string(),
                },
                FieldManifest {
                    name: "final_selection_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(defaults.final_selection_size),
                    min: Some(1.0),
                    max: None,
                    description: "Skeletons presented after the last generation".to_string(),
                },
                FieldManifest {
                    name: "parallel_fitness".to_string(),
                    field_type: "bool".to_string(),
                    default: serde_json::json!(defaults.parallel_fitness),
                    min: None,
                    max: None,
                    description: "Evaluate fitness on the rayon thread pool".to_string(),
                },
                FieldManifest {
                    name: "degenerate_policy".to_string(),
                    field_type: "enum".to_string(),
                    default: serde_json::json!(defaults.degenerate_policy),
                    min: None,
                    max: None,
                    description: "Fail or draw uniformly when total fitness is not positive"
                        .to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selection_count(), 40);
        assert_eq!(config.mutation_count(200), 20);
    }

    #[test]
    fn test_odd_population_rejected() {
        let config = EvolutionConfig { population_size: 201, ..Default::default() };
        assert!(matches!(config.validate(), Err(LabanError::Configuration(_))));
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = EvolutionConfig { population_size: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_selection_too_small_rejected() {
        let config = EvolutionConfig {
            population_size: 4,
            selection_fraction: 0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fraction_bounds() {
        let config = EvolutionConfig { mutation_fraction: 1.5, ..Default::default() };
        assert!(config.validate().is_err());
        let config = EvolutionConfig { selection_fraction: -0.2, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_crossover_mode() {
        let mut config = EvolutionConfig::default();
        assert_eq!(config.crossover_mode(), CrossoverMode::Count(2));
        assert_eq!(config.crossover_mode().slots(13), 2);

        config.crossover_fraction = Some(0.5);
        assert!(config.validate().is_ok());
        assert_eq!(config.crossover_mode(), CrossoverMode::Fraction(0.5));
        // 13 x 0.5 = 6.5 truncates
        assert_eq!(config.crossover_mode().slots(13), 6);
        assert_eq!(CrossoverMode::Fraction(1.0).slots(13), 13);
        assert_eq!(CrossoverMode::Fraction(0.0).slots(13), 0);

        config.crossover_fraction = Some(1.2);
        assert!(matches!(config.validate(), Err(LabanError::Configuration(_))));
    }

    #[test]
    fn test_manifest_lists_defaults() {
        let manifest = EvolutionConfig::default().to_manifest();
        let field = manifest.field("population_size").unwrap();
        assert_eq!(field.default, serde_json::json!(200));
        assert!(manifest.field("seed").is_none());
    }
}
