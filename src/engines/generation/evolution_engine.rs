use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::manager::AppConfig;
use crate::config::{validate_section, EvolutionConfig, FitnessConfig};
use crate::engines::generation::{
    operators::{self, choose_parents, roulette_selection, roulette_selection_with_replacement},
    population::Population,
    progress::{ProgressCallback, Stage},
    skeleton::Skeleton,
};
use crate::error::{LabanError, Result};

/// Fitness summary of one evaluated population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub total: f64,
    pub population_size: usize,
}

impl GenerationStats {
    pub fn from_population(generation: usize, population: &Population) -> Result<Self> {
        let scores = population.fitness_scores()?;
        let total: f64 = scores.iter().sum();
        let best = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            generation,
            best: if scores.is_empty() { 0.0 } else { best },
            average: if scores.is_empty() { 0.0 } else { total / scores.len() as f64 },
            total,
            population_size: scores.len(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub seed: Option<u64>,
    /// One entry per iteration, taken right after fitness was calculated
    pub generations: Vec<GenerationStats>,
    /// The evaluation that fed the final selection
    pub final_stats: GenerationStats,
    pub selection: Vec<Skeleton>,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    fitness: FitnessConfig,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, fitness: FitnessConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, fitness, rng)
    }

    /// Use a caller-supplied random source instead of the configured seed
    pub fn with_rng(config: EvolutionConfig, fitness: FitnessConfig, rng: StdRng) -> Result<Self> {
        validate_section(&config)?;
        validate_section(&fitness)?;
        Ok(Self { config, fitness, rng })
    }

    pub fn from_app_config(app: &AppConfig) -> Result<Self> {
        Self::new(app.evolution.clone(), app.fitness.clone())
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn fitness_config(&self) -> &FitnessConfig {
        &self.fitness
    }

    /// Coefficients can be retuned between generations
    pub fn fitness_config_mut(&mut self) -> &mut FitnessConfig {
        &mut self.fitness
    }

    pub fn create_population(&mut self) -> Population {
        Population::random(self.config.population_size, &mut self.rng)
    }

    pub fn calculate_fitness(&self, population: &mut Population) {
        population.evaluate(&self.fitness, self.config.parallel_fitness);
    }

    /// Roulette selection without replacement; returns indices into `population`
    pub fn select(&mut self, population: &Population) -> Result<Vec<usize>> {
        let scores = population.fitness_scores()?;
        let count = self.config.selection_count();
        let selected = roulette_selection(&scores, count, self.config.degenerate_policy, &mut self.rng)?;
        log::debug!("Selected {} of {} individuals", selected.len(), population.len());
        Ok(selected)
    }

    /// Keep only the selected survivors, then breed them back up to the
    /// configured population size.
    ///
    /// Parents are drawn from the growing population, so children of this
    /// pass can be parents later in the same pass.
    pub fn crossover(&mut self, population: Population, selected: &[usize]) -> Result<Population> {
        let target = self.config.population_size;
        let mut slots: Vec<Option<Skeleton>> = population.into_iter().map(Some).collect();

        let mut next = Vec::with_capacity(target);
        for &index in selected {
            let survivor = slots
                .get_mut(index)
                .and_then(Option::take)
                .ok_or_else(|| LabanError::Selection(format!("Invalid or repeated survivor index {}", index)))?;
            next.push(survivor);
        }
        next.truncate(target);

        while next.len() < target {
            let (i, j) = choose_parents(next.len(), &mut self.rng)?;
            let (child1, child2) =
                operators::crossover(&next[i], &next[j], self.config.crossover_mode(), &mut self.rng);

            next.push(child1);
            if next.len() < target {
                next.push(child2);
            }
        }

        log::debug!("Crossover rebuilt population to {} from {} survivors", next.len(), selected.len());
        Ok(Population::from_individuals(next))
    }

    /// Mutate a fraction of the population; returns the mutated indices
    pub fn mutate(&mut self, population: &mut Population) -> Vec<usize> {
        let count = self.config.mutation_count(population.len());
        let mutated = operators::mutate(population.individuals_mut(), count, &mut self.rng);
        log::debug!("Mutated {} individuals", mutated.len());
        mutated
    }

    /// Select, crossover and mutate. Fitness must already be calculated.
    pub fn run_generation(&mut self, population: Population) -> Result<Population> {
        let selected = self.select(&population)?;
        let mut next = self.crossover(population, &selected)?;
        self.mutate(&mut next);
        Ok(next)
    }

    /// Roulette selection with replacement of `count` individuals
    pub fn final_select(&mut self, population: &Population, count: usize) -> Result<Vec<Skeleton>> {
        let scores = population.fitness_scores()?;
        let picked =
            roulette_selection_with_replacement(&scores, count, self.config.degenerate_policy, &mut self.rng)?;
        Ok(picked
            .into_iter()
            .filter_map(|i| population.get(i).cloned())
            .collect())
    }

    /// Run every iteration followed by the final evaluation and selection
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionReport> {
        log::info!(
            "Evolving {} skeletons for {} iterations",
            self.config.population_size,
            self.config.iteration_count
        );

        let mut population = self.create_population();
        let mut generations = Vec::with_capacity(self.config.iteration_count);

        for generation in 0..self.config.iteration_count {
            callback.on_generation_start(generation);

            callback.on_stage(generation, Stage::CalculateFitness);
            self.calculate_fitness(&mut population);
            let stats = GenerationStats::from_population(generation, &population)?;
            callback.on_generation_complete(&stats);
            generations.push(stats);

            callback.on_stage(generation, Stage::Select);
            let selected = self.select(&population)?;

            callback.on_stage(generation, Stage::Crossover);
            population = self.crossover(population, &selected)?;

            callback.on_stage(generation, Stage::Mutate);
            self.mutate(&mut population);
        }

        let last = self.config.iteration_count;
        callback.on_generation_start(last);
        callback.on_stage(last, Stage::CalculateFitness);
        self.calculate_fitness(&mut population);
        let final_stats = GenerationStats::from_population(last, &population)?;
        callback.on_generation_complete(&final_stats);

        callback.on_stage(last, Stage::FinalSelect);
        let selection = self.final_select(&population, self.config.final_selection_size)?;

        log::info!(
            "Final selection of {} skeletons, best fitness {:.4}",
            selection.len(),
            final_stats.best
        );

        Ok(EvolutionReport {
            seed: self.config.seed,
            generations,
            final_stats,
            selection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::NullProgressCallback;

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 20,
            iteration_count: 2,
            seed: Some(seed),
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_rejects_odd_population() {
        let config = EvolutionConfig {
            population_size: 7,
            ..EvolutionConfig::default()
        };
        assert!(EvolutionEngine::new(config, FitnessConfig::default()).is_err());
    }

    #[test]
    fn test_select_requires_evaluation() {
        let mut engine = EvolutionEngine::new(small_config(1), FitnessConfig::default()).unwrap();
        let population = engine.create_population();
        assert!(matches!(
            engine.select(&population),
            Err(LabanError::NotEvaluated { index: 0 })
        ));
    }

    #[test]
    fn test_crossover_keeps_survivors_first() {
        let mut engine = EvolutionEngine::new(small_config(2), FitnessConfig::default()).unwrap();
        let mut population = engine.create_population();
        engine.calculate_fitness(&mut population);

        let selected = engine.select(&population).unwrap();
        let survivors: Vec<Skeleton> = selected.iter().map(|&i| population.individuals()[i].clone()).collect();
        let next = engine.crossover(population, &selected).unwrap();

        assert_eq!(next.len(), 20);
        assert_eq!(&next.individuals()[..survivors.len()], survivors.as_slice());
    }

    /// Every attribute slot as a number, ignoring the cached fitness
    fn slot_values(skeleton: &Skeleton) -> Vec<f64> {
        let mut slots = vec![
            skeleton.weight().to_real(),
            skeleton.space().to_real(),
            skeleton.time().to_real(),
            skeleton.flow().to_real(),
            skeleton.height().to_real(),
        ];
        slots.extend_from_slice(skeleton.angles());
        slots
    }

    fn bred_population(config: EvolutionConfig) -> (Population, usize) {
        let mut engine = EvolutionEngine::new(config, FitnessConfig::default()).unwrap();
        let mut population = engine.create_population();
        engine.calculate_fitness(&mut population);
        let selected = engine.select(&population).unwrap();
        let next = engine.crossover(population, &selected).unwrap();
        (next, selected.len())
    }

    #[test]
    fn test_zero_slot_crossover_only_copies() {
        let config = EvolutionConfig {
            crossover_count: 0,
            ..small_config(5)
        };
        let (next, survivors) = bred_population(config);
        let slots: Vec<Vec<f64>> = next.iter().map(slot_values).collect();

        for k in survivors..slots.len() {
            assert!(
                slots[..k].contains(&slots[k]),
                "child {} is not a copy of an earlier member",
                k
            );
        }
    }

    #[test]
    fn test_children_swap_slots_between_two_members() {
        let config = EvolutionConfig {
            crossover_count: 2,
            ..small_config(6)
        };
        let (next, survivors) = bred_population(config);
        let slots: Vec<Vec<f64>> = next.iter().map(slot_values).collect();
        assert_eq!((slots.len() - survivors) % 2, 0);

        for k in (survivors..slots.len()).step_by(2) {
            let (child1, child2) = (&slots[k], &slots[k + 1]);
            let found = (0..k).any(|i| {
                (0..k).filter(|&j| j != i).any(|j| {
                    let (p, q) = (&slots[i], &slots[j]);
                    let mut swapped = 0;
                    for s in 0..p.len() {
                        if child1[s] == p[s] && child2[s] == q[s] {
                            continue;
                        }
                        if child1[s] == q[s] && child2[s] == p[s] {
                            swapped += 1;
                            continue;
                        }
                        return false;
                    }
                    swapped <= 2
                })
            });
            assert!(found, "children {} and {} do not come from two earlier members", k, k + 1);
        }
    }

    #[test]
    fn test_crossover_rejects_repeated_index() {
        let mut engine = EvolutionEngine::new(small_config(3), FitnessConfig::default()).unwrap();
        let population = engine.create_population();
        assert!(engine.crossover(population, &[0, 0]).is_err());
    }

    #[test]
    fn test_run_reports_every_generation() {
        let mut engine = EvolutionEngine::new(small_config(4), FitnessConfig::default()).unwrap();
        let report = engine.run(NullProgressCallback).unwrap();
        assert_eq!(report.generations.len(), 2);
        assert_eq!(report.final_stats.generation, 2);
        assert_eq!(report.selection.len(), 5);
        assert!(report.selection.iter().all(|s| s.is_evaluated()));
    }
}
