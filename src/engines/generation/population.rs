use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::fitness::FitnessConfig;
use crate::engines::generation::skeleton::Skeleton;
use crate::error::{LabanError, Result};

/// Value-owning collection of skeletons
///
/// Replacing a generation swaps the whole vector; nothing is shared between
/// members, so fitness can be evaluated in parallel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    individuals: Vec<Skeleton>,
}

impl Population {
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        (0..size).map(|_| Skeleton::random(rng)).collect()
    }

    pub fn from_individuals(individuals: Vec<Skeleton>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Skeleton> {
        self.individuals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skeleton> {
        self.individuals.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Skeleton> {
        self.individuals.iter_mut()
    }

    pub fn individuals(&self) -> &[Skeleton] {
        &self.individuals
    }

    pub(crate) fn individuals_mut(&mut self) -> &mut [Skeleton] {
        &mut self.individuals
    }

    pub fn push(&mut self, skeleton: Skeleton) {
        self.individuals.push(skeleton);
    }

    pub fn into_inner(self) -> Vec<Skeleton> {
        self.individuals
    }

    /// Recompute every member's fitness
    pub fn evaluate(&mut self, config: &FitnessConfig, parallel: bool) {
        if parallel {
            self.individuals.par_iter_mut().for_each(|skeleton| {
                skeleton.update_fitness(config);
            });
        } else {
            for skeleton in &mut self.individuals {
                skeleton.update_fitness(config);
            }
        }
    }

    /// Fitness of each member in order; fails on the first unevaluated one
    pub fn fitness_scores(&self) -> Result<Vec<f64>> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(index, skeleton)| skeleton.fitness().ok_or(LabanError::NotEvaluated { index }))
            .collect()
    }

    pub fn total_fitness(&self) -> Result<f64> {
        Ok(self.fitness_scores()?.iter().sum())
    }

    pub fn average_fitness(&self) -> Result<f64> {
        if self.is_empty() {
            return Ok(0.0);
        }
        Ok(self.total_fitness()? / self.len() as f64)
    }

    /// Highest-scoring evaluated member
    pub fn best(&self) -> Option<&Skeleton> {
        self.individuals
            .iter()
            .filter(|s| s.is_evaluated())
            .max_by(|a, b| a.fitness_score().total_cmp(&b.fitness_score()))
    }
}

impl FromIterator<Skeleton> for Population {
    fn from_iter<I: IntoIterator<Item = Skeleton>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Population {
    type Item = Skeleton;
    type IntoIter = std::vec::IntoIter<Skeleton>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Skeleton;
    type IntoIter = std::slice::Iter<'a, Skeleton>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
