use crate::config::evolution::{CrossoverMode, DegeneratePolicy};
use crate::engines::generation::skeleton::{Skeleton, NUM_SWAP_SLOTS};
use crate::error::{LabanError, Result};
use crate::utils::random::sample_distinct;
use rand::Rng;

/// Spin the wheel once over `candidates`, returning a position in `candidates`.
///
/// Scores below zero count as zero. When the candidates have no positive
/// weight the policy decides between failing and a uniform draw.
fn spin<R: Rng + ?Sized>(
    scores: &[f64],
    candidates: &[usize],
    policy: DegeneratePolicy,
    rng: &mut R,
) -> Result<usize> {
    let total: f64 = candidates.iter().map(|&i| scores[i].max(0.0)).sum();

    if !(total > 0.0) || !total.is_finite() {
        return match policy {
            DegeneratePolicy::Fail => Err(LabanError::NoViableIndividuals { total_fitness: total }),
            DegeneratePolicy::Uniform => {
                log::warn!(
                    "Total fitness {} over {} candidates, falling back to uniform draw",
                    total,
                    candidates.len()
                );
                Ok(rng.gen_range(0..candidates.len()))
            }
        };
    }

    let draw = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;

    for (position, &i) in candidates.iter().enumerate() {
        let score = scores[i].max(0.0);
        if score <= 0.0 {
            continue;
        }
        cumulative += score;
        last_positive = position;
        if draw < cumulative {
            return Ok(position);
        }
    }

    // Round-off can leave the draw a hair past the last boundary
    Ok(last_positive)
}

/// Fitness-proportional selection without replacement
///
/// Returns `count` distinct indices into `scores`, in the order they were drawn.
pub fn roulette_selection<R: Rng + ?Sized>(
    scores: &[f64],
    count: usize,
    policy: DegeneratePolicy,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if count > scores.len() {
        return Err(LabanError::Selection(format!(
            "Cannot select {} distinct individuals from {}",
            count,
            scores.len()
        )));
    }

    let mut remaining: Vec<usize> = (0..scores.len()).collect();
    let mut selected = Vec::with_capacity(count);

    while selected.len() < count {
        let position = spin(scores, &remaining, policy, rng)?;
        selected.push(remaining.remove(position));
    }

    Ok(selected)
}

/// Fitness-proportional selection with replacement
pub fn roulette_selection_with_replacement<R: Rng + ?Sized>(
    scores: &[f64],
    count: usize,
    policy: DegeneratePolicy,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if scores.is_empty() && count > 0 {
        return Err(LabanError::Selection("Cannot select from an empty population".to_string()));
    }

    let all: Vec<usize> = (0..scores.len()).collect();
    (0..count).map(|_| spin(scores, &all, policy, rng)).collect()
}

/// Two distinct parent indices drawn uniformly from `0..len`
pub fn choose_parents<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Result<(usize, usize)> {
    if len < 2 {
        return Err(LabanError::Selection(format!(
            "Crossover needs at least two parents, population has {}",
            len
        )));
    }
    let picked = sample_distinct(rng, len, 2);
    Ok((picked[0], picked[1]))
}

/// Copy both parents and exchange attribute slots between the copies
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Skeleton,
    parent2: &Skeleton,
    mode: CrossoverMode,
    rng: &mut R,
) -> (Skeleton, Skeleton) {
    let mut child1 = parent1.offspring();
    let mut child2 = parent2.offspring();
    child1.swap_values(&mut child2, mode.slots(NUM_SWAP_SLOTS), rng);
    (child1, child2)
}

/// Mutate `count` distinct members, returning the indices that changed
pub fn mutate<R: Rng + ?Sized>(population: &mut [Skeleton], count: usize, rng: &mut R) -> Vec<usize> {
    let chosen = sample_distinct(rng, population.len(), count);
    for &i in &chosen {
        population[i].mutate(rng);
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_selection_without_replacement_is_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let scores: Vec<f64> = (1..=50).map(f64::from).collect();
        let picked = roulette_selection(&scores, 10, DegeneratePolicy::Fail, &mut rng).unwrap();
        assert_eq!(picked.len(), 10);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 10);
    }

    #[test]
    fn test_selection_can_take_everyone() {
        let mut rng = StdRng::seed_from_u64(1);
        let scores = vec![1.0, 5.0, 2.0, 0.5];
        let mut picked = roulette_selection(&scores, 4, DegeneratePolicy::Fail, &mut rng).unwrap();
        picked.sort();
        assert_eq!(picked, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_selection_favours_fitter() {
        let mut rng = StdRng::seed_from_u64(3);
        let scores = vec![1.0, 99.0];
        let mut first_pick_heavy = 0;
        for _ in 0..200 {
            let picked = roulette_selection(&scores, 1, DegeneratePolicy::Fail, &mut rng).unwrap();
            if picked[0] == 1 {
                first_pick_heavy += 1;
            }
        }
        assert!(first_pick_heavy > 180);
    }

    #[test]
    fn test_zero_fitness_fails_or_falls_back() {
        let mut rng = StdRng::seed_from_u64(4);
        let scores = vec![0.0; 6];

        let err = roulette_selection(&scores, 2, DegeneratePolicy::Fail, &mut rng).unwrap_err();
        assert!(matches!(err, LabanError::NoViableIndividuals { .. }));

        let picked = roulette_selection(&scores, 6, DegeneratePolicy::Uniform, &mut rng).unwrap();
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 6);
    }

    #[test]
    fn test_zero_scores_are_never_drawn_while_positive_remain() {
        let mut rng = StdRng::seed_from_u64(8);
        let scores = vec![0.0, 3.0, 0.0, 2.0];
        let mut picked = roulette_selection(&scores, 2, DegeneratePolicy::Fail, &mut rng).unwrap();
        picked.sort();
        assert_eq!(picked, vec![1, 3]);
    }

    #[test]
    fn test_too_many_requested() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = roulette_selection(&[1.0, 2.0], 3, DegeneratePolicy::Fail, &mut rng).unwrap_err();
        assert!(matches!(err, LabanError::Selection(_)));
    }

    #[test]
    fn test_with_replacement_allows_duplicates() {
        let mut rng = StdRng::seed_from_u64(6);
        let scores = vec![0.0, 1.0];
        let picked =
            roulette_selection_with_replacement(&scores, 5, DegeneratePolicy::Fail, &mut rng).unwrap();
        assert_eq!(picked, vec![1; 5]);
    }

    /// Attribute slots where `child` differs from `parent`
    fn slots_differing_from(child: &Skeleton, parent: &Skeleton) -> usize {
        let angles = child
            .angles()
            .iter()
            .zip(parent.angles())
            .filter(|(a, b)| a != b)
            .count();
        let fixed = [
            child.weight() != parent.weight(),
            child.space() != parent.space(),
            child.time() != parent.time(),
            child.flow() != parent.flow(),
            child.height() != parent.height(),
        ];
        angles + fixed.iter().filter(|&&d| d).count()
    }

    #[test]
    fn test_crossover_by_fraction_swaps_truncated_share() {
        use crate::types::{Effort, Height, NUM_ANGLES};

        let mut rng = StdRng::seed_from_u64(21);
        let a = Skeleton::from_parts([0.0; NUM_ANGLES], Effort::INDULGING, Height::Low);
        let b = Skeleton::from_parts([1.0; NUM_ANGLES], Effort::FIGHTING, Height::High);

        for (fraction, expected) in [(0.0, 0), (0.2, 2), (0.5, 6), (0.99, 12), (1.0, 13)] {
            let (child1, child2) = crossover(&a, &b, CrossoverMode::Fraction(fraction), &mut rng);
            assert_eq!(slots_differing_from(&child1, &a), expected, "fraction {}", fraction);
            assert_eq!(slots_differing_from(&child2, &b), expected, "fraction {}", fraction);
        }

        let (child1, _) = crossover(&a, &b, CrossoverMode::Count(3), &mut rng);
        assert_eq!(slots_differing_from(&child1, &a), 3);
    }

    #[test]
    fn test_choose_parents_distinct() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let (a, b) = choose_parents(3, &mut rng).unwrap();
            assert_ne!(a, b);
            assert!(a < 3 && b < 3);
        }
        assert!(choose_parents(1, &mut rng).is_err());
    }
}
