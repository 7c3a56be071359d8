use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::fitness::FitnessConfig;
use crate::engines::evaluation::quadrants::{determine_quadrants, quadrant_score, Quadrants};
use crate::engines::evaluation::scoring::{self, FitnessBreakdown};
use crate::types::{Effort, Flow, Height, Joint, Space, Time, Weight, NUM_ANGLES};
use crate::utils::random::{radians_to_degrees, rand_real_in_range, random_angle, sample_distinct};

/// Effort qualities plus height, ahead of the angles in the swap slot order
pub const NUM_FIXED_ATTRIBUTES: usize = 5;

/// Total number of attribute slots `swap_values` can exchange
pub const NUM_SWAP_SLOTS: usize = NUM_FIXED_ATTRIBUTES + NUM_ANGLES;

/// One candidate movement: joint angles, Effort qualities and a height level
///
/// Angles are radians. Medial joints (hip to knee, shoulder to elbow) live in
/// [0, 2pi) and distal joints in [0, pi). Quadrants and the fitness breakdown
/// are caches derived from the rest; anything that changes an attribute
/// drops them until the next [`Skeleton::update_fitness`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    angles: [f64; NUM_ANGLES],
    quadrants: Option<Quadrants>,
    effort: Effort,
    height: Height,
    fitness: Option<FitnessBreakdown>,
}

impl Skeleton {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut angles = [0.0; NUM_ANGLES];
        for joint in Joint::ALL {
            angles[joint.index()] = random_angle(rng, joint.max_degrees());
        }

        let effort = Effort {
            flow: Flow::from_coin(rand_real_in_range(rng, 0.0, 1.0) >= 0.5),
            space: Space::from_coin(rand_real_in_range(rng, 0.0, 1.0) >= 0.5),
            time: Time::from_coin(rand_real_in_range(rng, 0.0, 1.0) >= 0.5),
            weight: Weight::from_coin(rand_real_in_range(rng, 0.0, 1.0) >= 0.5),
        };
        let height = Height::from_unit_sample(rand_real_in_range(rng, 0.0, 1.0));

        Self::from_parts(angles, effort, height)
    }

    /// Build a skeleton from explicit attributes, angles in radians
    pub fn from_parts(angles: [f64; NUM_ANGLES], effort: Effort, height: Height) -> Self {
        Self {
            angles,
            quadrants: None,
            effort,
            height,
            fitness: None,
        }
    }

    /// Copy for use as a child: keeps every attribute and the quadrants,
    /// but not the fitness, which must be recomputed.
    pub fn offspring(&self) -> Self {
        Self {
            fitness: None,
            ..self.clone()
        }
    }

    pub fn angles(&self) -> &[f64; NUM_ANGLES] {
        &self.angles
    }

    pub fn angle(&self, joint: Joint) -> f64 {
        self.angles[joint.index()]
    }

    pub fn angle_degrees(&self, joint: Joint) -> f64 {
        radians_to_degrees(self.angle(joint))
    }

    pub fn angles_degrees(&self) -> [f64; NUM_ANGLES] {
        self.angles.map(radians_to_degrees)
    }

    /// Rotation of the segment about the Z axis as `[x, y, z, w]`
    pub fn angle_as_quaternion(&self, joint: Joint) -> [f64; 4] {
        let half = self.angle(joint) / 2.0;
        [0.0, 0.0, half.sin(), half.cos()]
    }

    pub fn num_angles(&self) -> usize {
        NUM_ANGLES
    }

    pub fn effort(&self) -> Effort {
        self.effort
    }

    pub fn weight(&self) -> Weight {
        self.effort.weight
    }

    pub fn space(&self) -> Space {
        self.effort.space
    }

    pub fn time(&self) -> Time {
        self.effort.time
    }

    pub fn flow(&self) -> Flow {
        self.effort.flow
    }

    pub fn height(&self) -> Height {
        self.height
    }

    /// Quadrants from the last determination, if still current
    pub fn quadrants(&self) -> Option<&Quadrants> {
        self.quadrants.as_ref()
    }

    pub fn quadrant_score(&self) -> Option<u32> {
        self.quadrants.as_ref().map(quadrant_score)
    }

    pub fn determine_quadrants(&mut self) -> &Quadrants {
        self.quadrants.insert(determine_quadrants(&self.angles))
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness.map(|f| f.score)
    }

    /// Last computed score, 0 when the skeleton has not been evaluated
    pub fn fitness_score(&self) -> f64 {
        self.fitness().unwrap_or(0.0)
    }

    pub fn fitness_breakdown(&self) -> Option<&FitnessBreakdown> {
        self.fitness.as_ref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Redraw one joint angle at random within its domain; returns the joint.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Joint {
        let joint = Joint::ALL[rng.gen_range(0..NUM_ANGLES)];
        self.angles[joint.index()] = random_angle(rng, joint.max_degrees());
        self.invalidate();
        joint
    }

    /// Exchange `min(num_swap, NUM_SWAP_SLOTS)` distinct attribute slots with `other`.
    ///
    /// Slots 0..5 are weight, space, time, flow and height; slot `5 + i` is
    /// angle `i`. Both skeletons are modified in place.
    pub fn swap_values<R: Rng + ?Sized>(&mut self, other: &mut Skeleton, num_swap: usize, rng: &mut R) {
        for slot in sample_distinct(rng, NUM_SWAP_SLOTS, num_swap) {
            self.swap_slot(other, slot);
        }
        self.invalidate();
        other.invalidate();
    }

    fn swap_slot(&mut self, other: &mut Skeleton, slot: usize) {
        match slot {
            0 => std::mem::swap(&mut self.effort.weight, &mut other.effort.weight),
            1 => std::mem::swap(&mut self.effort.space, &mut other.effort.space),
            2 => std::mem::swap(&mut self.effort.time, &mut other.effort.time),
            3 => std::mem::swap(&mut self.effort.flow, &mut other.effort.flow),
            4 => std::mem::swap(&mut self.height, &mut other.height),
            _ => {
                let i = slot - NUM_FIXED_ATTRIBUTES;
                std::mem::swap(&mut self.angles[i], &mut other.angles[i]);
            }
        }
    }

    fn invalidate(&mut self) {
        self.quadrants = None;
        self.fitness = None;
    }

    /// Recompute quadrants and fitness; returns the new score.
    pub fn update_fitness(&mut self, config: &FitnessConfig) -> f64 {
        let quadrants = *self.determine_quadrants();
        let breakdown = scoring::evaluate(&self.angles, &quadrants, &self.effort, self.height, config);
        self.fitness = Some(breakdown);
        breakdown.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_skeleton_is_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let skeleton = Skeleton::random(&mut rng);
            for joint in Joint::ALL {
                let degrees = skeleton.angle_degrees(joint);
                assert!(degrees >= 0.0 && degrees < joint.max_degrees(), "{} = {}", joint, degrees);
            }
            assert!(skeleton.quadrants().is_none());
            assert!(!skeleton.is_evaluated());
        }
    }

    #[test]
    fn test_offspring_drops_fitness_but_keeps_quadrants() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut parent = Skeleton::random(&mut rng);
        parent.update_fitness(&FitnessConfig::default());

        let child = parent.offspring();
        assert_eq!(child.angles(), parent.angles());
        assert_eq!(child.effort(), parent.effort());
        assert_eq!(child.height(), parent.height());
        assert_eq!(child.quadrants(), parent.quadrants());
        assert!(child.fitness().is_none());
    }

    #[test]
    fn test_mutate_changes_only_one_angle() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let before = Skeleton::random(&mut rng);
            let mut after = before.clone();
            let joint = after.mutate(&mut rng);

            for other in Joint::ALL {
                if other != joint {
                    assert_eq!(after.angle(other), before.angle(other));
                }
            }
            assert!(after.angle_degrees(joint) < joint.max_degrees());
            assert_eq!(after.effort(), before.effort());
            assert_eq!(after.height(), before.height());
        }
    }

    #[test]
    fn test_swap_every_slot_exchanges_whole_skeletons() {
        let mut rng = StdRng::seed_from_u64(17);
        let a = Skeleton::random(&mut rng);
        let b = Skeleton::random(&mut rng);

        let (mut x, mut y) = (a.clone(), b.clone());
        x.swap_values(&mut y, NUM_SWAP_SLOTS + 3, &mut rng);

        assert_eq!(x, b);
        assert_eq!(y, a);
    }

    #[test]
    fn test_swap_counts_distinct_slots() {
        let mut rng = StdRng::seed_from_u64(23);
        let a = Skeleton::from_parts([0.0; NUM_ANGLES], Effort::INDULGING, Height::Low);
        let b = Skeleton::from_parts([1.0; NUM_ANGLES], Effort::FIGHTING, Height::High);

        for num_swap in 0..=NUM_SWAP_SLOTS {
            let (mut x, mut y) = (a.clone(), b.clone());
            x.swap_values(&mut y, num_swap, &mut rng);

            let mut changed = x.angles().iter().filter(|&&v| v == 1.0).count();
            changed += [
                x.weight() != a.weight(),
                x.space() != a.space(),
                x.time() != a.time(),
                x.flow() != a.flow(),
                x.height() != a.height(),
            ]
            .iter()
            .filter(|&&c| c)
            .count();
            assert_eq!(changed, num_swap);
        }
    }

    #[test]
    fn test_update_fitness_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = FitnessConfig::default();
        let mut skeleton = Skeleton::random(&mut rng);
        let first = skeleton.update_fitness(&config);
        let second = skeleton.update_fitness(&config);
        assert_eq!(first, second);
        assert!(first > 0.0);
    }

    #[test]
    fn test_quaternion_of_zero_angle_is_identity() {
        let skeleton = Skeleton::from_parts([0.0; NUM_ANGLES], Effort::INDULGING, Height::Low);
        assert_eq!(skeleton.angle_as_quaternion(Joint::LeftHipToKnee), [0.0, 0.0, 0.0, 1.0]);
    }
}
