pub mod quadrants;
pub mod scoring;

pub use quadrants::{determine_quadrants, map_angle_to_quadrant, quadrant_score, Quadrants};
pub use scoring::{BartenieffPattern, EffortTier, FitnessBreakdown};
